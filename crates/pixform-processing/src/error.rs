/// Errors raised while parsing an operation or running the image pipeline
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Invalid crop parameters")]
    InvalidCropParameters,

    #[error("Invalid rotation angle")]
    InvalidRotationAngle,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image as {format}: {message}")]
    Encode { format: &'static str, message: String },

    #[error("Image has no pixels")]
    EmptyImage,
}
