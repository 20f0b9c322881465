//! Output container resolution from the uploaded filename.

use image::ImageFormat;

/// Container used for both the response body and the persisted copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// Resolve from the text after the last `.` (the whole name when there is
    /// none), case-insensitively. `JPG` means JPEG; anything else falls back to JPEG.
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename.rsplit('.').next().unwrap_or_default();
        match extension.to_ascii_uppercase().as_str() {
            "PNG" => OutputFormat::Png,
            "GIF" => OutputFormat::Gif,
            _ => OutputFormat::Jpeg,
        }
    }

    /// Like `from_filename` but `None` for names without a recognised image extension.
    pub fn from_known_extension(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_uppercase().as_str() {
            "JPG" | "JPEG" => Some(OutputFormat::Jpeg),
            "PNG" => Some(OutputFormat::Png),
            "GIF" => Some(OutputFormat::Gif),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Gif => "image/gif",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
        }
    }
}
