//! Pixform Processing Library
//!
//! Decode an uploaded image, apply one operation (crop, rotate, flip_h,
//! flip_v) and encode the result in the format implied by the upload's
//! filename.

pub mod error;
pub mod format;
pub mod operation;
pub mod transformer;

pub use error::TransformError;
pub use format::OutputFormat;
pub use operation::{CropParams, Operation};
pub use transformer::{CropRect, ImageTransformer, ProcessedImage};
