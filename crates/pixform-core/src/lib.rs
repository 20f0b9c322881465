//! Pixform Core Library
//!
//! Configuration, the shared error taxonomy and the wire models used by the
//! storage, processing and HTTP crates.

pub mod config;
pub mod error;
pub mod models;

pub use config::ServiceConfig;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::ImageListResponse;
