//! Pixform Storage Library
//!
//! Persistence for processed images. Files live in one flat directory and are
//! named `{username}_{YYYYMMDD_HHMMSS}_{original_filename}`; nothing is ever
//! updated or deleted by the service.
//!
//! Filename derivation and sanitisation live in the `keys` module so that the
//! write path and the listing path agree on the layout.

pub mod keys;
pub mod local;
pub mod traits;

pub use keys::{derive_filename, timestamp_now, user_prefix, validate_path_component};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
