//! Derived filename layout shared by writers and readers.
//!
//! Layout: `{username}_{timestamp}_{original_filename}` where the timestamp is
//! local wall-clock time formatted as `%Y%m%d_%H%M%S`. The fixed-width,
//! zero-padded timestamp makes lexicographic order chronological per user.

use crate::traits::{StorageError, StorageResult};
use chrono::{DateTime, Local, TimeZone};

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time at second resolution, formatted for a derived filename.
pub fn timestamp_now() -> String {
    format_timestamp(&Local::now())
}

pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Reject values that could escape the upload directory once joined into a path.
pub fn validate_path_component(value: &str) -> StorageResult<()> {
    if value.contains('/') || value.contains('\\') || value.contains('\0') || value.contains("..")
    {
        return Err(StorageError::InvalidKey(value.to_string()));
    }
    Ok(())
}

/// Build the storage filename for one processed upload.
pub fn derive_filename(
    username: &str,
    timestamp: &str,
    original_filename: &str,
) -> StorageResult<String> {
    validate_path_component(username)?;
    validate_path_component(original_filename)?;
    Ok(format!("{}_{}_{}", username, timestamp, original_filename))
}

/// Prefix shared by every file stored for `username`.
pub fn user_prefix(username: &str) -> String {
    format!("{}_", username)
}
