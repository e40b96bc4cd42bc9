//! Upload validation performed before any network call. Storage itself is
//! an external collaborator; only the size cap and MIME allow-list live
//! here.

use std::fmt;

/// 5MB, matching the storage bucket policy.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadValidationError {
    TooLarge { size: u64 },
    UnsupportedType { content_type: String },
}

impl fmt::Display for UploadValidationError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadValidationError::TooLarge { .. } => {
                write!(formatter, "File size must be less than 5MB")
            }
            UploadValidationError::UnsupportedType { .. } => {
                write!(formatter, "File must be an image")
            }
        }
    }
}

impl std::error::Error for UploadValidationError {}

/// # Errors
///
/// Rejects files over [`MAX_UPLOAD_BYTES`] or outside the `image/*` range.
pub fn validate_image_upload(content_type: &str, size: u64) -> Result<(), UploadValidationError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadValidationError::TooLarge { size });
    }
    if !content_type.starts_with("image/") {
        return Err(UploadValidationError::UnsupportedType {
            content_type: content_type.to_string(),
        });
    }
    Ok(())
}
