//! Uploaded source file metadata and validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum accepted upload size: 500 MB.
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Errors that can occur validating an upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The MIME type is not a video type
    #[error("not a video file: {0}")]
    NotAVideo(String),
    /// The file exceeds the size limit
    #[error("file size {size_bytes} exceeds the {max_bytes} byte limit")]
    TooLarge {
        /// Reported file size in bytes
        size_bytes: u64,
        /// Configured limit in bytes
        max_bytes: u64,
    },
    /// The file is empty
    #[error("file is empty")]
    Empty,
    /// No file name was provided
    #[error("file name is required")]
    MissingFileName,
}

/// Metadata describing an uploaded source video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadMeta {
    /// Original file name as provided by the client
    pub file_name: String,
    /// Reported MIME type, e.g. "video/mp4"
    pub mime_type: String,
    /// File size in bytes
    pub size_bytes: u64,
}

impl UploadMeta {
    /// Create upload metadata.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
        }
    }

    /// Validate the upload against type and size limits.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.file_name.trim().is_empty() {
            return Err(UploadError::MissingFileName);
        }

        if !self.mime_type.starts_with("video/") {
            return Err(UploadError::NotAVideo(self.mime_type.clone()));
        }

        if self.size_bytes == 0 {
            return Err(UploadError::Empty);
        }

        if self.size_bytes > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge {
                size_bytes: self.size_bytes,
                max_bytes: MAX_UPLOAD_BYTES,
            });
        }

        Ok(())
    }

    /// File size in megabytes for display.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}
