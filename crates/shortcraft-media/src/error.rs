//! Error types for analysis and assembly operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during timeline analysis and clip assembly.
///
/// Recoverability matters more than the variant list here: a missing
/// detector or a timed-out seek degrades one signal and analysis carries
/// on, while `SelectionImpossible` means the selector broke its own
/// contract and the session must surface a defect.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Detector unavailable: {0}")]
    DetectorUnavailable(String),

    #[error("Seek to {position_secs:.1}s timed out after {timeout_secs} seconds")]
    SeekTimeout {
        position_secs: f64,
        timeout_secs: u64,
    },

    #[error("Selection impossible: {0}")]
    SelectionImpossible(String),

    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a detector unavailable error.
    pub fn detector_unavailable(message: impl Into<String>) -> Self {
        Self::DetectorUnavailable(message.into())
    }

    /// Create a seek timeout error.
    pub fn seek_timeout(position_secs: f64, timeout_secs: u64) -> Self {
        Self::SeekTimeout {
            position_secs,
            timeout_secs,
        }
    }

    /// Create a selection impossible error.
    pub fn selection_impossible(message: impl Into<String>) -> Self {
        Self::SelectionImpossible(message.into())
    }

    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether analysis can continue with a degraded signal after this error.
    ///
    /// A missing detector downgrades the whole run to neutral face scores;
    /// a seek timeout neutralizes only the window it hit.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DetectorUnavailable(_) | Self::SeekTimeout { .. }
        )
    }

    /// Whether this error indicates a bug rather than bad input or a
    /// missing capability.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::SelectionImpossible(_) | Self::Internal(_))
    }

    /// Whether this error came from cooperative cancellation.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(MediaError::detector_unavailable("no face model").is_recoverable());
        assert!(MediaError::seek_timeout(42.0, 5).is_recoverable());
        assert!(!MediaError::invalid_input("bad duration").is_recoverable());
        assert!(!MediaError::Cancelled.is_recoverable());
    }

    #[test]
    fn test_defect_errors() {
        assert!(MediaError::selection_impossible("no candidates").is_defect());
        assert!(MediaError::internal("bug").is_defect());
        assert!(!MediaError::seek_timeout(1.0, 5).is_defect());
    }

    #[test]
    fn test_seek_timeout_message() {
        let err = MediaError::seek_timeout(13.5, 5);
        assert_eq!(err.to_string(), "Seek to 13.5s timed out after 5 seconds");
    }
}
