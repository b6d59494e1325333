//! Engine error types.

use thiserror::Error;

use shortcraft_media::MediaError;
use shortcraft_models::UploadError;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Analysis already in progress for this session")]
    AnalysisInProgress,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this is the re-entrancy rejection. The caller keeps its
    /// current result and retries after the in-flight run finishes.
    pub fn is_busy(&self) -> bool {
        matches!(self, EngineError::AnalysisInProgress)
    }

    /// Check if the underlying failure was absorbed into neutral scores
    /// somewhere and a degraded result may still be produced on retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            EngineError::Media(e) => e.is_recoverable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_predicate() {
        assert!(EngineError::AnalysisInProgress.is_busy());
        assert!(!EngineError::config("bad work dir").is_busy());
    }

    #[test]
    fn test_recoverable_follows_media() {
        let err = EngineError::from(MediaError::detector_unavailable("model missing"));
        assert!(err.is_recoverable());

        let err = EngineError::from(MediaError::invalid_input("bad duration"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_upload_error_converts() {
        let err = EngineError::from(UploadError::Empty);
        assert!(matches!(err, EngineError::Upload(_)));
    }
}
