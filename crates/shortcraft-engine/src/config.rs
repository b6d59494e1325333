//! Engine configuration.

use crate::error::{EngineError, EngineResult};

/// Bounds for the per-window seek timeout. Values outside this range are
/// clamped: anything shorter races healthy seeks on slow storage, anything
/// longer stalls the whole analysis on one bad window.
pub const SEEK_TIMEOUT_MIN_SECS: u64 = 2;
pub const SEEK_TIMEOUT_MAX_SECS: u64 = 10;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Work directory for rendered clips and temporary files
    pub work_dir: String,
    /// Per-window frame seek timeout, clamped to 2..=10 seconds
    pub seek_timeout_secs: u64,
    /// Hard timeout for the clip encode
    pub transcode_timeout_secs: u64,
    /// Maximum start-to-start gap between selected segments; `None` removes
    /// the continuity preference
    pub max_gap_secs: Option<f64>,
    /// Fixed RNG seed for reproducible analyses; `None` seeds from the OS
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_dir: "/tmp/shortcraft".to_string(),
            seek_timeout_secs: 5,
            transcode_timeout_secs: 600,
            max_gap_secs: Some(shortcraft_media::DEFAULT_MAX_GAP_SECS),
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("SHORTCRAFT_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/shortcraft".to_string()),
            seek_timeout_secs: clamp_seek_timeout(
                std::env::var("SHORTCRAFT_SEEK_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            transcode_timeout_secs: std::env::var("SHORTCRAFT_TRANSCODE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            max_gap_secs: std::env::var("SHORTCRAFT_MAX_GAP_SECS")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .map_or(Some(shortcraft_media::DEFAULT_MAX_GAP_SECS), |gap| {
                    // Zero or negative disables the continuity preference
                    (gap > 0.0).then_some(gap)
                }),
            rng_seed: std::env::var("SHORTCRAFT_RNG_SEED")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    /// Check the config is usable before a session is built on it.
    pub fn validate(&self) -> EngineResult<()> {
        if self.work_dir.trim().is_empty() {
            return Err(EngineError::config("work_dir must not be empty"));
        }
        if self.transcode_timeout_secs == 0 {
            return Err(EngineError::config("transcode_timeout_secs must be positive"));
        }
        Ok(())
    }
}

/// Clamp a configured seek timeout into the supported range.
pub fn clamp_seek_timeout(secs: u64) -> u64 {
    secs.clamp(SEEK_TIMEOUT_MIN_SECS, SEEK_TIMEOUT_MAX_SECS)
}
