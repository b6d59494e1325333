//! Transcode progress reporting.

use serde::{Deserialize, Serialize};

/// Progress information parsed from the encoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscodeProgress {
    /// Current frame number
    pub frame: u64,
    /// Current encoding FPS
    pub fps: f64,
    /// Output time in milliseconds
    pub out_time_ms: i64,
    /// Output time as string (HH:MM:SS.microseconds)
    pub out_time: String,
    /// Encoding speed (e.g., 1.5 = 1.5x realtime)
    pub speed: f64,
    /// Whether encoding is complete
    pub is_complete: bool,
}

impl TranscodeProgress {
    /// Fractional progress in [0, 1] given the output duration in
    /// milliseconds. This is the value surfaced to session callbacks.
    pub fn fraction(&self, total_duration_ms: i64) -> f64 {
        if total_duration_ms <= 0 {
            return 0.0;
        }
        if self.is_complete {
            return 1.0;
        }
        (self.out_time_ms as f64 / total_duration_ms as f64).clamp(0.0, 1.0)
    }

    /// Progress percentage given the output duration in milliseconds.
    pub fn percentage(&self, total_duration_ms: i64) -> f64 {
        self.fraction(total_duration_ms) * 100.0
    }

    /// Estimate time remaining in seconds.
    pub fn eta_seconds(&self, total_duration_ms: i64) -> Option<f64> {
        if self.speed <= 0.0 || self.out_time_ms <= 0 {
            return None;
        }

        let remaining_ms = total_duration_ms - self.out_time_ms;
        if remaining_ms <= 0 {
            return Some(0.0);
        }

        Some((remaining_ms as f64 / 1000.0) / self.speed)
    }
}

/// Callback type for progress updates.
pub type ProgressCallback = Box<dyn Fn(TranscodeProgress) + Send + 'static>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_and_percentage() {
        let progress = TranscodeProgress {
            out_time_ms: 5000,
            ..Default::default()
        };

        assert!((progress.fraction(10000) - 0.5).abs() < 1e-9);
        assert!((progress.percentage(10000) - 50.0).abs() < 0.01);
        assert_eq!(progress.fraction(0), 0.0);
        // Runs past the expected duration are capped.
        assert_eq!(progress.fraction(4000), 1.0);
    }

    #[test]
    fn test_complete_reports_full_fraction() {
        let progress = TranscodeProgress {
            out_time_ms: 100,
            is_complete: true,
            ..Default::default()
        };
        assert_eq!(progress.fraction(10000), 1.0);
    }

    #[test]
    fn test_eta_calculation() {
        let progress = TranscodeProgress {
            out_time_ms: 5000,
            speed: 2.0,
            ..Default::default()
        };

        // 5 seconds remaining at 2x speed.
        let eta = progress.eta_seconds(10000).unwrap();
        assert!((eta - 2.5).abs() < 0.01);

        let stalled = TranscodeProgress::default();
        assert!(stalled.eta_seconds(10000).is_none());
    }
}
