//! Prometheus metrics for the clip engine.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // Analysis metrics
    pub const ANALYSES_STARTED_TOTAL: &str = "shortcraft_analyses_started_total";
    pub const ANALYSES_COMPLETED_TOTAL: &str = "shortcraft_analyses_completed_total";
    pub const ANALYSES_FAILED_TOTAL: &str = "shortcraft_analyses_failed_total";
    pub const ANALYSIS_DURATION_SECONDS: &str = "shortcraft_analysis_duration_seconds";
    pub const ANALYSES_IN_FLIGHT: &str = "shortcraft_analyses_in_flight";

    // Degradation metrics
    pub const SEEK_TIMEOUTS_TOTAL: &str = "shortcraft_seek_timeouts_total";
    pub const DETECTOR_FALLBACKS_TOTAL: &str = "shortcraft_detector_fallbacks_total";
    pub const ANALYSES_SKIPPED_TOTAL: &str = "shortcraft_analyses_skipped_total";
    pub const FALLBACK_SELECTIONS_TOTAL: &str = "shortcraft_fallback_selections_total";

    // Render metrics
    pub const CLIPS_RENDERED_TOTAL: &str = "shortcraft_clips_rendered_total";
    pub const RENDER_DURATION_SECONDS: &str = "shortcraft_render_duration_seconds";
}

/// Record an analysis starting.
pub fn record_analysis_started(tier: &str) {
    let labels = [("tier", tier.to_string())];
    counter!(names::ANALYSES_STARTED_TOTAL, &labels).increment(1);
    gauge!(names::ANALYSES_IN_FLIGHT).increment(1.0);
}

/// Record an analysis completing successfully.
pub fn record_analysis_completed(tier: &str, duration_secs: f64) {
    let labels = [("tier", tier.to_string())];
    counter!(names::ANALYSES_COMPLETED_TOTAL, &labels).increment(1);
    histogram!(names::ANALYSIS_DURATION_SECONDS, &labels).record(duration_secs);
    gauge!(names::ANALYSES_IN_FLIGHT).decrement(1.0);
}

/// Record an analysis failing.
pub fn record_analysis_failed(tier: &str) {
    let labels = [("tier", tier.to_string())];
    counter!(names::ANALYSES_FAILED_TOTAL, &labels).increment(1);
    gauge!(names::ANALYSES_IN_FLIGHT).decrement(1.0);
}

/// Record a per-window seek timing out.
pub fn record_seek_timeout() {
    counter!(names::SEEK_TIMEOUTS_TOTAL).increment(1);
}

/// Record the face detector dropping out of an analysis.
pub fn record_detector_fallback(detector: &str) {
    let labels = [("detector", detector.to_string())];
    counter!(names::DETECTOR_FALLBACKS_TOTAL, &labels).increment(1);
}

/// Record a user skip cutting sampling short.
pub fn record_skip() {
    counter!(names::ANALYSES_SKIPPED_TOTAL).increment(1);
}

/// Record the short-source fallback selection being taken.
pub fn record_fallback_selection() {
    counter!(names::FALLBACK_SELECTIONS_TOTAL).increment(1);
}

/// Record a clip finishing its render.
pub fn record_clip_rendered(transcoder: &str, duration_secs: f64) {
    let labels = [("transcoder", transcoder.to_string())];
    counter!(names::CLIPS_RENDERED_TOTAL, &labels).increment(1);
    histogram!(names::RENDER_DURATION_SECONDS, &labels).record(duration_secs);
}
