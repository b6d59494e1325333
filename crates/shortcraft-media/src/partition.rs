//! Candidate window partitioning.
//!
//! The timeline is split into fixed-length windows that scoring and
//! selection operate on. Partitioning avoids the intro and outro (viewers
//! rarely share either) and caps how many windows a single analysis scans.

use shortcraft_models::timestamp::MAX_SOURCE_DURATION_SECS;
use shortcraft_models::{TargetDuration, Window};

use crate::error::{MediaError, MediaResult};

/// Nominal candidate window length in seconds.
pub const CHUNK_SECS: f64 = 3.0;

/// Maximum number of windows scanned per analysis.
pub const MAX_WINDOWS: usize = 10;

/// Minimum skipped intro in seconds.
pub const SAFE_START_MIN_SECS: f64 = 3.0;

/// Fraction of the timeline skipped at the start (when larger than the
/// fixed minimum) and at the end.
pub const SAFE_MARGIN_FRACTION: f64 = 0.1;

/// The scannable region of a source timeline: `[max(3s, 10%), 90%]`.
pub fn safe_zone(source_duration: f64) -> (f64, f64) {
    let start = SAFE_START_MIN_SECS.max(source_duration * SAFE_MARGIN_FRACTION);
    let end = source_duration * (1.0 - SAFE_MARGIN_FRACTION);
    (start, end)
}

/// Window length used for a given target: the nominal 3s chunk, grown so
/// that `MAX_WINDOWS` windows can still cover the whole target.
pub fn chunk_size_for(target: TargetDuration) -> f64 {
    CHUNK_SECS.max(target.as_secs_f64() / MAX_WINDOWS as f64)
}

/// Split `[0, span)` into non-overlapping windows of `chunk_size` seconds.
///
/// A final partial window is discarded. When the tiling would exceed
/// [`MAX_WINDOWS`], that many windows are kept but spread evenly across the
/// span instead of clustering at the head, so long sources still get
/// candidates from their whole timeline.
pub fn partition(span: f64, chunk_size: f64) -> MediaResult<Vec<Window>> {
    if !span.is_finite() || span <= 0.0 {
        return Err(MediaError::invalid_input(format!(
            "span must be positive and finite, got {span}"
        )));
    }
    if !chunk_size.is_finite() || chunk_size <= 0.0 {
        return Err(MediaError::invalid_input(format!(
            "chunk size must be positive and finite, got {chunk_size}"
        )));
    }

    let full_count = (span / chunk_size).floor() as usize;
    if full_count == 0 {
        return Ok(Vec::new());
    }

    let windows = if full_count <= MAX_WINDOWS {
        (0..full_count)
            .map(|i| {
                let start = i as f64 * chunk_size;
                Window::new(start, start + chunk_size)
            })
            .collect()
    } else {
        // stride >= chunk_size because MAX_WINDOWS * chunk_size <= span
        let stride = span / MAX_WINDOWS as f64;
        (0..MAX_WINDOWS)
            .map(|i| {
                let start = i as f64 * stride;
                Window::new(start, start + chunk_size)
            })
            .collect()
    };

    Ok(windows)
}

/// Produce the candidate windows for an analysis run.
///
/// Partitions the safe zone of the timeline with a chunk size derived from
/// the target. Returns an empty vector when the safe zone cannot hold the
/// full target; the caller then takes the short-source fallback path.
pub fn candidate_windows(
    source_duration: f64,
    target: TargetDuration,
) -> MediaResult<Vec<Window>> {
    if !source_duration.is_finite() || source_duration <= 0.0 {
        return Err(MediaError::invalid_input(format!(
            "source duration must be positive and finite, got {source_duration}"
        )));
    }
    if source_duration > MAX_SOURCE_DURATION_SECS {
        return Err(MediaError::invalid_input(format!(
            "source duration {source_duration}s exceeds the {MAX_SOURCE_DURATION_SECS}s limit"
        )));
    }

    let (safe_start, safe_end) = safe_zone(source_duration);
    let span = safe_end - safe_start;
    if span < target.as_secs_f64() {
        return Ok(Vec::new());
    }

    let chunk = chunk_size_for(target);
    let windows = partition(span, chunk)?
        .into_iter()
        .map(|w| Window::new(w.start + safe_start, w.end + safe_start))
        .collect();

    Ok(windows)
}
