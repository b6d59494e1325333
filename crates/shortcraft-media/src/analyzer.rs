//! The full analysis pipeline: partition, score, select, aggregate.
//!
//! Everything here is a pure function of (duration, target, measurements,
//! RNG). Sampling frames, seeking, and detector calls happen in the caller;
//! this module only consumes whatever measurements were gathered. That keeps
//! the pipeline deterministic under a fixed seed and trivially testable.

use chrono::Utc;
use rand::Rng;
use shortcraft_models::suggestion::{RETENTION_BASE, RETENTION_FALLBACK, RETENTION_SPREAD};
use shortcraft_models::{
    AnalysisResult, ClipStrategy, ContentLabel, CropStrategy, ScoredWindow, Selection,
    TargetDuration, Window,
};
use tracing::{debug, info};

use crate::error::MediaResult;
use crate::partition::candidate_windows;
use crate::selection::{fallback_selection, select_segments, SelectionOptions};
use crate::signals::{score_window, WindowSignals};

/// Pick a crop strategy for the analysis.
///
/// A strong face signal forces face tracking; otherwise the choice is a
/// weighted draw over the strategy table.
pub fn choose_crop<R: Rng + ?Sized>(has_strong_face: bool, rng: &mut R) -> CropStrategy {
    if has_strong_face {
        return CropStrategy::FaceTrack;
    }
    *weighted_draw(&CropStrategy::ALL, |c| c.weight(), rng)
}

/// Draw a content category from the weighted label table.
pub fn choose_content_label<R: Rng + ?Sized>(rng: &mut R) -> ContentLabel {
    *weighted_draw(&ContentLabel::ALL, |l| l.weight(), rng)
}

/// Predicted retention percentage for a finished analysis.
pub fn predict_retention<R: Rng + ?Sized>(used_fallback: bool, rng: &mut R) -> u8 {
    if used_fallback {
        RETENTION_FALLBACK
    } else {
        RETENTION_BASE + rng.random_range(0..RETENTION_SPREAD)
    }
}

/// Assemble the final result from a completed selection.
pub fn assemble_result<R: Rng + ?Sized>(
    selection: Selection,
    used_fallback: bool,
    rng: &mut R,
) -> AnalysisResult {
    let total_score = AnalysisResult::score_selection(&selection);
    let strategy = ClipStrategy::for_window_count(selection.window_count());
    let face_detected = selection.has_strong_face();
    let crop = choose_crop(face_detected, rng);
    let content_label = choose_content_label(rng);
    let predicted_retention = predict_retention(used_fallback, rng);

    AnalysisResult {
        selection,
        total_score,
        strategy,
        face_detected,
        crop,
        content_label,
        predicted_retention,
        created_at: Utc::now(),
    }
}

/// Run the whole analysis pipeline over a source timeline.
///
/// `measure` supplies whatever per-window measurements the caller gathered;
/// return [`WindowSignals::empty`] for windows that could not be sampled
/// and the scoring falls back to synthetic signals. Sources too short to
/// scan take the centered single-window fallback instead of failing.
pub fn analyze_timeline<R, F>(
    source_duration: f64,
    target: TargetDuration,
    options: &SelectionOptions,
    mut measure: F,
    rng: &mut R,
) -> MediaResult<AnalysisResult>
where
    R: Rng + ?Sized,
    F: FnMut(&Window) -> WindowSignals,
{
    let windows = candidate_windows(source_duration, target)?;

    if windows.is_empty() {
        info!(
            source_duration,
            target = %target,
            "Source too short to scan, using centered fallback window"
        );
        let selection = fallback_selection(source_duration, target);
        return Ok(assemble_result(selection, true, rng));
    }

    debug!(
        candidates = windows.len(),
        source_duration,
        target = %target,
        "Scoring candidate windows"
    );

    let scored: Vec<ScoredWindow> = windows
        .iter()
        .map(|w| {
            let measured = measure(w);
            ScoredWindow::new(*w, score_window(w, source_duration, &measured, rng))
        })
        .collect();

    let selection = select_segments(&scored, target, options)?;
    Ok(assemble_result(selection, false, rng))
}

/// Weighted draw over a slice; weights need not be normalized.
fn weighted_draw<'a, T, R, W>(items: &'a [T], weight: W, rng: &mut R) -> &'a T
where
    R: Rng + ?Sized,
    W: Fn(&T) -> f64,
{
    let total: f64 = items.iter().map(&weight).sum();
    let mut remaining = rng.random_range(0.0..total);
    for item in items {
        remaining -= weight(item);
        if remaining < 0.0 {
            return item;
        }
    }
    // Rounding can leave a sliver; the draw then lands on the last entry.
    &items[items.len() - 1]
}
