//! Greedy window selection and the short-source fallback.

use shortcraft_models::{ScoredWindow, Selection, SignalScores, TargetDuration, Window};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

const DURATION_EPS: f64 = 1e-9;

/// Default limit on how far a new segment's start may sit from every
/// already-selected segment's start. Keeps multi-segment clips from
/// splicing wildly disjoint parts of the source together.
pub const DEFAULT_MAX_GAP_SECS: f64 = 10.0;

/// Tuning knobs for segment selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionOptions {
    /// Maximum start-to-start distance from the nearest selected segment;
    /// `None` disables the continuity constraint entirely.
    pub max_gap_secs: Option<f64>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            max_gap_secs: Some(DEFAULT_MAX_GAP_SECS),
        }
    }
}

impl SelectionOptions {
    /// Selection without the continuity constraint.
    pub fn unconstrained() -> Self {
        Self { max_gap_secs: None }
    }
}

/// Pick and order segments to fill the target duration.
///
/// Windows are taken in descending score order until the accumulated
/// duration reaches the target, trimming the final pick to land exactly on
/// it. The continuity constraint is advisory: a first pass honors it, and a
/// second pass ignores it to top up the duration when honoring it would
/// leave the target unmet. The result is re-sorted chronologically.
///
/// Candidates must be non-empty; an empty candidate set here means the
/// partitioner and the fallback routing disagreed, which is a bug.
pub fn select_segments(
    candidates: &[ScoredWindow],
    target: TargetDuration,
    options: &SelectionOptions,
) -> MediaResult<Selection> {
    if candidates.is_empty() {
        return Err(MediaError::selection_impossible(
            "no candidate windows to select from",
        ));
    }

    let target_secs = target.as_secs_f64();

    let mut by_score: Vec<&ScoredWindow> = candidates.iter().collect();
    by_score.sort_by(|a, b| b.overall.total_cmp(&a.overall));

    let mut selected: Vec<ScoredWindow> = Vec::new();
    let mut accumulated = 0.0;
    let mut picked = vec![false; by_score.len()];

    // First pass honors the continuity constraint.
    for (i, candidate) in by_score.iter().enumerate() {
        if accumulated >= target_secs - DURATION_EPS {
            break;
        }
        if let Some(gap) = options.max_gap_secs {
            let near_existing = selected.is_empty()
                || selected
                    .iter()
                    .any(|s| (candidate.window.start - s.window.start).abs() <= gap);
            if !near_existing {
                continue;
            }
        }
        accumulated += push_trimmed(&mut selected, candidate, target_secs - accumulated);
        picked[i] = true;
    }

    // Second pass tops up without the constraint; hitting the target
    // outranks continuity.
    if accumulated < target_secs - DURATION_EPS {
        for (i, candidate) in by_score.iter().enumerate() {
            if accumulated >= target_secs - DURATION_EPS {
                break;
            }
            if picked[i] {
                continue;
            }
            accumulated += push_trimmed(&mut selected, candidate, target_secs - accumulated);
            picked[i] = true;
        }
    }

    if selected.is_empty() {
        return Err(MediaError::selection_impossible(format!(
            "no window selected from {} candidates",
            candidates.len()
        )));
    }

    selected.sort_by(|a, b| a.window.start.total_cmp(&b.window.start));

    debug!(
        segments = selected.len(),
        accumulated, target_secs, "Segment selection complete"
    );

    Ok(Selection::new(selected, target_secs))
}

/// Add a candidate, trimmed to the remaining budget, and return the
/// duration actually added.
fn push_trimmed(selected: &mut Vec<ScoredWindow>, candidate: &ScoredWindow, remaining: f64) -> f64 {
    let window = if candidate.duration_secs() > remaining {
        candidate.trimmed_to(remaining)
    } else {
        *candidate
    };
    let added = window.duration_secs();
    selected.push(window);
    added
}

/// Single centered window for sources too short to scan.
///
/// No signal synthesis runs; the window carries fixed neutral scores. This
/// path is also the recovery route when scoring or detection failed, so it
/// must not itself fail for any positive source duration.
pub fn fallback_selection(source_duration: f64, target: TargetDuration) -> Selection {
    let target_secs = target.as_secs_f64();
    let start = ((source_duration - target_secs.min(source_duration)) / 2.0).max(0.0);
    let end = source_duration.min(target_secs);

    let window = ScoredWindow::new(Window::new(start, end), SignalScores::neutral());
    Selection::new(vec![window], target_secs)
}
