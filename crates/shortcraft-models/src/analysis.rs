//! Aggregate analysis output models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::content::{ContentLabel, CropStrategy};
use crate::window::Selection;

/// How the selected segments should be assembled into the final clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClipStrategy {
    /// One continuous segment
    Single,
    /// Two segments joined with a cut
    Dual,
    /// Three or more segments joined with cuts
    Multi,
}

impl ClipStrategy {
    /// Derive the strategy from the number of selected segments.
    pub fn for_window_count(count: usize) -> Self {
        match count {
            0 | 1 => ClipStrategy::Single,
            2 => ClipStrategy::Dual,
            _ => ClipStrategy::Multi,
        }
    }

    /// Stable identifier used in logs and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClipStrategy::Single => "single",
            ClipStrategy::Dual => "dual",
            ClipStrategy::Multi => "multi",
        }
    }
}

impl std::fmt::Display for ClipStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Complete result of analyzing a source timeline.
///
/// `total_score` and `predicted_retention` are 0-100 integers ready for
/// display. `actual_duration` lives inside `selection`; callers must use it
/// rather than assume the target was met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// The chosen segments in playback order
    pub selection: Selection,
    /// Aggregate engagement score, 0-100
    pub total_score: u8,
    /// Assembly strategy derived from the segment count
    pub strategy: ClipStrategy,
    /// Whether any segment carries a strong face signal
    pub face_detected: bool,
    /// Recommended framing for the vertical crop
    pub crop: CropStrategy,
    /// Detected content category
    pub content_label: ContentLabel,
    /// Predicted viewer retention, 0-100
    pub predicted_retention: u8,
    /// When the analysis completed
    pub created_at: DateTime<Utc>,
}

impl AnalysisResult {
    /// Bonus applied when the clip is a single continuous segment.
    pub const SINGLE_SEGMENT_BONUS: f64 = 0.1;
    /// Bonus applied when a strong face signal is present.
    pub const STRONG_FACE_BONUS: f64 = 0.15;

    /// Compute the 0-100 aggregate score from a selection.
    ///
    /// Mean of the per-window overall scores, plus a bonus for a single
    /// continuous segment and another for a strong face, capped at 1.0
    /// before scaling. The bonuses reward clips that hold attention: no
    /// cuts to jar the viewer, and a clear subject on screen.
    pub fn score_selection(selection: &Selection) -> u8 {
        let mut score = selection.average_overall();
        if selection.window_count() == 1 {
            score += Self::SINGLE_SEGMENT_BONUS;
        }
        if selection.has_strong_face() {
            score += Self::STRONG_FACE_BONUS;
        }
        (score.min(1.0) * 100.0).round() as u8
    }

    /// Short human-readable summary for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} segment(s), {} strategy, score {}, {:.1}s of {:.0}s",
            self.selection.window_count(),
            self.strategy,
            self.total_score,
            self.selection.actual_duration,
            self.selection.target_duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{ScoredWindow, SignalScores, Window};

    fn scored(start: f64, face: f64) -> ScoredWindow {
        ScoredWindow::new(Window::new(start, start + 3.0), SignalScores::new(face, 0.5, 0.5))
    }

    #[test]
    fn test_strategy_for_window_count() {
        assert_eq!(ClipStrategy::for_window_count(0), ClipStrategy::Single);
        assert_eq!(ClipStrategy::for_window_count(1), ClipStrategy::Single);
        assert_eq!(ClipStrategy::for_window_count(2), ClipStrategy::Dual);
        assert_eq!(ClipStrategy::for_window_count(3), ClipStrategy::Multi);
        assert_eq!(ClipStrategy::for_window_count(10), ClipStrategy::Multi);
    }

    #[test]
    fn test_strategy_serde_snake_case() {
        let json = serde_json::to_string(&ClipStrategy::Multi).unwrap();
        assert_eq!(json, "\"multi\"");
    }

    #[test]
    fn test_score_single_segment_bonus() {
        let sel = Selection::new(vec![scored(0.0, 0.5)], 15.0);
        // overall = 0.5*0.5 + 0.3*0.5 + 0.2*0.5 = 0.5; +0.1 single bonus
        assert_eq!(AnalysisResult::score_selection(&sel), 60);
    }

    #[test]
    fn test_score_face_bonus_and_cap() {
        let sel = Selection::new(vec![scored(0.0, 1.0)], 15.0);
        // overall = 0.75; +0.1 single +0.15 face = 1.0 exactly
        assert_eq!(AnalysisResult::score_selection(&sel), 100);

        // Multiple high-face windows: no single bonus, still capped.
        let sel = Selection::new(vec![scored(0.0, 1.0), scored(6.0, 1.0)], 15.0);
        assert_eq!(AnalysisResult::score_selection(&sel), 90);
    }

    #[test]
    fn test_score_no_bonuses() {
        let sel = Selection::new(vec![scored(0.0, 0.5), scored(6.0, 0.5)], 15.0);
        assert_eq!(AnalysisResult::score_selection(&sel), 50);
    }
}
