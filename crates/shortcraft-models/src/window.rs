//! Timeline window and signal score models.
//!
//! A `Window` is a candidate slice of the source timeline. Scoring attaches
//! `SignalScores` to produce a `ScoredWindow`; greedy selection assembles a
//! chronologically ordered `Selection` from those.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A candidate slice of the source timeline.
///
/// Immutable once produced by partitioning. Valid windows satisfy
/// `0 <= start < end <= source_duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Window {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl Window {
    /// Create a new window.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Midpoint timestamp in seconds (where the analyzer samples a frame).
    pub fn midpoint_secs(&self) -> f64 {
        self.start + self.duration_secs() / 2.0
    }

    /// Check the window lies within `[0, source_duration]` with positive length.
    pub fn fits_within(&self, source_duration: f64) -> bool {
        self.start >= 0.0 && self.start < self.end && self.end <= source_duration
    }

    /// Check whether two windows overlap in time.
    pub fn overlaps(&self, other: &Window) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Per-channel engagement signals for a window, each in [0, 1].
///
/// When a real detector or frame sampler is unavailable the corresponding
/// channel holds a synthetic value; the neutral constant is used when a
/// per-window measurement failed entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalScores {
    /// Face presence score
    pub face: f64,
    /// Visual activity (frame-to-frame change) score
    pub activity: f64,
    /// Audio level proxy score
    pub audio: f64,
}

impl SignalScores {
    /// Weight of the face channel in the overall score.
    pub const FACE_WEIGHT: f64 = 0.5;
    /// Weight of the activity channel in the overall score.
    pub const ACTIVITY_WEIGHT: f64 = 0.3;
    /// Weight of the audio channel in the overall score.
    pub const AUDIO_WEIGHT: f64 = 0.2;

    /// Neutral per-channel value substituted when measurement is unavailable.
    pub const NEUTRAL: f64 = 0.5;

    /// Face score above which a window counts as having a clear subject.
    /// Drives the aggregate face bonus, the `face_detected` flag, and the
    /// face-track crop choice.
    pub const STRONG_FACE_THRESHOLD: f64 = 0.7;

    /// Create signal scores, clamping each channel into [0, 1].
    pub fn new(face: f64, activity: f64, audio: f64) -> Self {
        Self {
            face: face.clamp(0.0, 1.0),
            activity: activity.clamp(0.0, 1.0),
            audio: audio.clamp(0.0, 1.0),
        }
    }

    /// All-neutral scores (used by the fallback path and failed samples).
    pub fn neutral() -> Self {
        Self {
            face: Self::NEUTRAL,
            activity: Self::NEUTRAL,
            audio: Self::NEUTRAL,
        }
    }

    /// Weighted overall score in [0, 1].
    ///
    /// Face presence dominates: a single clear subject is the strongest
    /// engagement signal for short-form video.
    pub fn overall(&self) -> f64 {
        (Self::FACE_WEIGHT * self.face
            + Self::ACTIVITY_WEIGHT * self.activity
            + Self::AUDIO_WEIGHT * self.audio)
            .clamp(0.0, 1.0)
    }

    /// Whether the face channel indicates a clear subject.
    pub fn has_strong_face(&self) -> bool {
        self.face > Self::STRONG_FACE_THRESHOLD
    }
}

/// A window together with its signal scores and overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredWindow {
    /// The underlying timeline window
    pub window: Window,
    /// Per-channel signal scores
    pub signals: SignalScores,
    /// Weighted overall score in [0, 1]
    pub overall: f64,
}

impl ScoredWindow {
    /// Create a scored window, computing the overall score from the signals.
    pub fn new(window: Window, signals: SignalScores) -> Self {
        Self {
            window,
            signals,
            overall: signals.overall(),
        }
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.window.duration_secs()
    }

    /// Copy of this window truncated to at most `max_secs`, keeping scores.
    ///
    /// Used when the remaining budget is shorter than the window.
    pub fn trimmed_to(&self, max_secs: f64) -> Self {
        let mut trimmed = *self;
        if trimmed.duration_secs() > max_secs {
            trimmed.window.end = trimmed.window.start + max_secs.max(0.0);
        }
        trimmed
    }
}

/// The ordered set of windows chosen to assemble the output clip.
///
/// Windows are sorted by start time ascending (playback order) regardless of
/// the score-driven order they were picked in. `actual_duration` is carried
/// explicitly: for short sources it can be less than `target_duration`, and a
/// result must never be passed off as covering the full target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Selection {
    /// Selected windows in chronological order
    pub windows: Vec<ScoredWindow>,
    /// Requested clip duration in seconds
    pub target_duration: f64,
    /// Sum of selected window durations in seconds
    pub actual_duration: f64,
}

impl Selection {
    /// Create a selection from chronologically ordered windows.
    pub fn new(windows: Vec<ScoredWindow>, target_duration: f64) -> Self {
        let actual_duration = windows.iter().map(|w| w.duration_secs()).sum();
        Self {
            windows,
            target_duration,
            actual_duration,
        }
    }

    /// Number of selected windows.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Sum of window durations in seconds.
    pub fn total_duration(&self) -> f64 {
        self.windows.iter().map(|w| w.duration_secs()).sum()
    }

    /// Mean overall score across selected windows (0.0 when empty).
    pub fn average_overall(&self) -> f64 {
        if self.windows.is_empty() {
            return 0.0;
        }
        self.windows.iter().map(|w| w.overall).sum::<f64>() / self.windows.len() as f64
    }

    /// Whether any selected window has a strong face signal.
    pub fn has_strong_face(&self) -> bool {
        self.windows.iter().any(|w| w.signals.has_strong_face())
    }

    /// Whether windows are sorted by start time ascending.
    pub fn is_chronological(&self) -> bool {
        self.windows
            .windows(2)
            .all(|pair| pair[0].window.start <= pair[1].window.start)
    }
}
