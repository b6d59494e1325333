//! Per-window signal synthesis and scoring.
//!
//! Each candidate window gets three signals in [0, 1]. Real measurements
//! are used when a sampler or detector produced them; otherwise the signal
//! falls back to a synthetic proxy driven by timeline position and the
//! injected RNG, so runs stay deterministic under a fixed seed.

use rand::Rng;
use shortcraft_models::{SignalScores, Window};
use std::f64::consts::PI;

/// Face score for zero detected faces.
pub const FACE_SCORE_NONE: f64 = 0.2;
/// Face score for exactly one detected face (single clear subject).
pub const FACE_SCORE_SINGLE: f64 = 0.9;
/// Face score for two detected faces.
pub const FACE_SCORE_PAIR: f64 = 0.65;
/// Face score for three or more detected faces (crowd scenes distract).
pub const FACE_SCORE_CROWD: f64 = 0.35;

/// Timeline band treated as the interesting middle of a video.
pub const MIDDLE_BAND: (f64, f64) = (0.3, 0.7);

const ACTIVITY_BASE_MIDDLE: f64 = 0.75;
const ACTIVITY_BASE_EDGE: f64 = 0.45;
const ACTIVITY_JITTER: f64 = 0.1;

const AUDIO_BASE: f64 = 0.5;
const AUDIO_MID_LIFT: f64 = 0.3;
const AUDIO_JITTER: f64 = 0.05;

/// Raw measurements gathered for one window, if any.
///
/// `None` channels fall back to synthetic proxies during scoring.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowSignals {
    /// Number of faces detected in the sampled frame
    pub face_count: Option<usize>,
    /// Measured visual activity in [0, 1]
    pub activity: Option<f64>,
}

impl WindowSignals {
    /// No measurements at all (synthetic tier, or a failed sample).
    pub const fn empty() -> Self {
        Self {
            face_count: None,
            activity: None,
        }
    }

    /// Measurements from a frame where face detection ran.
    pub fn measured(face_count: usize, activity: f64) -> Self {
        Self {
            face_count: Some(face_count),
            activity: Some(activity),
        }
    }
}

/// Map a detected-face count to a face score.
///
/// One clear subject scores highest; crowds are penalized below even the
/// empty frame because they scatter viewer attention.
pub fn face_score_from_count(count: usize) -> f64 {
    match count {
        0 => FACE_SCORE_NONE,
        1 => FACE_SCORE_SINGLE,
        2 => FACE_SCORE_PAIR,
        _ => FACE_SCORE_CROWD,
    }
}

/// Synthetic activity base for a timeline position in [0, 1].
///
/// The middle band of a video is where the substance tends to live; intros
/// and outros sit on the lower plateau.
pub fn activity_base(position: f64) -> f64 {
    let (band_start, band_end) = MIDDLE_BAND;
    if (band_start..=band_end).contains(&position) {
        ACTIVITY_BASE_MIDDLE
    } else {
        ACTIVITY_BASE_EDGE
    }
}

/// Synthetic audio base for a timeline position in [0, 1]: a smooth curve
/// peaking at the temporal middle, lower toward the edges.
pub fn audio_base(position: f64) -> f64 {
    AUDIO_BASE + AUDIO_MID_LIFT * (PI * position.clamp(0.0, 1.0)).sin()
}

/// Synthetic activity score for a window: positional base plus jitter.
pub fn synthetic_activity_score<R: Rng + ?Sized>(
    window: &Window,
    source_duration: f64,
    rng: &mut R,
) -> f64 {
    let position = window.midpoint_secs() / source_duration;
    let jitter = rng.random_range(-ACTIVITY_JITTER..=ACTIVITY_JITTER);
    (activity_base(position) + jitter).clamp(0.0, 1.0)
}

/// Synthetic audio score for a window: positional base plus jitter.
pub fn synthetic_audio_score<R: Rng + ?Sized>(
    window: &Window,
    source_duration: f64,
    rng: &mut R,
) -> f64 {
    let position = window.midpoint_secs() / source_duration;
    let jitter = rng.random_range(-AUDIO_JITTER..=AUDIO_JITTER);
    (audio_base(position) + jitter).clamp(0.0, 1.0)
}

/// Score one window from its measurements, synthesizing whatever is missing.
///
/// The face channel is neutral (not synthetic) when no detector ran: we
/// refuse to invent faces. Activity falls back to the positional proxy, and
/// audio is always synthetic because no implementation measures it yet.
pub fn score_window<R: Rng + ?Sized>(
    window: &Window,
    source_duration: f64,
    measured: &WindowSignals,
    rng: &mut R,
) -> SignalScores {
    let face = measured
        .face_count
        .map(face_score_from_count)
        .unwrap_or(SignalScores::NEUTRAL);

    let activity = measured
        .activity
        .map(|a| a.clamp(0.0, 1.0))
        .unwrap_or_else(|| synthetic_activity_score(window, source_duration, rng));

    let audio = synthetic_audio_score(window, source_duration, rng);

    SignalScores::new(face, activity, audio)
}
