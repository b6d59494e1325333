//! Analysis tier selection.
//!
//! Tiers trade analysis quality against speed and available capabilities.
//! The synthetic tier needs no media access at all and is the floor every
//! session can fall back to when samplers or detectors are missing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signal-gathering tier for timeline analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTier {
    /// Deterministic synthetic signals, no media access required
    #[default]
    Synthetic,
    /// Samples frames and measures visual activity
    MotionAware,
    /// Samples frames, measures activity, and runs face detection
    FaceAware,
}

impl AnalysisTier {
    /// All tiers, fastest first.
    pub const ALL: [AnalysisTier; 3] = [
        AnalysisTier::Synthetic,
        AnalysisTier::MotionAware,
        AnalysisTier::FaceAware,
    ];

    /// Stable identifier used in config, payloads, and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisTier::Synthetic => "synthetic",
            AnalysisTier::MotionAware => "motion_aware",
            AnalysisTier::FaceAware => "face_aware",
        }
    }

    /// Human-readable description for UI surfaces.
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisTier::Synthetic => "Instant scoring from timeline position alone",
            AnalysisTier::MotionAware => "Samples frames to measure on-screen activity",
            AnalysisTier::FaceAware => "Full analysis with face detection per segment",
        }
    }

    /// Relative speed rank, 1 = fastest.
    pub fn speed_rank(&self) -> u8 {
        match self {
            AnalysisTier::Synthetic => 1,
            AnalysisTier::MotionAware => 2,
            AnalysisTier::FaceAware => 3,
        }
    }

    /// Whether this tier seeks and samples frames from the source.
    pub fn samples_frames(&self) -> bool {
        !matches!(self, AnalysisTier::Synthetic)
    }

    /// Whether this tier runs face detection on sampled frames.
    pub fn uses_face_detection(&self) -> bool {
        matches!(self, AnalysisTier::FaceAware)
    }

    /// The next tier down, used when a capability turns out to be missing.
    pub fn downgrade(&self) -> AnalysisTier {
        match self {
            AnalysisTier::FaceAware => AnalysisTier::MotionAware,
            _ => AnalysisTier::Synthetic,
        }
    }
}

impl fmt::Display for AnalysisTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisTier {
    type Err = AnalysisTierParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "synthetic" | "none" => Ok(AnalysisTier::Synthetic),
            "motion_aware" | "motion-aware" | "motion" => Ok(AnalysisTier::MotionAware),
            "face_aware" | "face-aware" | "face" => Ok(AnalysisTier::FaceAware),
            _ => Err(AnalysisTierParseError(s.to_string())),
        }
    }
}

/// Error parsing an analysis tier from a string.
#[derive(Debug, thiserror::Error)]
#[error("invalid analysis tier: {0}")]
pub struct AnalysisTierParseError(pub String);
