//! Content categories, crop strategies, and clip duration presets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Detected content category for a source video.
///
/// Drives title and hashtag suggestions. Categories are assigned by a
/// weighted draw biased toward the formats that dominate short-form feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentLabel {
    /// General entertainment footage
    #[default]
    Entertainment,
    /// Explainers and factual content
    Educational,
    /// How-to and walkthrough content
    Tutorial,
    /// Comedy and sketch content
    Comedy,
    /// Narrative or storytime content
    Story,
    /// Music and performance content
    Music,
}

impl ContentLabel {
    /// All labels, ordered by draw weight descending.
    pub const ALL: [ContentLabel; 6] = [
        ContentLabel::Entertainment,
        ContentLabel::Educational,
        ContentLabel::Tutorial,
        ContentLabel::Comedy,
        ContentLabel::Story,
        ContentLabel::Music,
    ];

    /// Stable identifier used in payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentLabel::Entertainment => "entertainment",
            ContentLabel::Educational => "educational",
            ContentLabel::Tutorial => "tutorial",
            ContentLabel::Comedy => "comedy",
            ContentLabel::Story => "story",
            ContentLabel::Music => "music",
        }
    }

    /// Human-readable name for UI surfaces.
    pub fn display_name(&self) -> &'static str {
        match self {
            ContentLabel::Entertainment => "Entertainment",
            ContentLabel::Educational => "Educational",
            ContentLabel::Tutorial => "Tutorial",
            ContentLabel::Comedy => "Comedy",
            ContentLabel::Story => "Story",
            ContentLabel::Music => "Music",
        }
    }

    /// Relative draw weight for category assignment. Weights sum to 1.0.
    pub fn weight(&self) -> f64 {
        match self {
            ContentLabel::Entertainment => 0.25,
            ContentLabel::Educational => 0.20,
            ContentLabel::Tutorial => 0.15,
            ContentLabel::Comedy => 0.15,
            ContentLabel::Story => 0.15,
            ContentLabel::Music => 0.10,
        }
    }
}

impl fmt::Display for ContentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentLabel {
    type Err = ContentLabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entertainment" => Ok(ContentLabel::Entertainment),
            "educational" | "education" => Ok(ContentLabel::Educational),
            "tutorial" | "howto" | "how-to" => Ok(ContentLabel::Tutorial),
            "comedy" | "funny" => Ok(ContentLabel::Comedy),
            "story" | "storytime" => Ok(ContentLabel::Story),
            "music" => Ok(ContentLabel::Music),
            _ => Err(ContentLabelParseError(s.to_string())),
        }
    }
}

/// Error parsing a content label from a string.
#[derive(Debug, thiserror::Error)]
#[error("invalid content label: {0}")]
pub struct ContentLabelParseError(pub String);

/// How the horizontal source should be framed when converting to vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CropStrategy {
    /// Keep the horizontal center of the frame
    Center,
    /// Follow the dominant face across the clip
    #[default]
    FaceTrack,
    /// Favor the upper third of the frame
    UpperThird,
    /// Content-aware framing around the busiest region
    SmartCrop,
}

impl CropStrategy {
    /// All strategies, ordered by draw weight descending.
    pub const ALL: [CropStrategy; 4] = [
        CropStrategy::FaceTrack,
        CropStrategy::Center,
        CropStrategy::SmartCrop,
        CropStrategy::UpperThird,
    ];

    /// Stable identifier used in payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CropStrategy::Center => "center",
            CropStrategy::FaceTrack => "face-track",
            CropStrategy::UpperThird => "upper-third",
            CropStrategy::SmartCrop => "smart-crop",
        }
    }

    /// Human-readable description for UI surfaces.
    pub fn description(&self) -> &'static str {
        match self {
            CropStrategy::Center => "Center crop keeping the middle of the frame",
            CropStrategy::FaceTrack => "Crop that follows the dominant face",
            CropStrategy::UpperThird => "Crop favoring the upper third of the frame",
            CropStrategy::SmartCrop => "Content-aware crop around the busiest region",
        }
    }

    /// Relative draw weight when no strong face forces the choice.
    /// Weights sum to 1.0; face tracking dominates because faces carry
    /// short-form engagement.
    pub fn weight(&self) -> f64 {
        match self {
            CropStrategy::Center => 0.25,
            CropStrategy::FaceTrack => 0.40,
            CropStrategy::UpperThird => 0.15,
            CropStrategy::SmartCrop => 0.20,
        }
    }
}

impl fmt::Display for CropStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CropStrategy {
    type Err = CropStrategyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "center" | "centre" => Ok(CropStrategy::Center),
            "face-track" | "face_track" | "face" => Ok(CropStrategy::FaceTrack),
            "upper-third" | "upper_third" => Ok(CropStrategy::UpperThird),
            "smart-crop" | "smart_crop" | "smart" => Ok(CropStrategy::SmartCrop),
            _ => Err(CropStrategyParseError(s.to_string())),
        }
    }
}

/// Error parsing a crop strategy from a string.
#[derive(Debug, thiserror::Error)]
#[error("invalid crop strategy: {0}")]
pub struct CropStrategyParseError(pub String);

/// Supported output clip lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum TargetDuration {
    /// 15 second clip
    #[serde(rename = "15")]
    S15,
    /// 30 second clip
    #[default]
    #[serde(rename = "30")]
    S30,
    /// 45 second clip
    #[serde(rename = "45")]
    S45,
    /// 60 second clip
    #[serde(rename = "60")]
    S60,
}

impl TargetDuration {
    /// All presets in ascending order.
    pub const ALL: [TargetDuration; 4] = [
        TargetDuration::S15,
        TargetDuration::S30,
        TargetDuration::S45,
        TargetDuration::S60,
    ];

    /// Duration in whole seconds.
    pub fn as_secs(&self) -> u32 {
        match self {
            TargetDuration::S15 => 15,
            TargetDuration::S30 => 30,
            TargetDuration::S45 => 45,
            TargetDuration::S60 => 60,
        }
    }

    /// Duration in seconds as a float, for timeline math.
    pub fn as_secs_f64(&self) -> f64 {
        self.as_secs() as f64
    }

    /// Look up the preset for a whole-second value.
    pub fn from_secs(secs: u32) -> Option<Self> {
        match secs {
            15 => Some(TargetDuration::S15),
            30 => Some(TargetDuration::S30),
            45 => Some(TargetDuration::S45),
            60 => Some(TargetDuration::S60),
            _ => None,
        }
    }
}

impl fmt::Display for TargetDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.as_secs())
    }
}

impl FromStr for TargetDuration {
    type Err = TargetDurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(['s', 'S']);
        trimmed
            .parse::<u32>()
            .ok()
            .and_then(TargetDuration::from_secs)
            .ok_or_else(|| TargetDurationParseError(s.to_string()))
    }
}

/// Error parsing a target duration from a string.
#[derive(Debug, thiserror::Error)]
#[error("invalid target duration: {0} (expected 15, 30, 45, or 60)")]
pub struct TargetDurationParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_label_weights_sum_to_one() {
        let sum: f64 = ContentLabel::ALL.iter().map(|l| l.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_content_label_serde_roundtrip() {
        for label in ContentLabel::ALL {
            let json = serde_json::to_string(&label).unwrap();
            let back: ContentLabel = serde_json::from_str(&json).unwrap();
            assert_eq!(label, back);
        }
        assert_eq!(
            serde_json::to_string(&ContentLabel::Educational).unwrap(),
            "\"educational\""
        );
    }

    #[test]
    fn test_content_label_from_str_aliases() {
        assert_eq!(
            "how-to".parse::<ContentLabel>().unwrap(),
            ContentLabel::Tutorial
        );
        assert_eq!(
            "Storytime".parse::<ContentLabel>().unwrap(),
            ContentLabel::Story
        );
        assert!("podcast".parse::<ContentLabel>().is_err());
    }

    #[test]
    fn test_crop_strategy_weights_sum_to_one() {
        let sum: f64 = CropStrategy::ALL.iter().map(|c| c.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_crop_strategy_face_track_dominates() {
        for crop in CropStrategy::ALL {
            assert!(crop.weight() <= CropStrategy::FaceTrack.weight());
        }
    }

    #[test]
    fn test_crop_strategy_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&CropStrategy::FaceTrack).unwrap(),
            "\"face-track\""
        );
        assert_eq!(
            serde_json::from_str::<CropStrategy>("\"upper-third\"").unwrap(),
            CropStrategy::UpperThird
        );
    }

    #[test]
    fn test_target_duration_presets() {
        assert_eq!(TargetDuration::from_secs(45), Some(TargetDuration::S45));
        assert_eq!(TargetDuration::from_secs(20), None);
        assert_eq!(TargetDuration::S60.as_secs(), 60);
        assert_eq!(TargetDuration::default(), TargetDuration::S30);
    }

    #[test]
    fn test_target_duration_parse() {
        assert_eq!("15".parse::<TargetDuration>().unwrap(), TargetDuration::S15);
        assert_eq!("30s".parse::<TargetDuration>().unwrap(), TargetDuration::S30);
        assert!("90".parse::<TargetDuration>().is_err());
    }

    #[test]
    fn test_target_duration_serde_numeric_strings() {
        assert_eq!(serde_json::to_string(&TargetDuration::S15).unwrap(), "\"15\"");
        assert_eq!(
            serde_json::from_str::<TargetDuration>("\"60\"").unwrap(),
            TargetDuration::S60
        );
    }
}
