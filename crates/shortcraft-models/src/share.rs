//! Share targets for finished clips.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Platform a finished clip can be shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SharePlatform {
    /// TikTok upload studio
    Tiktok,
    /// YouTube Studio upload page
    Youtube,
    /// Instagram home (reels upload has no deep link)
    Instagram,
}

impl SharePlatform {
    /// All supported platforms.
    pub const ALL: [SharePlatform; 3] = [
        SharePlatform::Tiktok,
        SharePlatform::Youtube,
        SharePlatform::Instagram,
    ];

    /// Stable identifier used in payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SharePlatform::Tiktok => "tiktok",
            SharePlatform::Youtube => "youtube",
            SharePlatform::Instagram => "instagram",
        }
    }

    /// Human-readable platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            SharePlatform::Tiktok => "TikTok",
            SharePlatform::Youtube => "YouTube Shorts",
            SharePlatform::Instagram => "Instagram Reels",
        }
    }

    /// Web upload page for the platform.
    pub fn upload_url(&self) -> &'static str {
        match self {
            SharePlatform::Tiktok => "https://www.tiktok.com/upload",
            SharePlatform::Youtube => "https://studio.youtube.com/channel/upload",
            SharePlatform::Instagram => "https://www.instagram.com/",
        }
    }

    /// Parsed upload URL for callers that need typed components.
    pub fn upload_url_parsed(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.upload_url())
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SharePlatform {
    type Err = SharePlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiktok" => Ok(SharePlatform::Tiktok),
            "youtube" | "shorts" => Ok(SharePlatform::Youtube),
            "instagram" | "reels" => Ok(SharePlatform::Instagram),
            _ => Err(SharePlatformParseError(s.to_string())),
        }
    }
}

/// Error parsing a share platform from a string.
#[derive(Debug, thiserror::Error)]
#[error("invalid share platform: {0}")]
pub struct SharePlatformParseError(pub String);
