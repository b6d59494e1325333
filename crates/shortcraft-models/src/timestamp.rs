//! Timestamp parsing and display formatting.
//!
//! Analysis works in `f64` seconds throughout; strings only appear at the
//! edges, when a caller supplies a manual trim offset or when a duration is
//! shown to the user or baked into a download filename.

use chrono::{DateTime, Utc};

/// Maximum reasonable source duration (24 hours in seconds).
pub const MAX_SOURCE_DURATION_SECS: f64 = 86400.0;

/// Parse a timestamp string to total seconds.
///
/// Supports `HH:MM:SS`, `MM:SS`, and bare `SS`, each with an optional
/// `.mmm` fraction.
///
/// # Examples
/// ```
/// use shortcraft_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("01:30:00").unwrap(), 5400.0);
/// assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    if parts.len() > 3 {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    }

    const COMPONENTS: [(&str, f64); 3] = [("seconds", 1.0), ("minutes", 60.0), ("hours", 3600.0)];

    let mut total = 0.0;
    for (part, (name, multiplier)) in parts.iter().rev().zip(COMPONENTS) {
        let value: f64 = part
            .parse()
            .map_err(|_| TimestampError::InvalidValue(name, part.to_string()))?;
        if value < 0.0 {
            return Err(TimestampError::Negative);
        }
        total += value * multiplier;
    }

    Ok(total)
}

/// Format seconds into an `HH:MM:SS` or `HH:MM:SS.mmm` string for logs.
pub fn format_seconds(total_secs: f64) -> String {
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    if (secs - secs.floor()).abs() > 0.0001 {
        format!("{:02}:{:02}:{:06.3}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}:{:02}", hours, mins, secs.floor() as u32)
    }
}

/// Format seconds as `M:SS` for compact UI display.
///
/// # Examples
/// ```
/// use shortcraft_models::timestamp::format_time;
/// assert_eq!(format_time(0.0), "0:00");
/// assert_eq!(format_time(83.4), "1:23");
/// ```
pub fn format_time(total_secs: f64) -> String {
    let total = total_secs.max(0.0);
    let mins = (total / 60.0).floor() as u32;
    let secs = (total % 60.0).floor() as u32;
    format!("{}:{:02}", mins, secs)
}

/// Download filename for a finished clip: `shortcraft-{duration}s-{millis}.mp4`.
pub fn clip_filename(duration_secs: u32, created_at: DateTime<Utc>) -> String {
    format!(
        "shortcraft-{}s-{}.mp4",
        duration_secs,
        created_at.timestamp_millis()
    )
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// Timestamp string is empty
    Empty,
    /// Timestamp contains negative values
    Negative,
    /// Invalid numeric value for a component
    InvalidValue(&'static str, String),
    /// Invalid timestamp format
    InvalidFormat(String),
}

impl std::fmt::Display for TimestampError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Timestamp cannot be empty"),
            Self::Negative => write!(f, "Timestamp cannot be negative"),
            Self::InvalidValue(component, value) => {
                write!(f, "Invalid {} value: {}", component, value)
            }
            Self::InvalidFormat(ts) => write!(
                f,
                "Invalid timestamp format '{}'. Use HH:MM:SS, MM:SS, or SS",
                ts
            ),
        }
    }
}

impl std::error::Error for TimestampError {}
