//! Shared data models for the ShortCraft clip engine.
//!
//! This crate provides Serde-serializable types for:
//! - Timeline windows, signal scores, and selections
//! - Analysis results and clip strategies
//! - Content categories, crop strategies, and duration presets
//! - Publishing suggestions (titles, hashtags, sounds)
//! - Upload validation and share targets

pub mod analysis;
pub mod content;
pub mod share;
pub mod suggestion;
pub mod tier;
pub mod timestamp;
pub mod upload;
pub mod window;

// Re-export common types
pub use analysis::{AnalysisResult, ClipStrategy};
pub use content::{ContentLabel, CropStrategy, TargetDuration};
pub use share::SharePlatform;
pub use suggestion::{ClipSuggestion, RecommendedSound};
pub use tier::AnalysisTier;
pub use upload::{UploadError, UploadMeta, MAX_UPLOAD_BYTES};
pub use window::{ScoredWindow, Selection, SignalScores, Window};
