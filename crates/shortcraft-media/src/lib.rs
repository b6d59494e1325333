#![deny(unreachable_patterns)]
//! Segment scoring, selection, and clip assembly.
//!
//! This crate provides:
//! - Timeline partitioning into candidate windows with a safe-zone margin
//! - Per-window scoring from face, activity, and audio signals
//! - Greedy segment selection against a target clip duration
//! - Fallback selection for sources shorter than the target
//! - Frame sampling and face detection seams with synthetic defaults
//! - FFmpeg-backed clip assembly with progress parsing and cancellation

pub mod activity;
pub mod analyzer;
pub mod detect;
pub mod error;
pub mod partition;
pub mod probe;
pub mod progress;
pub mod selection;
pub mod signals;
pub mod transcode;

pub use activity::FrameBuffer;
pub use analyzer::{analyze_timeline, assemble_result};
pub use detect::{
    FaceBox, FaceDetector, FrameSource, StubFaceDetector, SyntheticFrameSource,
    UnavailableDetector,
};
pub use error::{MediaError, MediaResult};
pub use partition::{candidate_windows, chunk_size_for, partition, safe_zone, MAX_WINDOWS};
pub use probe::{probe_source, source_duration, SourceInfo};
pub use progress::{ProgressCallback, TranscodeProgress};
pub use selection::{
    fallback_selection, select_segments, SelectionOptions, DEFAULT_MAX_GAP_SECS,
};
pub use signals::{score_window, WindowSignals};
pub use transcode::{
    build_clip_command, check_ffmpeg, check_ffprobe, CommandTranscoder, FfmpegCommand,
    FfmpegRunner, StubTranscoder, TranscodeJob, Transcoder,
};
