//! Collaborator traits for frame sampling and face detection.
//!
//! Analysis never talks to a decoder or a model directly; it receives these
//! capabilities from the caller. A session without a detector still runs,
//! it just scores faces neutrally. The synthetic implementations here back
//! tests and demos with deterministic behavior.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::activity::FrameBuffer;
use crate::error::{MediaError, MediaResult};
use crate::signals::MIDDLE_BAND;

/// Axis-aligned face bounding box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Detector confidence in [0, 1]
    pub confidence: f64,
}

impl FaceBox {
    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Box area in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// A positioned, decodable video source.
///
/// Implementations own the single decoding handle, which is why sampling is
/// sequential: the source can only be positioned at one timestamp at a time.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Seek to `position_secs` and decode one frame there.
    async fn sample_frame(&self, position_secs: f64) -> MediaResult<FrameBuffer>;

    /// Total source duration in seconds.
    fn duration_secs(&self) -> f64;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// Face detection capability.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a sampled frame.
    async fn detect_faces(&self, frame: &FrameBuffer) -> MediaResult<Vec<FaceBox>>;

    /// Detector name for logging.
    fn name(&self) -> &'static str;

    /// Whether this detector runs a real model (vs a fixed stub).
    fn uses_model(&self) -> bool;
}

/// Deterministic frame source that synthesizes striped frames.
///
/// Frames from the middle of the timeline carry fine stripes (high measured
/// activity) and frames near the edges carry coarse ones, mimicking how
/// real footage tends to put its substance in the middle.
#[derive(Debug, Clone)]
pub struct SyntheticFrameSource {
    duration_secs: f64,
    width: u32,
    height: u32,
}

impl SyntheticFrameSource {
    /// Create a synthetic source of the given duration. Frames are kept at
    /// 64x64 so the activity grid sees every stripe edge.
    pub fn new(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            width: 64,
            height: 64,
        }
    }
}

#[async_trait]
impl FrameSource for SyntheticFrameSource {
    async fn sample_frame(&self, position_secs: f64) -> MediaResult<FrameBuffer> {
        if !(0.0..=self.duration_secs).contains(&position_secs) {
            return Err(MediaError::invalid_input(format!(
                "sample position {position_secs}s outside [0, {}]",
                self.duration_secs
            )));
        }

        let position = position_secs / self.duration_secs;
        let (band_start, band_end) = MIDDLE_BAND;
        let period = if (band_start..=band_end).contains(&position) {
            2
        } else {
            8
        };

        let mut luma = Vec::with_capacity((self.width * self.height) as usize);
        for _y in 0..self.height {
            for x in 0..self.width {
                luma.push(if (x / period) % 2 == 0 { 40 } else { 200 });
            }
        }
        FrameBuffer::from_luma(self.width, self.height, luma)
    }

    fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Detector that reports a fixed number of faces in every frame.
#[derive(Debug, Clone)]
pub struct StubFaceDetector {
    faces_per_frame: usize,
}

impl StubFaceDetector {
    pub fn new(faces_per_frame: usize) -> Self {
        Self { faces_per_frame }
    }
}

#[async_trait]
impl FaceDetector for StubFaceDetector {
    async fn detect_faces(&self, frame: &FrameBuffer) -> MediaResult<Vec<FaceBox>> {
        let slot = frame.width() as f64 / (self.faces_per_frame.max(1)) as f64;
        Ok((0..self.faces_per_frame)
            .map(|i| FaceBox {
                x: i as f64 * slot,
                y: frame.height() as f64 * 0.25,
                width: slot * 0.8,
                height: frame.height() as f64 * 0.5,
                confidence: 0.9,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }

    fn uses_model(&self) -> bool {
        false
    }
}

/// Detector that always reports itself unavailable.
///
/// Stands in for a missing model in tests of the degraded path.
#[derive(Debug, Clone, Default)]
pub struct UnavailableDetector;

#[async_trait]
impl FaceDetector for UnavailableDetector {
    async fn detect_faces(&self, _frame: &FrameBuffer) -> MediaResult<Vec<FaceBox>> {
        Err(MediaError::detector_unavailable("no face model loaded"))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn uses_model(&self) -> bool {
        false
    }
}
