//! Visual activity measurement from sampled frames.
//!
//! A sampled frame is reduced to a coarse luma grid and scored by its
//! density of adjacent-pixel luminance changes. Busy, detailed frames score
//! high; static slides and black frames score near zero.

use crate::error::{MediaError, MediaResult};

/// Target grid width/height the frame is downsampled to before measuring.
pub const SAMPLE_GRID: u32 = 64;

/// Gain applied to the mean luma delta before clamping into [0, 1].
/// Typical footage has mean deltas well under 0.25, so the gain spreads
/// real-world frames across the usable score range.
const ACTIVITY_GAIN: f64 = 4.0;

/// A decoded frame as an 8-bit luma plane.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl FrameBuffer {
    /// Wrap an existing luma plane. The buffer must hold exactly
    /// `width * height` bytes in row-major order.
    pub fn from_luma(width: u32, height: u32, luma: Vec<u8>) -> MediaResult<Self> {
        if width == 0 || height == 0 {
            return Err(MediaError::invalid_input("frame dimensions must be non-zero"));
        }
        let expected = width as usize * height as usize;
        if luma.len() != expected {
            return Err(MediaError::invalid_input(format!(
                "luma buffer holds {} bytes, expected {}",
                luma.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            luma,
        })
    }

    /// Convert packed RGBA pixels to a luma plane and wrap them.
    /// Brightness is the plain channel average, matching how the sampled
    /// canvas data was measured historically.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> MediaResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(MediaError::invalid_input(format!(
                "rgba buffer holds {} bytes, expected {}",
                rgba.len(),
                expected
            )));
        }
        let luma = rgba
            .chunks_exact(4)
            .map(|px| ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8)
            .collect();
        Self::from_luma(width, height, luma)
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn luma_at(&self, x: u32, y: u32) -> u8 {
        self.luma[y as usize * self.width as usize + x as usize]
    }

    /// Edge-change density of the frame in [0, 1].
    ///
    /// Walks a downsampled grid, accumulating absolute luma deltas between
    /// horizontally adjacent samples, then normalizes and applies the gain.
    pub fn activity_score(&self) -> f64 {
        let step_x = (self.width / SAMPLE_GRID).max(1);
        let step_y = (self.height / SAMPLE_GRID).max(1);

        let mut total_delta = 0u64;
        let mut count = 0u64;

        let mut y = 0;
        while y < self.height {
            let mut x = 0;
            while x + step_x < self.width {
                let here = self.luma_at(x, y) as i32;
                let next = self.luma_at(x + step_x, y) as i32;
                total_delta += (here - next).unsigned_abs() as u64;
                count += 1;
                x += step_x;
            }
            y += step_y;
        }

        if count == 0 {
            return 0.0;
        }

        let mean = total_delta as f64 / count as f64 / 255.0;
        (mean * ACTIVITY_GAIN).clamp(0.0, 1.0)
    }

    /// Motion score against an earlier frame in [0, 1].
    ///
    /// Mean absolute luma delta between the two frames over the sampled
    /// grid. Returns `None` when the frames differ in size, since the
    /// deltas would be meaningless.
    pub fn diff_score(&self, prev: &FrameBuffer) -> Option<f64> {
        if self.width != prev.width || self.height != prev.height {
            return None;
        }

        let step_x = (self.width / SAMPLE_GRID).max(1);
        let step_y = (self.height / SAMPLE_GRID).max(1);

        let mut total_delta = 0u64;
        let mut count = 0u64;

        let mut y = 0;
        while y < self.height {
            let mut x = 0;
            while x < self.width {
                let here = self.luma_at(x, y) as i32;
                let before = prev.luma_at(x, y) as i32;
                total_delta += (here - before).unsigned_abs() as u64;
                count += 1;
                x += step_x;
            }
            y += step_y;
        }

        if count == 0 {
            return Some(0.0);
        }

        let mean = total_delta as f64 / count as f64 / 255.0;
        Some((mean * ACTIVITY_GAIN).clamp(0.0, 1.0))
    }
}
