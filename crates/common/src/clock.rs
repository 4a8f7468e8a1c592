//! Frame timing and sampling utilities.
//!
//! Every analysed frame is identified by its index in the decoded stream.
//! This module provides utilities for:
//! - Converting frame indices to presentation timestamps
//! - Sampling every Nth frame (stride)
//! - Predicting how many frames a strided run will yield

use crate::error::{PitchlensError, PitchlensResult};

/// Fallback frame rate when a source does not report one.
pub const DEFAULT_FPS: f64 = 30.0;

/// Maps frame indices to timestamps for a constant-rate stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// Create a clock for the given frame rate.
    ///
    /// Non-positive or non-finite rates fall back to [`DEFAULT_FPS`].
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            DEFAULT_FPS
        };
        Self { fps }
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Timestamp of a frame in seconds since the start of the stream.
    pub fn timestamp_secs(&self, frame_index: u64) -> f64 {
        frame_index as f64 / self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

/// Selects every `stride`-th frame of a stream (indices 0, s, 2s, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrideSampler {
    stride: u64,
}

impl StrideSampler {
    /// Create a sampler. A stride of zero is rejected.
    pub fn new(stride: usize) -> PitchlensResult<Self> {
        if stride == 0 {
            return Err(PitchlensError::config("stride must be at least 1"));
        }
        Ok(Self {
            stride: stride as u64,
        })
    }

    /// The sampling interval.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Index of the first sampled frame at or after `index`.
    pub fn next_sampled(&self, index: u64) -> u64 {
        index.div_ceil(self.stride) * self.stride
    }

    /// Number of frames yielded from a stream of `total_frames` (`ceil(total / stride)`).
    pub fn expected_samples(&self, total_frames: u64) -> u64 {
        total_frames.div_ceil(self.stride)
    }
}

impl Default for StrideSampler {
    fn default() -> Self {
        Self { stride: 1 }
    }
}
