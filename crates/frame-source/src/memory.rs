//! In-memory frame source.

use image::RgbImage;
use pitchlens_common::clock::{FrameClock, StrideSampler};
use pitchlens_common::error::PitchlensResult;

use crate::{Frame, FrameSource};

/// Frames held in memory. Used for synthetic clips and tests.
#[derive(Debug, Clone)]
pub struct MemorySource {
    images: Vec<RgbImage>,
    clock: FrameClock,
    sampler: StrideSampler,
    cursor: u64,
    released: bool,
}

impl MemorySource {
    pub fn new(images: Vec<RgbImage>, stride: usize) -> PitchlensResult<Self> {
        Ok(Self {
            images,
            clock: FrameClock::default(),
            sampler: StrideSampler::new(stride)?,
            cursor: 0,
            released: false,
        })
    }

    /// Set the frame rate used for timestamps.
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.clock = FrameClock::new(fps);
        self
    }
}

impl FrameSource for MemorySource {
    fn total_frames(&self) -> u64 {
        self.images.len() as u64
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn stride(&self) -> u64 {
        self.sampler.stride()
    }

    fn dimensions(&self) -> (u32, u32) {
        self.images
            .first()
            .map(|img| img.dimensions())
            .unwrap_or((0, 0))
    }

    fn next_frame(&mut self) -> PitchlensResult<Option<Frame>> {
        if self.released {
            return Ok(None);
        }
        let index = self.sampler.next_sampled(self.cursor);
        let Some(image) = self.images.get(index as usize) else {
            self.cursor = self.total_frames();
            return Ok(None);
        };
        self.cursor = index + 1;
        Ok(Some(Frame::new(
            index,
            self.clock.timestamp_secs(index),
            image.clone(),
        )))
    }

    fn release(&mut self) {
        self.released = true;
        self.images.clear();
    }

    fn is_released(&self) -> bool {
        self.released
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn blank_frames(count: usize) -> Vec<RgbImage> {
        (0..count)
            .map(|_| RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])))
            .collect()
    }

    #[test]
    fn test_memory_source_stride_and_timestamps() {
        let mut source = MemorySource::new(blank_frames(10), 4).unwrap().with_fps(20.0);
        let mut frames = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            frames.push((frame.index, frame.timestamp_secs));
        }
        assert_eq!(frames.len(), 3); // 0, 4, 8
        assert_eq!(frames[1].0, 4);
        assert!((frames[2].1 - 0.4).abs() < 1e-9);
        assert_eq!(source.position(), 10);
    }

    #[test]
    fn test_memory_source_indices_strictly_increase() {
        let mut source = MemorySource::new(blank_frames(5), 1).unwrap();
        let mut last = None;
        while let Some(frame) = source.next_frame().unwrap() {
            if let Some(prev) = last {
                assert!(frame.index > prev);
            }
            last = Some(frame.index);
        }
        assert_eq!(last, Some(4));
    }

    #[test]
    fn test_memory_source_release() {
        let mut source = MemorySource::new(blank_frames(3), 1).unwrap();
        assert!(source.next_frame().unwrap().is_some());
        source.release();
        assert!(source.is_released());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_zero_stride_rejected() {
        assert!(MemorySource::new(blank_frames(1), 0).is_err());
    }
}
