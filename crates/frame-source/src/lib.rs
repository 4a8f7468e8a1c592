//! PitchLens Frame Sources
//!
//! Turns a video resource into an ordered stream of RGB frames:
//! - **ffmpeg:** Any container/codec ffmpeg can read, decoded in a child process
//! - **Image sequence:** A directory of still frames, read with random access
//! - **Memory:** Frames already in memory (synthetic input, tests)
//!
//! Every source honours a stride: only frames `0, s, 2s, ...` are yielded.
//! A source is a scoped resource; callers must [`FrameSource::release`] it on
//! every exit path (it is also released on drop).

pub mod ffmpeg;
pub mod memory;
pub mod sequence;

use std::path::Path;

use image::{GrayImage, RgbImage};
use pitchlens_common::error::{PitchlensError, PitchlensResult};
use serde::{Deserialize, Serialize};

pub use ffmpeg::{command_exists, is_ffmpeg_available, FfmpegFrameSource};
pub use memory::MemorySource;
pub use sequence::ImageSequenceSource;

/// One decoded frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Index in the full (unstrided) stream.
    pub index: u64,
    /// Presentation time in seconds.
    pub timestamp_secs: f64,
    pub image: RgbImage,
}

impl Frame {
    pub fn new(index: u64, timestamp_secs: f64, image: RgbImage) -> Self {
        Self {
            index,
            timestamp_secs,
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Single-channel intensity view of the frame.
    pub fn luma(&self) -> GrayImage {
        image::imageops::grayscale(&self.image)
    }
}

/// Stream properties reported by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Frame count; 0 when the container does not report one.
    pub total_frames: u64,
}

/// An ordered source of frames.
pub trait FrameSource: Send {
    /// Total frames in the underlying stream, before striding.
    fn total_frames(&self) -> u64;

    /// Index of the next underlying frame the source will read.
    fn position(&self) -> u64;

    /// Sampling interval.
    fn stride(&self) -> u64;

    /// Frame dimensions.
    fn dimensions(&self) -> (u32, u32);

    /// Next sampled frame. `Ok(None)` means the stream is exhausted; that is
    /// the normal end of a run, not an error.
    fn next_frame(&mut self) -> PitchlensResult<Option<Frame>>;

    /// Free decoder resources. Safe to call more than once.
    fn release(&mut self);

    /// Whether `release` has run.
    fn is_released(&self) -> bool;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Open a video file or an image-sequence directory.
///
/// Fails immediately when the path does not exist.
pub fn open_source(
    path: &Path,
    stride: usize,
    fps_hint: Option<f64>,
) -> PitchlensResult<Box<dyn FrameSource>> {
    if !path.exists() {
        return Err(PitchlensError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_dir() {
        let source = ImageSequenceSource::open(path, stride, fps_hint)?;
        Ok(Box::new(source))
    } else {
        let source = FfmpegFrameSource::open(path, stride)?;
        Ok(Box::new(source))
    }
}

/// Inspect a video file or image-sequence directory without decoding frames.
pub fn probe(path: &Path) -> PitchlensResult<VideoInfo> {
    if !path.exists() {
        return Err(PitchlensError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_dir() {
        sequence::probe_sequence(path, None)
    } else {
        ffmpeg::probe_video(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_open_missing_path_fails_immediately() {
        let path = PathBuf::from("/definitely/not/here/clip.mp4");
        let err = open_source(&path, 1, None).err().unwrap();
        assert!(matches!(err, PitchlensError::FileNotFound { .. }));
        assert!(err.is_io());
    }

    #[test]
    fn test_probe_missing_path() {
        let err = probe(Path::new("/definitely/not/here")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_frame_luma_conversion() {
        let image = RgbImage::from_pixel(4, 2, image::Rgb([255, 255, 255]));
        let frame = Frame::new(0, 0.0, image);
        let luma = frame.luma();
        assert_eq!(luma.dimensions(), (4, 2));
        assert_eq!(luma.get_pixel(0, 0).0[0], 255);
    }
}
