//! Directory-of-images frame source.
//!
//! Frames are the image files in a directory, ordered by file name. Files
//! are decoded on demand, so frames skipped by the stride cost nothing.

use std::path::{Path, PathBuf};

use pitchlens_common::clock::{FrameClock, StrideSampler, DEFAULT_FPS};
use pitchlens_common::error::{PitchlensError, PitchlensResult};

use crate::{Frame, FrameSource, VideoInfo};

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

/// Still images read from a directory.
#[derive(Debug)]
pub struct ImageSequenceSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    dimensions: (u32, u32),
    clock: FrameClock,
    sampler: StrideSampler,
    cursor: u64,
    released: bool,
}

impl ImageSequenceSource {
    /// Index the image files in `dir`.
    ///
    /// `fps` sets frame timestamps; defaults to [`DEFAULT_FPS`].
    pub fn open(dir: &Path, stride: usize, fps: Option<f64>) -> PitchlensResult<Self> {
        let sampler = StrideSampler::new(stride)?;
        let files = list_frames(dir)?;
        let dimensions = match files.first() {
            Some(first) => image::image_dimensions(first).map_err(|e| {
                PitchlensError::decode(format!("Failed to read {}: {e}", first.display()))
            })?,
            None => (0, 0),
        };

        tracing::info!(
            dir = %dir.display(),
            frames = files.len(),
            stride = sampler.stride(),
            "Opened image sequence"
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
            dimensions,
            clock: FrameClock::new(fps.unwrap_or(DEFAULT_FPS)),
            sampler,
            cursor: 0,
            released: false,
        })
    }
}

impl FrameSource for ImageSequenceSource {
    fn total_frames(&self) -> u64 {
        self.files.len() as u64
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn stride(&self) -> u64 {
        self.sampler.stride()
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn next_frame(&mut self) -> PitchlensResult<Option<Frame>> {
        if self.released {
            return Ok(None);
        }
        let index = self.sampler.next_sampled(self.cursor);
        let Some(path) = self.files.get(index as usize) else {
            self.cursor = self.total_frames();
            return Ok(None);
        };

        let image = image::open(path)
            .map_err(|e| PitchlensError::decode(format!("Failed to decode {}: {e}", path.display())))?
            .to_rgb8();
        self.cursor = index + 1;

        Ok(Some(Frame::new(
            index,
            self.clock.timestamp_secs(index),
            image,
        )))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            tracing::debug!(dir = %self.dir.display(), "Image sequence released");
        }
    }

    fn is_released(&self) -> bool {
        self.released
    }

    fn name(&self) -> &str {
        "image-sequence"
    }
}

/// Probe a directory of frames without decoding pixels.
pub fn probe_sequence(dir: &Path, fps: Option<f64>) -> PitchlensResult<VideoInfo> {
    let source = ImageSequenceSource::open(dir, 1, fps)?;
    let (width, height) = source.dimensions();
    Ok(VideoInfo {
        width,
        height,
        fps: source.clock.fps(),
        total_frames: source.total_frames(),
    })
}

fn list_frames(dir: &Path) -> PitchlensResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if supported {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pitchlens-sequence-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_frames(dir: &Path, count: usize) {
        for i in 0..count {
            let img = RgbImage::from_pixel(8, 6, Rgb([i as u8 * 10, 0, 0]));
            img.save(dir.join(format!("frame_{i:04}.png"))).unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "not a frame").unwrap();
    }

    #[test]
    fn test_sequence_yields_sorted_frames() {
        let dir = scratch_dir("sorted");
        write_frames(&dir, 3);

        let mut source = ImageSequenceSource::open(&dir, 1, Some(10.0)).unwrap();
        assert_eq!(source.total_frames(), 3);
        assert_eq!(source.dimensions(), (8, 6));

        let mut seen = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            seen.push((frame.index, frame.image.get_pixel(0, 0).0[0]));
        }
        assert_eq!(seen, vec![(0, 0), (1, 10), (2, 20)]);
        assert_eq!(source.position(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_sequence_stride_skips_files() {
        let dir = scratch_dir("stride");
        write_frames(&dir, 7);

        let mut source = ImageSequenceSource::open(&dir, 3, None).unwrap();
        let mut indices = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            indices.push(frame.index);
        }
        assert_eq!(indices, vec![0, 3, 6]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_sequence_release_stops_stream() {
        let dir = scratch_dir("release");
        write_frames(&dir, 2);

        let mut source = ImageSequenceSource::open(&dir, 1, None).unwrap();
        source.release();
        assert!(source.is_released());
        assert!(source.next_frame().unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_probe_sequence() {
        let dir = scratch_dir("probe");
        write_frames(&dir, 4);

        let info = probe_sequence(&dir, Some(50.0)).unwrap();
        assert_eq!(info.total_frames, 4);
        assert_eq!((info.width, info.height), (8, 6));
        assert_eq!(info.fps, 50.0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
