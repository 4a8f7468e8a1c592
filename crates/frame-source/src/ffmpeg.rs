//! ffmpeg-backed frame decoding.
//!
//! The file is probed with `ffprobe`, then decoded by an `ffmpeg` child that
//! writes raw `rgb24` frames to stdout. Striding is pushed into ffmpeg's
//! `select` filter so skipped frames are dropped before pixel conversion and
//! never cross the pipe.

use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use image::RgbImage;
use pitchlens_common::clock::{FrameClock, StrideSampler};
use pitchlens_common::error::{PitchlensError, PitchlensResult};
use serde::Deserialize;

use crate::{Frame, FrameSource, VideoInfo};

const BYTES_PER_PIXEL: usize = 3;

/// Video decoded by an `ffmpeg` child process.
pub struct FfmpegFrameSource {
    path: PathBuf,
    info: VideoInfo,
    clock: FrameClock,
    sampler: StrideSampler,
    child: Option<Child>,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<String>>,
    emitted: u64,
    exhausted: bool,
    released: bool,
}

impl FfmpegFrameSource {
    /// Probe and start decoding `path`.
    pub fn open(path: &Path, stride: usize) -> PitchlensResult<Self> {
        if !path.exists() {
            return Err(PitchlensError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let sampler = StrideSampler::new(stride)?;
        let info = probe_video(path)?;

        let args = decode_args(path, sampler.stride());
        tracing::debug!(args = ?args, "Starting ffmpeg decoder");
        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| PitchlensError::decode(format!("Failed to start ffmpeg: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PitchlensError::decode("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| PitchlensError::decode("Failed to capture ffmpeg stderr"))?;

        // ffmpeg blocks once the stderr pipe fills, so it is drained on its own thread.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        tracing::info!(
            path = %path.display(),
            pid = child.id(),
            width = info.width,
            height = info.height,
            fps = info.fps,
            total_frames = info.total_frames,
            stride = sampler.stride(),
            "ffmpeg decoder started"
        );

        Ok(Self {
            path: path.to_path_buf(),
            info,
            clock: FrameClock::new(info.fps),
            sampler,
            child: Some(child),
            stdout: Some(BufReader::new(stdout)),
            stderr_task: Some(stderr_task),
            emitted: 0,
            exhausted: false,
            released: false,
        })
    }

    fn frame_len(&self) -> usize {
        self.info.width as usize * self.info.height as usize * BYTES_PER_PIXEL
    }

    /// Wait for the child after stdout closed and surface a decode failure.
    fn finish_decoder(&mut self) -> PitchlensResult<()> {
        self.stdout = None;
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child
            .wait()
            .map_err(|e| PitchlensError::decode(format!("Failed to wait on ffmpeg: {e}")))?;
        let stderr_output = self.join_stderr();

        if !status.success() {
            return Err(PitchlensError::decode(format!(
                "ffmpeg decode of {} failed (status {}): {}",
                self.path.display(),
                status,
                stderr_output.trim()
            )));
        }
        Ok(())
    }

    fn join_stderr(&mut self) -> String {
        self.stderr_task
            .take()
            .map(|task| {
                task.join()
                    .unwrap_or_else(|_| "<failed to join stderr reader>".to_string())
            })
            .unwrap_or_default()
    }
}

impl FrameSource for FfmpegFrameSource {
    fn total_frames(&self) -> u64 {
        self.info.total_frames
    }

    fn position(&self) -> u64 {
        self.emitted * self.sampler.stride()
    }

    fn stride(&self) -> u64 {
        self.sampler.stride()
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }

    fn next_frame(&mut self) -> PitchlensResult<Option<Frame>> {
        if self.exhausted || self.released {
            return Ok(None);
        }

        let frame_len = self.frame_len();
        let Some(reader) = self.stdout.as_mut() else {
            return Ok(None);
        };

        let mut buffer = vec![0u8; frame_len];
        let filled = read_full(reader, &mut buffer)
            .map_err(|e| PitchlensError::decode(format!("Failed reading ffmpeg output: {e}")))?;

        if filled < frame_len {
            if filled > 0 {
                tracing::warn!(
                    bytes = filled,
                    expected = frame_len,
                    "Discarding truncated trailing frame"
                );
            }
            self.exhausted = true;
            self.finish_decoder()?;
            tracing::debug!(frames = self.emitted, "ffmpeg stream exhausted");
            return Ok(None);
        }

        let image = RgbImage::from_raw(self.info.width, self.info.height, buffer)
            .ok_or_else(|| PitchlensError::decode("Raw frame size does not match dimensions"))?;
        let index = self.emitted * self.sampler.stride();
        self.emitted += 1;

        Ok(Some(Frame::new(
            index,
            self.clock.timestamp_secs(index),
            image,
        )))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.stdout = None;
        if let Some(mut child) = self.child.take() {
            if let Err(err) = child.kill() {
                if err.kind() != ErrorKind::InvalidInput {
                    tracing::debug!(error = %err, "ffmpeg already exited");
                }
            }
            let _ = child.wait();
        }
        self.join_stderr();
        tracing::debug!(path = %self.path.display(), "ffmpeg decoder released");
    }

    fn is_released(&self) -> bool {
        self.released
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Read until `buf` is full or the stream ends. Returns the bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn decode_args(path: &Path, stride: u64) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-nostdin".to_string(),
        "-i".to_string(),
        path.display().to_string(),
        "-map".to_string(),
        "0:v:0".to_string(),
    ];
    if stride > 1 {
        args.push("-vf".to_string());
        args.push(format!("select=not(mod(n\\,{stride}))"));
        args.push("-vsync".to_string());
        args.push("0".to_string());
    }
    args.extend([
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "pipe:1".to_string(),
    ]);
    args
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    nb_read_packets: Option<String>,
}

/// Probe width, height, frame rate, and frame count with `ffprobe`.
pub fn probe_video(path: &Path) -> PitchlensResult<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-count_packets",
            "-show_entries",
            "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames,nb_read_packets",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| PitchlensError::decode(format!("Failed to start ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(PitchlensError::decode(format!(
            "ffprobe could not read {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&raw)
}

/// Parse `ffprobe -of json` stream output.
pub fn parse_probe_output(raw: &str) -> PitchlensResult<VideoInfo> {
    let parsed: ProbeOutput = serde_json::from_str(raw)?;
    let stream = parsed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| PitchlensError::decode("No video stream found"))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(PitchlensError::decode("Video stream has no dimensions")),
    };

    let fps = stream
        .avg_frame_rate
        .as_deref()
        .and_then(parse_rate)
        .or_else(|| stream.r_frame_rate.as_deref().and_then(parse_rate))
        .unwrap_or(pitchlens_common::clock::DEFAULT_FPS);

    let total_frames = stream
        .nb_read_packets
        .as_deref()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or_else(|| {
            stream
                .nb_frames
                .as_deref()
                .and_then(|v| v.trim().parse::<u64>().ok())
        })
        .unwrap_or(0);

    Ok(VideoInfo {
        width,
        height,
        fps,
        total_frames,
    })
}

/// Parse an ffprobe rational such as `30000/1001`.
fn parse_rate(raw: &str) -> Option<f64> {
    let (num, den) = match raw.split_once('/') {
        Some((n, d)) => (n.trim().parse::<f64>().ok()?, d.trim().parse::<f64>().ok()?),
        None => (raw.trim().parse::<f64>().ok()?, 1.0),
    };
    if den == 0.0 {
        return None;
    }
    let rate = num / den;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Whether both `ffmpeg` and `ffprobe` are on `PATH`.
pub fn is_ffmpeg_available() -> bool {
    command_exists("ffmpeg") && command_exists("ffprobe")
}

/// Whether `binary` resolves on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let raw = r#"{
            "streams": [
                {
                    "width": 1280,
                    "height": 720,
                    "r_frame_rate": "30/1",
                    "avg_frame_rate": "30000/1001",
                    "nb_frames": "300",
                    "nb_read_packets": "299"
                }
            ]
        }"#;
        let info = parse_probe_output(raw).unwrap();
        assert_eq!((info.width, info.height), (1280, 720));
        assert!((info.fps - 29.97).abs() < 0.01);
        assert_eq!(info.total_frames, 299);
    }

    #[test]
    fn test_parse_probe_output_without_counts() {
        let raw = r#"{"streams":[{"width":640,"height":480,"r_frame_rate":"25/1","avg_frame_rate":"0/0"}]}"#;
        let info = parse_probe_output(raw).unwrap();
        assert_eq!(info.total_frames, 0);
        assert!((info.fps - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_probe_output_without_video_stream() {
        let err = parse_probe_output(r#"{"streams":[]}"#).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_parse_rate() {
        assert_eq!(parse_rate("25/1"), Some(25.0));
        assert_eq!(parse_rate("0/0"), None);
        assert_eq!(parse_rate("24"), Some(24.0));
        assert_eq!(parse_rate("abc"), None);
    }

    #[test]
    fn test_decode_args_stride() {
        let args = decode_args(Path::new("clip.mp4"), 3);
        assert!(args.contains(&"select=not(mod(n\\,3))".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("pipe:1"));

        let args = decode_args(Path::new("clip.mp4"), 1);
        assert!(!args.iter().any(|a| a.starts_with("select")));
    }

    #[test]
    fn test_read_full_reports_short_reads() {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = std::io::Cursor::new(&data[..]);
        let mut buf = [0u8; 4];
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), 4);
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), 1);
        assert_eq!(read_full(&mut cursor, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_open_missing_file() {
        let err = FfmpegFrameSource::open(Path::new("/no/such/clip.mp4"), 1)
            .err()
            .unwrap();
        assert!(matches!(err, PitchlensError::FileNotFound { .. }));
    }

    /// Encode a short `testsrc` clip, or `None` when ffmpeg is not installed.
    fn test_clip(name: &str, frames: u32) -> Option<PathBuf> {
        if !is_ffmpeg_available() {
            eprintln!("ffmpeg not available; skipping");
            return None;
        }
        let dir = std::env::temp_dir().join(format!("pitchlens-ffmpeg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let status = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
            .arg(format!("testsrc=size=64x48:rate=10:duration={}", frames as f64 / 10.0))
            .args(["-frames:v", &frames.to_string(), "-c:v", "mpeg4", "-pix_fmt", "yuv420p"])
            .arg(&path)
            .status()
            .unwrap();
        assert!(status.success());
        Some(path)
    }

    fn drain(source: &mut FfmpegFrameSource) -> Vec<u64> {
        let mut indices = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            assert_eq!(frame.image.dimensions(), (64, 48));
            indices.push(frame.index);
        }
        indices
    }

    #[test]
    fn test_decodes_every_frame() {
        let Some(path) = test_clip("every.mp4", 10) else {
            return;
        };
        let mut source = FfmpegFrameSource::open(&path, 1).unwrap();
        assert_eq!(source.dimensions(), (64, 48));
        assert_eq!(source.total_frames(), 10);

        let indices = drain(&mut source);
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
        assert_eq!(source.next_frame().unwrap().map(|f| f.index), None);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_stride_maps_selected_frames_to_source_indices() {
        let Some(path) = test_clip("stride.mp4", 10) else {
            return;
        };
        let mut source = FfmpegFrameSource::open(&path, 3).unwrap();
        let indices = drain(&mut source);
        assert_eq!(indices, vec![0, 3, 6, 9]);
        assert_eq!(source.position(), 12);

        let frame = FfmpegFrameSource::open(&path, 3)
            .unwrap()
            .next_frame()
            .unwrap()
            .unwrap();
        assert!((frame.timestamp_secs - 0.0).abs() < 1e-9);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_release_stops_decoding_midway() {
        let Some(path) = test_clip("release.mp4", 30) else {
            return;
        };
        let mut source = FfmpegFrameSource::open(&path, 1).unwrap();
        assert!(source.next_frame().unwrap().is_some());

        source.release();
        assert!(source.is_released());
        assert!(source.child.is_none());
        assert!(source.next_frame().unwrap().is_none());

        // A second release is a no-op.
        source.release();
        let _ = std::fs::remove_file(path);
    }
}
