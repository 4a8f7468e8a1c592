//! Show video information.

use std::path::Path;

pub fn run(video: &Path) -> anyhow::Result<()> {
    let info = pitchlens_frame_source::probe(video)
        .map_err(|e| anyhow::anyhow!("Failed to probe {}: {e}", video.display()))?;

    println!("Video: {}", video.display());
    println!("  Resolution: {}x{}", info.width, info.height);
    println!("  Frame rate: {:.3} fps", info.fps);
    if info.total_frames > 0 {
        println!(
            "  Frames: {} ({:.1}s)",
            info.total_frames,
            info.total_frames as f64 / info.fps
        );
    } else {
        println!("  Frames: unknown");
    }

    Ok(())
}
