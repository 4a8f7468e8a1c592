//! Check system capabilities.

use pitchlens_frame_source::{command_exists, is_ffmpeg_available};

pub fn run() -> anyhow::Result<()> {
    println!("PitchLens System Check");
    println!("{}", "=".repeat(50));

    let tools = [
        ("ffmpeg", "video decoding"),
        ("ffprobe", "video probing"),
    ];

    for (binary, purpose) in tools {
        if command_exists(binary) {
            println!("[OK] {binary} ({purpose})");
        } else {
            println!("[MISSING] {binary} ({purpose})");
        }
    }

    println!(
        "[OK] Config file: {}",
        pitchlens_common::config::config_file_path().display()
    );

    println!();
    if is_ffmpeg_available() {
        println!("All required tools are available. PitchLens is ready.");
    } else {
        println!("Video files need ffmpeg and ffprobe on PATH.");
        println!("Image-sequence directories can still be analyzed.");
    }

    Ok(())
}
