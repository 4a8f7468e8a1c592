//! Analyze a clip and emit the run report.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use pitchlens_common::config::AnalysisDefaults;
use pitchlens_common::error::PitchlensError;
use pitchlens_pipeline::job::{parse_joint, parse_policy};
use pitchlens_pipeline::{
    load_stat_records, run_analysis, AnalysisJob, AnalysisProgress, ReplayPoseEstimator,
    RunControl,
};
use pitchlens_processing_core::motion::MotionConfig;
use pitchlens_processing_core::{NullPoseEstimator, PoseEstimator};

use crate::AnalyzeArgs;

pub async fn run(args: AnalyzeArgs, defaults: &AnalysisDefaults) -> anyhow::Result<()> {
    let job = build_job(&args, defaults)?;

    eprintln!("Analyzing: {}", job.video.display());
    eprintln!("  Position: {}", job.position);
    eprintln!("  Stride: {}", job.stride);
    if !job.stat_records.is_empty() {
        eprintln!("  Stat sources: {}", job.stat_records.len());
    }

    let estimator: Box<dyn PoseEstimator> = match &args.landmarks {
        Some(path) => Box::new(ReplayPoseEstimator::new(path)),
        None => Box::new(NullPoseEstimator),
    };

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            flag.store(true, Ordering::SeqCst);
        }
    });

    let progress_cb: Box<dyn Fn(AnalysisProgress) + Send> = Box::new(|p: AnalysisProgress| {
        match p.fraction() {
            Some(f) => eprint!(
                "\r  Progress: {:.1}% ({}/{} frames)  ",
                f * 100.0,
                p.processed,
                p.total
            ),
            None => eprint!("\r  Progress: {} frames  ", p.processed),
        }
        let _ = std::io::stderr().flush();
    });
    let control = RunControl::default()
        .with_progress(progress_cb)
        .with_cancel(cancel);

    let result = tokio::task::spawn_blocking(move || run_analysis(&job, estimator, control)).await?;
    eprintln!();

    let report = match result {
        Ok(report) => report,
        Err(PitchlensError::Cancelled { processed }) => {
            anyhow::bail!("Analysis cancelled after {processed} frame(s)");
        }
        Err(e) => return Err(anyhow::anyhow!("Analysis failed: {e}")),
    };

    for warning in &report.warnings {
        eprintln!("  warning: {warning}");
    }
    if let Some(score) = &report.score {
        for warning in &score.warnings {
            eprintln!("  warning: {warning}");
        }
        eprintln!("  Score: {:.2}", score.value);
    }
    eprintln!(
        "  Trajectory: {} points, {}",
        report.trajectory.points.len(),
        report.trajectory.curve_class.as_str()
    );
    eprintln!(
        "  Events: {} on-object, {} off-object",
        report.events.on_object_count, report.events.off_object_count
    );
    eprintln!("  Zone: {}", report.zones.dominant_zone_label);

    match &args.output {
        Some(path) => {
            report.write_to(path)?;
            eprintln!("\nReport written to: {}", path.display());
        }
        None => println!("{}", report.to_json_pretty()?),
    }

    Ok(())
}

/// Merge configured defaults with command-line overrides.
fn build_job(args: &AnalyzeArgs, defaults: &AnalysisDefaults) -> anyhow::Result<AnalysisJob> {
    let mut job = AnalysisJob::from_defaults(&args.video, &args.position, defaults)?;

    if let Some(stride) = args.stride {
        job.stride = stride;
    }
    if args.high_glare {
        job.motion.threshold = MotionConfig::high_glare().threshold;
    }
    if let Some(threshold) = args.threshold {
        job.motion.threshold = threshold;
    }
    if let Some(min_area) = args.min_area {
        job.motion.min_area = min_area;
    }
    if let Some(policy) = &args.event_policy {
        job.events.policy = parse_policy(policy)?;
    }
    if let Some(joint) = &args.tracked_joint {
        job.events.tracked_joint = parse_joint(joint)?;
    }
    if let Some(min_visibility) = args.min_visibility {
        job.min_visibility = min_visibility;
    }
    job.fps_hint = args.fps;
    job.validate()?;

    job.stat_records = load_stat_records(&args.stats)?;
    Ok(job)
}
