//! Aggregate stat tables into a position-weighted score.

use std::path::PathBuf;

use pitchlens_pipeline::load_stat_records;
use pitchlens_processing_core::StatAggregator;

pub fn run(position: &str, stats: &[PathBuf]) -> anyhow::Result<()> {
    // Position is validated before any file is read.
    let aggregator = StatAggregator::from_position_name(position)?;
    let records = load_stat_records(stats)?;

    let score = aggregator.aggregate(&records)?;
    for warning in &score.warnings {
        eprintln!("  warning: {warning}");
    }

    println!("{}", serde_json::to_string_pretty(&score)?);
    Ok(())
}
