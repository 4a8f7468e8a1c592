//! Stat record files.

use std::path::Path;

use pitchlens_analysis_model::stats::StatRecord;
use pitchlens_common::error::{PitchlensError, PitchlensResult};

/// Load one stat table from a JSON file. The file stem names the source.
pub fn load_stat_record(path: &Path) -> PitchlensResult<StatRecord> {
    if !path.exists() {
        return Err(PitchlensError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let source = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let text = std::fs::read_to_string(path)?;
    let record = StatRecord::from_json_str(source, &text)?;
    tracing::debug!(
        path = %path.display(),
        source = %record.source,
        metrics = record.keys().len(),
        "Loaded stat record"
    );
    Ok(record)
}

/// Load stat tables in order; the first file is the primary source.
pub fn load_stat_records<P: AsRef<Path>>(paths: &[P]) -> PitchlensResult<Vec<StatRecord>> {
    paths.iter().map(|p| load_stat_record(p.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchlens_analysis_model::stats::MetricValue;

    #[test]
    fn test_load_record_uses_file_stem() {
        let dir = std::env::temp_dir().join(format!("pitchlens-records-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fbref.json");
        std::fs::write(&path, r#"{"Goals": "12", "xG": 9.5, "preferred_foot": "left"}"#).unwrap();

        let records = load_stat_records(&[&path]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "fbref");
        assert_eq!(records[0].value("goals"), Some(MetricValue::Numeric(12.0)));
        assert_eq!(
            records[0].value("preferred_foot"),
            Some(MetricValue::Text("left".to_string()))
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_record_file() {
        let err = load_stat_record(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.is_io());
    }
}
