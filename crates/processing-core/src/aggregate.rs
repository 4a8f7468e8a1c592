//! Cross-source stat aggregation and position-weighted scoring.

use std::collections::BTreeMap;

use pitchlens_analysis_model::stats::{
    AggregatedScore, AggregationWarning, MetricValue, PositionCategory, StatRecord, WeightProfile,
};
use pitchlens_common::error::{PitchlensError, PitchlensResult};

/// Merges stat records into one composite score.
#[derive(Debug, Clone)]
pub struct StatAggregator {
    position: Option<PositionCategory>,
    profile: WeightProfile,
}

impl StatAggregator {
    /// Aggregator using the built-in profile for `position`.
    pub fn for_position(position: PositionCategory) -> Self {
        Self {
            position: Some(position),
            profile: WeightProfile::for_position(position),
        }
    }

    /// Parse a position name and select its profile.
    ///
    /// Unknown names fail with `UnknownPositionCategory`.
    pub fn from_position_name(name: &str) -> PitchlensResult<Self> {
        Ok(Self::for_position(name.parse()?))
    }

    /// Aggregator with a caller-supplied profile.
    pub fn with_profile(profile: WeightProfile) -> Self {
        Self {
            position: None,
            profile,
        }
    }

    pub fn position(&self) -> Option<PositionCategory> {
        self.position
    }

    pub fn profile(&self) -> &WeightProfile {
        &self.profile
    }

    /// Average every metric of the primary (first) record across sources and
    /// compute the weighted score.
    ///
    /// A metric that any source reports as text is left out and produces a
    /// warning. Sources without a metric do not count toward its average.
    pub fn aggregate(&self, records: &[StatRecord]) -> PitchlensResult<AggregatedScore> {
        let primary = records
            .first()
            .ok_or_else(|| PitchlensError::stats("no stat records to aggregate"))?;

        let mut averaged = BTreeMap::new();
        let mut warnings = Vec::new();

        for key in primary.keys() {
            let mut values = Vec::with_capacity(records.len());
            let mut text_sources = Vec::new();
            for record in records {
                match record.value(&key) {
                    Some(MetricValue::Numeric(v)) => values.push(v),
                    Some(MetricValue::Text(_)) => text_sources.push(record.source.clone()),
                    None => {}
                }
            }

            if !text_sources.is_empty() {
                for source in text_sources {
                    tracing::warn!(metric = %key, source = %source, "Non-numeric metric excluded");
                    warnings.push(AggregationWarning::NonNumericMetric {
                        metric: key.clone(),
                        source,
                    });
                }
                continue;
            }

            // Sorted summation keeps the result independent of source order.
            values.sort_by(f64::total_cmp);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            averaged.insert(key, mean);
        }

        let value = self.score(&averaged);
        tracing::debug!(
            sources = records.len(),
            metrics = averaged.len(),
            score = value,
            "Stat records aggregated"
        );

        Ok(AggregatedScore {
            position: self.position,
            value,
            averaged,
            weighted_metrics: self.profile.len(),
            warnings,
        })
    }

    /// Weighted mean over the profile's metrics, rounded to two decimals.
    pub fn score(&self, averaged: &BTreeMap<String, f64>) -> f64 {
        if self.profile.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .profile
            .entries()
            .map(|(key, weight)| averaged.get(key).copied().unwrap_or(0.0) * weight)
            .sum();
        round2(total / self.profile.len() as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
