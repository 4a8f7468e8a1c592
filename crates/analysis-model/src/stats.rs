//! External stat records, position weight profiles, and composite scores.
//!
//! Stat tables arrive from outside collaborators as flat JSON objects whose
//! values may be numbers, numeric strings (`"9.5"`, `"82.5%"`), or free text
//! (`"penalty box, right half-space"`). A [`StatRecord`] splits them into
//! typed known metrics, a numeric overflow bucket, and a text bucket so the
//! aggregator never has to probe value types at run time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use pitchlens_common::error::{PitchlensError, PitchlensResult};
use serde::{Deserialize, Serialize};

/// Metrics with a fixed meaning across stat sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Goals,
    #[serde(rename = "xg")]
    ExpectedGoals,
    #[serde(rename = "xgot")]
    ExpectedGoalsOnTarget,
    Assists,
    #[serde(rename = "xa")]
    ExpectedAssists,
    PassSuccessRate,
    ProgressivePasses,
    PenetrationSuccessRate,
    DribbleSuccessRate,
    ShotAccuracy,
    BallPossessionTime,
    PassesPerGame,
    Tackles,
    Interceptions,
    Clearances,
    AerialDuelsWon,
}

impl Metric {
    pub const ALL: [Metric; 16] = [
        Metric::Goals,
        Metric::ExpectedGoals,
        Metric::ExpectedGoalsOnTarget,
        Metric::Assists,
        Metric::ExpectedAssists,
        Metric::PassSuccessRate,
        Metric::ProgressivePasses,
        Metric::PenetrationSuccessRate,
        Metric::DribbleSuccessRate,
        Metric::ShotAccuracy,
        Metric::BallPossessionTime,
        Metric::PassesPerGame,
        Metric::Tackles,
        Metric::Interceptions,
        Metric::Clearances,
        Metric::AerialDuelsWon,
    ];

    /// Canonical key used in weight profiles and reports.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Goals => "goals",
            Self::ExpectedGoals => "xg",
            Self::ExpectedGoalsOnTarget => "xgot",
            Self::Assists => "assists",
            Self::ExpectedAssists => "xa",
            Self::PassSuccessRate => "pass_success_rate",
            Self::ProgressivePasses => "progressive_passes",
            Self::PenetrationSuccessRate => "penetration_success_rate",
            Self::DribbleSuccessRate => "dribble_success_rate",
            Self::ShotAccuracy => "shot_accuracy",
            Self::BallPossessionTime => "ball_possession_time",
            Self::PassesPerGame => "passes_per_game",
            Self::Tackles => "tackles",
            Self::Interceptions => "interceptions",
            Self::Clearances => "clearances",
            Self::AerialDuelsWon => "aerial_duels_won",
        }
    }

    /// Display-label spellings seen in third-party stat tables, normalized.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Goals => &["goal", "gls", "골"],
            Self::ExpectedGoals => &[
                "expected_goals",
                "expected_goals_xg",
                "xg_expected_goals",
                "골_기대값_xg",
                "골_기대값",
            ],
            Self::ExpectedGoalsOnTarget => &[
                "expected_goals_on_target",
                "expected_goals_on_target_xgot",
                "xg_on_target",
                "xgot_on_target",
            ],
            Self::Assists => &["assist", "ast", "도움"],
            Self::ExpectedAssists => &["expected_assists", "expected_assists_xa"],
            Self::PassSuccessRate => &[
                "pass_completion",
                "pass_completion_rate",
                "pass_accuracy",
                "패스_성공률",
            ],
            Self::ProgressivePasses => &["prog_passes", "prgp", "forward_passes", "전진_패스"],
            Self::PenetrationSuccessRate => &[
                "penetration_rate",
                "penetration_success",
                "침투_성공률",
            ],
            Self::DribbleSuccessRate => &["dribble_success", "take_on_success_rate"],
            Self::ShotAccuracy => &["shots_on_target_pct", "shot_on_target_rate"],
            Self::BallPossessionTime => &["possession_time", "ball_possession"],
            Self::PassesPerGame => &["pass_per_game", "passes_per_90"],
            Self::Tackles => &["tkl", "tackles_won"],
            Self::Interceptions => &["int"],
            Self::Clearances => &["clr"],
            Self::AerialDuelsWon => &["aerials_won", "aerial_duels"],
        }
    }

    /// Resolve a raw table key (canonical, alias, or display label) to a metric.
    pub fn from_key(raw: &str) -> Option<Metric> {
        let key = normalize_key(raw);
        Metric::ALL
            .iter()
            .copied()
            .find(|metric| metric.key() == key || metric.aliases().contains(&key.as_str()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lowercase a label and collapse every non-alphanumeric run to `_`.
///
/// `"Expected Assists (xA)"` becomes `"expected_assists_xa"`.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Key under which a raw table key is stored and matched across sources.
///
/// Known metrics map to their canonical key; anything else to its normalized label.
pub fn canonical_key(raw: &str) -> String {
    match Metric::from_key(raw) {
        Some(metric) => metric.key().to_string(),
        None => normalize_key(raw),
    }
}

/// A single stat value as seen by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Numeric(f64),
    Text(String),
}

impl MetricValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{v}"),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// Typed slots for the known metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnownMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xgot: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assists: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progressive_passes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penetration_success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dribble_success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shot_accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_possession_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passes_per_game: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tackles: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interceptions: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearances: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aerial_duels_won: Option<f64>,
}

impl KnownMetrics {
    fn slot(&mut self, metric: Metric) -> &mut Option<f64> {
        match metric {
            Metric::Goals => &mut self.goals,
            Metric::ExpectedGoals => &mut self.xg,
            Metric::ExpectedGoalsOnTarget => &mut self.xgot,
            Metric::Assists => &mut self.assists,
            Metric::ExpectedAssists => &mut self.xa,
            Metric::PassSuccessRate => &mut self.pass_success_rate,
            Metric::ProgressivePasses => &mut self.progressive_passes,
            Metric::PenetrationSuccessRate => &mut self.penetration_success_rate,
            Metric::DribbleSuccessRate => &mut self.dribble_success_rate,
            Metric::ShotAccuracy => &mut self.shot_accuracy,
            Metric::BallPossessionTime => &mut self.ball_possession_time,
            Metric::PassesPerGame => &mut self.passes_per_game,
            Metric::Tackles => &mut self.tackles,
            Metric::Interceptions => &mut self.interceptions,
            Metric::Clearances => &mut self.clearances,
            Metric::AerialDuelsWon => &mut self.aerial_duels_won,
        }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Goals => self.goals,
            Metric::ExpectedGoals => self.xg,
            Metric::ExpectedGoalsOnTarget => self.xgot,
            Metric::Assists => self.assists,
            Metric::ExpectedAssists => self.xa,
            Metric::PassSuccessRate => self.pass_success_rate,
            Metric::ProgressivePasses => self.progressive_passes,
            Metric::PenetrationSuccessRate => self.penetration_success_rate,
            Metric::DribbleSuccessRate => self.dribble_success_rate,
            Metric::ShotAccuracy => self.shot_accuracy,
            Metric::BallPossessionTime => self.ball_possession_time,
            Metric::PassesPerGame => self.passes_per_game,
            Metric::Tackles => self.tackles,
            Metric::Interceptions => self.interceptions,
            Metric::Clearances => self.clearances,
            Metric::AerialDuelsWon => self.aerial_duels_won,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        *self.slot(metric) = value;
    }

    /// Known metrics that carry a value.
    pub fn present(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL
            .into_iter()
            .filter_map(move |metric| self.get(metric).map(|v| (metric, v)))
    }
}

/// One external source's table of metrics for a subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Where the table came from (site name, file name, ...).
    pub source: String,

    #[serde(default)]
    pub known: KnownMetrics,

    /// Numeric metrics outside the known set, keyed by their normalized label.
    #[serde(default)]
    pub other: BTreeMap<String, f64>,

    /// Descriptive, non-numeric entries. Never aggregated.
    #[serde(default)]
    pub text: BTreeMap<String, String>,
}

impl StatRecord {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    /// Insert a numeric value under a raw table key.
    pub fn with_number(mut self, key: &str, value: f64) -> Self {
        self.insert(key, MetricValue::Numeric(value));
        self
    }

    /// Insert a descriptive value under a raw table key.
    pub fn with_text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.insert(key, MetricValue::Text(value.into()));
        self
    }

    /// Insert a value, replacing whatever was stored under the same key.
    pub fn insert(&mut self, key: &str, value: MetricValue) {
        let canonical = canonical_key(key);
        self.remove(&canonical);
        match (Metric::from_key(key), value) {
            (Some(metric), MetricValue::Numeric(v)) => self.known.set(metric, Some(v)),
            (None, MetricValue::Numeric(v)) => {
                self.other.insert(canonical, v);
            }
            (_, MetricValue::Text(t)) => {
                self.text.insert(canonical, t);
            }
        }
    }

    fn remove(&mut self, canonical: &str) {
        if let Some(metric) = Metric::from_key(canonical) {
            self.known.set(metric, None);
        }
        self.other.remove(canonical);
        self.text.remove(canonical);
    }

    /// Look up a value by any key spelling.
    pub fn value(&self, key: &str) -> Option<MetricValue> {
        let canonical = canonical_key(key);
        if let Some(metric) = Metric::from_key(key) {
            if let Some(v) = self.known.get(metric) {
                return Some(MetricValue::Numeric(v));
            }
        }
        if let Some(v) = self.other.get(&canonical) {
            return Some(MetricValue::Numeric(*v));
        }
        self.text
            .get(&canonical)
            .map(|t| MetricValue::Text(t.clone()))
    }

    /// Every canonical key this record holds, sorted.
    pub fn keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self
            .known
            .present()
            .map(|(metric, _)| metric.key().to_string())
            .collect();
        keys.extend(self.other.keys().cloned());
        keys.extend(self.text.keys().cloned());
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Build a record from a flat JSON object.
    ///
    /// Numbers and numeric strings become numeric values, other strings and
    /// booleans become text, `null` entries are dropped.
    pub fn from_json_value(
        source: impl Into<String>,
        value: &serde_json::Value,
    ) -> PitchlensResult<Self> {
        let source = source.into();
        let object = value.as_object().ok_or_else(|| {
            PitchlensError::stats(format!(
                "stat table from {source:?} must be a JSON object of metric name to value"
            ))
        })?;

        let mut record = StatRecord::new(source);
        for (key, raw) in object {
            let value = match raw {
                serde_json::Value::Null => continue,
                serde_json::Value::Number(n) => match n.as_f64() {
                    Some(v) => MetricValue::Numeric(v),
                    None => MetricValue::Text(n.to_string()),
                },
                serde_json::Value::String(s) => parse_metric_text(s),
                other => MetricValue::Text(other.to_string()),
            };
            record.insert(key, value);
        }
        Ok(record)
    }

    /// Parse a record from JSON text.
    pub fn from_json_str(source: impl Into<String>, json: &str) -> PitchlensResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(source, &value)
    }
}

/// Interpret a string cell: `"12"`, `" 9.5 "` and `"82.5%"` are numeric.
pub fn parse_metric_text(raw: &str) -> MetricValue {
    let trimmed = raw.trim();
    let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    match numeric.parse::<f64>() {
        Ok(v) if v.is_finite() => MetricValue::Numeric(v),
        _ => MetricValue::Text(raw.to_string()),
    }
}

/// Playing position that selects a weight profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionCategory {
    Forward,
    Midfielder,
    Defender,
}

impl PositionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Midfielder => "midfielder",
            Self::Defender => "defender",
        }
    }
}

impl fmt::Display for PositionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionCategory {
    type Err = PitchlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "midfielder" => Ok(Self::Midfielder),
            "defender" => Ok(Self::Defender),
            _ => Err(PitchlensError::UnknownPositionCategory {
                value: s.to_string(),
            }),
        }
    }
}

/// Default weight for metrics a profile does not mention.
pub const DEFAULT_METRIC_WEIGHT: f64 = 1.0;

/// Multiplicative importance of each metric for a position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    weights: BTreeMap<String, f64>,
}

impl WeightProfile {
    /// Build a profile from raw metric keys. Keys are canonicalized.
    pub fn new<K: AsRef<str>>(weights: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self {
            weights: weights
                .into_iter()
                .map(|(k, w)| (canonical_key(k.as_ref()), w))
                .collect(),
        }
    }

    /// The fixed profile for a playing position.
    pub fn for_position(position: PositionCategory) -> Self {
        let weights: &[(Metric, f64)] = match position {
            PositionCategory::Forward => &[
                (Metric::Goals, 2.5),
                (Metric::ExpectedGoals, 2.0),
                (Metric::ExpectedGoalsOnTarget, 1.5),
                (Metric::Assists, 1.5),
                (Metric::ExpectedAssists, 1.2),
                (Metric::ShotAccuracy, 1.5),
                (Metric::PenetrationSuccessRate, 1.0),
            ],
            PositionCategory::Midfielder => &[
                (Metric::Assists, 2.0),
                (Metric::ExpectedAssists, 1.8),
                (Metric::PassSuccessRate, 2.0),
                (Metric::ProgressivePasses, 1.8),
                (Metric::PassesPerGame, 1.2),
                (Metric::BallPossessionTime, 1.2),
                (Metric::DribbleSuccessRate, 1.0),
            ],
            PositionCategory::Defender => &[
                (Metric::Tackles, 2.0),
                (Metric::Interceptions, 2.0),
                (Metric::Clearances, 1.8),
                (Metric::AerialDuelsWon, 1.5),
                (Metric::PassSuccessRate, 1.2),
            ],
        };
        Self::new(weights.iter().map(|(m, w)| (m.key(), *w)))
    }

    /// Weight for a metric, [`DEFAULT_METRIC_WEIGHT`] when the profile has no entry.
    pub fn weight(&self, key: &str) -> f64 {
        self.weights
            .get(&canonical_key(key))
            .copied()
            .unwrap_or(DEFAULT_METRIC_WEIGHT)
    }

    /// Metrics named by the profile, with their weights, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Recoverable problem found while aggregating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationWarning {
    /// A source holds descriptive text for this metric, so it was left out of the average.
    NonNumericMetric { metric: String, source: String },
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonNumericMetric { metric, source } => {
                write!(f, "metric {metric:?} from {source:?} is not numeric; excluded")
            }
        }
    }
}

/// Position-weighted composite score.
///
/// Not clamped: values above 100 are possible and left to the report layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedScore {
    pub position: Option<PositionCategory>,
    /// Weighted mean over the profile's metrics, rounded to two decimals.
    pub value: f64,
    /// Cross-source average of every numeric metric of the primary source.
    pub averaged: BTreeMap<String, f64>,
    /// Number of profile metrics the score was divided by.
    pub weighted_metrics: usize,
    pub warnings: Vec<AggregationWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Expected Assists (xA)"), "expected_assists_xa");
        assert_eq!(normalize_key("  Pass Success Rate "), "pass_success_rate");
        assert_eq!(normalize_key("xG"), "xg");
    }

    #[test]
    fn test_metric_aliases() {
        assert_eq!(Metric::from_key("Goals"), Some(Metric::Goals));
        assert_eq!(Metric::from_key("xG"), Some(Metric::ExpectedGoals));
        assert_eq!(
            Metric::from_key("Expected Assists (xA)"),
            Some(Metric::ExpectedAssists)
        );
        assert_eq!(Metric::from_key("preferred_foot"), None);
    }

    #[test]
    fn test_korean_labels_resolve() {
        assert_eq!(Metric::from_key("골"), Some(Metric::Goals));
        assert_eq!(Metric::from_key("골 기대값(xG)"), Some(Metric::ExpectedGoals));
        assert_eq!(Metric::from_key("도움"), Some(Metric::Assists));
        assert_eq!(Metric::from_key("패스 성공률"), Some(Metric::PassSuccessRate));
        assert_eq!(Metric::from_key("전진 패스"), Some(Metric::ProgressivePasses));
        assert_eq!(
            Metric::from_key("침투 성공률"),
            Some(Metric::PenetrationSuccessRate)
        );
    }

    #[test]
    fn test_unknown_keys_match_across_spellings() {
        assert_eq!(canonical_key("Sprints"), "sprints");
        assert_eq!(canonical_key("  Top Speed (km/h) "), "top_speed_km_h");

        let record = StatRecord::new("a").with_number("Top Speed (km/h)", 33.1);
        assert_eq!(record.other.get("top_speed_km_h"), Some(&33.1));
        assert_eq!(
            record.value("top speed km/h"),
            Some(MetricValue::Numeric(33.1))
        );

        let profile = WeightProfile::new([("sprints", 3.0)]);
        assert_eq!(profile.weight("SPRINTS"), 3.0);
    }

    #[test]
    fn test_record_from_json_splits_buckets() {
        let json = r#"{
            "Goals": "12",
            "xG": 9.5,
            "Pass Success Rate": "82.5%",
            "sprints": 31,
            "main_penetration_zone": "opponent box, right half-space",
            "notes": null
        }"#;
        let record = StatRecord::from_json_str("fbref", json).unwrap();
        assert_eq!(record.known.goals, Some(12.0));
        assert_eq!(record.known.xg, Some(9.5));
        assert_eq!(record.known.pass_success_rate, Some(82.5));
        assert_eq!(record.other.get("sprints"), Some(&31.0));
        assert_eq!(
            record.value("main_penetration_zone"),
            Some(MetricValue::Text("opponent box, right half-space".to_string()))
        );
        assert_eq!(record.value("notes"), None);
        assert_eq!(record.keys().len(), 5);
    }

    #[test]
    fn test_text_for_known_metric_goes_to_text_bucket() {
        let record = StatRecord::new("scout").with_text("goals", "a dozen");
        assert_eq!(record.known.goals, None);
        assert_eq!(
            record.value("goals"),
            Some(MetricValue::Text("a dozen".to_string()))
        );
    }

    #[test]
    fn test_insert_replaces_previous_value() {
        let record = StatRecord::new("s")
            .with_text("goals", "unknown")
            .with_number("Goals", 3.0);
        assert_eq!(record.value("goals"), Some(MetricValue::Numeric(3.0)));
        assert!(record.text.is_empty());
    }

    #[test]
    fn test_non_object_json_is_rejected() {
        assert!(StatRecord::from_json_str("bad", "[1, 2]").is_err());
    }

    #[test]
    fn test_position_category_parse() {
        assert_eq!(
            "Forward".parse::<PositionCategory>().unwrap(),
            PositionCategory::Forward
        );
        let err = "goalkeeper".parse::<PositionCategory>().unwrap_err();
        assert!(matches!(
            err,
            PitchlensError::UnknownPositionCategory { ref value } if value == "goalkeeper"
        ));
    }

    #[test]
    fn test_weight_defaults_to_one() {
        let profile = WeightProfile::new([("goals", 2.5)]);
        assert_eq!(profile.weight("Goals"), 2.5);
        assert_eq!(profile.weight("tackles"), DEFAULT_METRIC_WEIGHT);
    }

    #[test]
    fn test_position_profiles_are_distinct() {
        let fw = WeightProfile::for_position(PositionCategory::Forward);
        let mf = WeightProfile::for_position(PositionCategory::Midfielder);
        let df = WeightProfile::for_position(PositionCategory::Defender);
        assert_eq!(fw.weight("goals"), 2.5);
        assert_eq!(mf.weight("pass_success_rate"), 2.0);
        assert_eq!(df.weight("tackles"), 2.0);
        assert_eq!(df.len(), 5);
    }

    #[test]
    fn test_record_roundtrips_through_serde() {
        let record = StatRecord::new("whoscored")
            .with_number("goals", 10.0)
            .with_text("style", "target man");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"xg\""));
        let parsed: StatRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
