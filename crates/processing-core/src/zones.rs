//! Left / center / right zone tally of a tracked joint.

use pitchlens_analysis_model::pose::{JointName, PoseSnapshot};
use pitchlens_analysis_model::zone::{Zone, ZoneResult, ZoneTally};

/// Normalized x below which a position is in the left zone.
pub const LEFT_BOUNDARY: f64 = 0.33;

/// Normalized x above which a position is in the right zone.
pub const RIGHT_BOUNDARY: f64 = 0.66;

/// Center share (percent) above which a run is labelled central.
pub const CENTER_DOMINANCE_PCT: f64 = 40.0;

pub const CENTER_LABEL: &str = "center";
pub const NON_CENTER_LABEL: &str = "non-center";

/// Zone of a normalized x; `None` for non-finite input.
pub fn zone_for(x: f64) -> Option<Zone> {
    if !x.is_finite() {
        return None;
    }
    Some(if x < LEFT_BOUNDARY {
        Zone::Left
    } else if x > RIGHT_BOUNDARY {
        Zone::Right
    } else {
        Zone::Center
    })
}

/// Tallies the zone of the tracked joint over a run.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    tracked_joint: JointName,
    tally: ZoneTally,
}

impl Default for ZoneClassifier {
    fn default() -> Self {
        Self::new(JointName::LeftHip)
    }
}

impl ZoneClassifier {
    pub fn new(tracked_joint: JointName) -> Self {
        Self {
            tracked_joint,
            tally: ZoneTally::default(),
        }
    }

    pub fn observe(&mut self, snapshot: &PoseSnapshot) -> Option<Zone> {
        let point = snapshot.joint(self.tracked_joint)?;
        self.observe_x(point.x)
    }

    pub fn observe_x(&mut self, x: f64) -> Option<Zone> {
        let zone = zone_for(x)?;
        self.tally.increment(zone);
        Some(zone)
    }

    pub fn tally(&self) -> &ZoneTally {
        &self.tally
    }

    pub fn finish(self) -> ZoneResult {
        summarize(self.tally)
    }
}

/// Percentages, dominant zone and label for a tally.
pub fn summarize(tally: ZoneTally) -> ZoneResult {
    let center_pct = tally.percentage(Zone::Center);

    // Strict `>` keeps the earlier zone on ties: left, then center, then right.
    let dominant_zone = if tally.total() == 0 {
        None
    } else {
        let mut best = Zone::Left;
        for zone in [Zone::Center, Zone::Right] {
            if tally.count(zone) > tally.count(best) {
                best = zone;
            }
        }
        Some(best)
    };

    let label = if center_pct > CENTER_DOMINANCE_PCT {
        CENTER_LABEL
    } else {
        NON_CENTER_LABEL
    };

    ZoneResult {
        tally,
        left_pct: tally.percentage(Zone::Left),
        center_pct,
        right_pct: tally.percentage(Zone::Right),
        dominant_zone,
        dominant_zone_label: label.to_string(),
    }
}
