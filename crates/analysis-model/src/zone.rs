//! Left / center / right spatial zone distribution.

use serde::{Deserialize, Serialize};

/// Horizontal third of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Left,
    Center,
    Right,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Running per-zone counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTally {
    pub left: u64,
    pub center: u64,
    pub right: u64,
}

impl ZoneTally {
    pub fn increment(&mut self, zone: Zone) {
        match zone {
            Zone::Left => self.left += 1,
            Zone::Center => self.center += 1,
            Zone::Right => self.right += 1,
        }
    }

    pub fn count(&self, zone: Zone) -> u64 {
        match zone {
            Zone::Left => self.left,
            Zone::Center => self.center,
            Zone::Right => self.right,
        }
    }

    pub fn total(&self) -> u64 {
        self.left + self.center + self.right
    }

    /// Share of `zone` in percent; 0 when nothing was tallied.
    pub fn percentage(&self, zone: Zone) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(zone) as f64 / total as f64 * 100.0
    }
}

/// Final zone distribution of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneResult {
    pub tally: ZoneTally,
    pub left_pct: f64,
    pub center_pct: f64,
    pub right_pct: f64,
    /// Zone with the highest count; `None` when nothing was tallied.
    pub dominant_zone: Option<Zone>,
    /// `"center"` when more than 40% of positions were central, else `"non-center"`.
    pub dominant_zone_label: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tally_percentages() {
        let mut tally = ZoneTally::default();
        tally.increment(Zone::Left);
        tally.increment(Zone::Center);
        tally.increment(Zone::Center);
        tally.increment(Zone::Right);
        assert_eq!(tally.total(), 4);
        assert!((tally.percentage(Zone::Center) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_tally_percentage_is_zero() {
        let tally = ZoneTally::default();
        assert_eq!(tally.percentage(Zone::Left), 0.0);
    }

    proptest! {
        #[test]
        fn prop_percentages_sum_to_hundred(zones in proptest::collection::vec(0u8..3, 1..200)) {
            let mut tally = ZoneTally::default();
            for z in zones {
                tally.increment(match z {
                    0 => Zone::Left,
                    1 => Zone::Center,
                    _ => Zone::Right,
                });
            }
            let sum = tally.percentage(Zone::Left)
                + tally.percentage(Zone::Center)
                + tally.percentage(Zone::Right);
            prop_assert!((sum - 100.0).abs() < 1e-9);
        }
    }
}
