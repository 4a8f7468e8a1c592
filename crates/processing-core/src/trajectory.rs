//! Object path, speed and curve classification.

use pitchlens_analysis_model::geometry::Point2D;
use pitchlens_analysis_model::motion::{Centroid, CurveClass, TrajectoryResult};

/// Average per-step displacement (pixels) above which a path is `Straight`.
pub const STRAIGHT_SPEED_THRESHOLD: f64 = 10.0;

/// Builds a trajectory from centroids in frame order.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryAnalyzer {
    points: Vec<Point2D>,
    frame_indices: Vec<u64>,
    speeds: Vec<f64>,
}

impl TrajectoryAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a centroid. Returns the displacement from the previous one.
    ///
    /// Centroids must arrive in increasing frame order; one that does not is
    /// ignored.
    pub fn push(&mut self, centroid: &Centroid) -> Option<f64> {
        if let Some(&last) = self.frame_indices.last() {
            if centroid.frame_index <= last {
                tracing::warn!(
                    frame = centroid.frame_index,
                    last,
                    "Out-of-order centroid ignored"
                );
                return None;
            }
        }

        let speed = self
            .points
            .last()
            .map(|prev| prev.distance_to(&centroid.position));
        if let Some(s) = speed {
            self.speeds.push(s);
        }
        self.points.push(centroid.position);
        self.frame_indices.push(centroid.frame_index);
        speed
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn finish(self) -> TrajectoryResult {
        if self.points.len() < 2 {
            return TrajectoryResult::insufficient(self.points, self.frame_indices);
        }

        let total_distance: f64 = self.speeds.iter().sum();
        let average_speed = total_distance / self.speeds.len() as f64;
        let max_speed = self.speeds.iter().copied().fold(0.0, f64::max);

        TrajectoryResult {
            points: self.points,
            frame_indices: self.frame_indices,
            speeds: self.speeds,
            average_speed: Some(average_speed),
            max_speed: Some(max_speed),
            total_distance,
            curve_class: classify_speed(average_speed),
        }
    }
}

pub fn classify_speed(average_speed: f64) -> CurveClass {
    if average_speed > STRAIGHT_SPEED_THRESHOLD {
        CurveClass::Straight
    } else {
        CurveClass::SlowCurve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centroid(frame_index: u64, x: f64, y: f64) -> Centroid {
        Centroid {
            frame_index,
            position: Point2D::new(x, y),
            area: 100,
        }
    }

    #[test]
    fn test_slow_path() {
        let mut analyzer = TrajectoryAnalyzer::new();
        for i in 0..50 {
            analyzer.push(&centroid(i, 10.0 + i as f64, 20.0));
        }
        let result = analyzer.finish();
        assert_eq!(result.points.len(), 50);
        assert_eq!(result.speeds.len(), 49);
        assert!((result.average_speed.unwrap() - 1.0).abs() < 1e-9);
        assert!((result.total_distance - 49.0).abs() < 1e-9);
        assert_eq!(result.curve_class, CurveClass::SlowCurve);
    }

    #[test]
    fn test_fast_path_is_straight() {
        let mut analyzer = TrajectoryAnalyzer::new();
        assert_eq!(analyzer.push(&centroid(0, 0.0, 0.0)), None);
        assert_eq!(analyzer.push(&centroid(1, 30.0, 40.0)), Some(50.0));
        analyzer.push(&centroid(2, 36.0, 48.0));

        let result = analyzer.finish();
        assert!((result.average_speed.unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(result.max_speed, Some(50.0));
        assert_eq!(result.curve_class, CurveClass::Straight);
    }

    #[test]
    fn test_threshold_boundary_is_slow() {
        assert_eq!(classify_speed(STRAIGHT_SPEED_THRESHOLD), CurveClass::SlowCurve);
        assert_eq!(classify_speed(10.01), CurveClass::Straight);
    }

    #[test]
    fn test_insufficient_data() {
        let empty = TrajectoryAnalyzer::new().finish();
        assert_eq!(empty.curve_class, CurveClass::InsufficientData);
        assert!(empty.average_speed.is_none());

        let mut single = TrajectoryAnalyzer::new();
        single.push(&centroid(3, 1.0, 1.0));
        let result = single.finish();
        assert_eq!(result.points.len(), 1);
        assert!(!result.has_data());
    }

    #[test]
    fn test_out_of_order_centroid_ignored() {
        let mut analyzer = TrajectoryAnalyzer::new();
        analyzer.push(&centroid(5, 0.0, 0.0));
        assert!(analyzer.push(&centroid(5, 3.0, 4.0)).is_none());
        assert!(analyzer.push(&centroid(2, 3.0, 4.0)).is_none());
        assert_eq!(analyzer.len(), 1);
    }
}
