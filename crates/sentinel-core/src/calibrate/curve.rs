//! Calibration curves.
//!
//! A curve maps raw posteriors to observed fraud rates, e.g. from a
//! reliability study of past verdicts. Between points the mapping is
//! piecewise linear; outside them it is flat.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentinel_math::{clamp_probability, interpolate};

/// One point of a calibration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalibrationPoint {
    /// Raw model output.
    pub predicted: f64,
    /// Observed fraud rate at that output.
    pub actual: f64,
}

/// A calibration curve, sorted by `predicted` on construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CalibrationPoint>", into = "Vec<CalibrationPoint>")]
pub struct CalibrationCurve {
    points: Vec<CalibrationPoint>,
}

impl From<Vec<CalibrationPoint>> for CalibrationCurve {
    fn from(mut points: Vec<CalibrationPoint>) -> Self {
        points.retain(|p| p.predicted.is_finite() && p.actual.is_finite());
        points.sort_by(|a, b| a.predicted.total_cmp(&b.predicted));
        CalibrationCurve { points }
    }
}

impl From<CalibrationCurve> for Vec<CalibrationPoint> {
    fn from(curve: CalibrationCurve) -> Self {
        curve.points
    }
}

impl CalibrationCurve {
    pub fn new(points: Vec<CalibrationPoint>) -> Self {
        points.into()
    }

    /// Build from `(predicted, actual)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        pairs
            .iter()
            .map(|&(predicted, actual)| CalibrationPoint { predicted, actual })
            .collect::<Vec<_>>()
            .into()
    }

    pub fn points(&self) -> &[CalibrationPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Map a raw score through the curve. An empty curve is the identity.
    ///
    /// The output is clamped into `[0,1]`.
    pub fn apply(&self, raw: f64) -> f64 {
        let knots: Vec<(f64, f64)> = self.points.iter().map(|p| (p.predicted, p.actual)).collect();
        clamp_probability(interpolate(&knots, raw))
    }
}

/// Calibrate `raw` through `curve`.
pub fn calibrate(raw: f64, curve: &CalibrationCurve) -> f64 {
    curve.apply(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_curve_is_identity() {
        let curve = CalibrationCurve::default();
        for x in [0.0, 0.13, 0.5, 0.99, 1.0] {
            assert_eq!(calibrate(x, &curve), x);
        }
    }

    #[test]
    fn points_are_sorted_on_construction() {
        let curve = CalibrationCurve::from_pairs(&[(0.9, 0.7), (0.1, 0.05), (0.5, 0.3)]);
        let xs: Vec<f64> = curve.points().iter().map(|p| p.predicted).collect();
        assert_eq!(xs, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn interpolates_and_clamps_outside_range() {
        let curve = CalibrationCurve::from_pairs(&[(0.2, 0.1), (0.8, 0.7)]);
        assert_eq!(curve.apply(0.0), 0.1);
        assert_eq!(curve.apply(1.0), 0.7);
        assert!((curve.apply(0.5) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn output_is_clamped() {
        let curve = CalibrationCurve::from_pairs(&[(0.0, -0.5), (1.0, 1.5)]);
        assert_eq!(curve.apply(0.0), 0.0);
        assert_eq!(curve.apply(1.0), 1.0);
    }

    #[test]
    fn zero_width_segment_takes_left_point() {
        let curve = CalibrationCurve::from_pairs(&[(0.0, 0.0), (0.5, 0.2), (0.5, 0.6), (1.0, 1.0)]);
        assert_eq!(curve.apply(0.5), 0.2);
    }

    #[test]
    fn deserializes_from_point_array_in_any_order() {
        let curve: CalibrationCurve = serde_json::from_str(
            r#"[{"predicted": 0.8, "actual": 0.6}, {"predicted": 0.2, "actual": 0.1}]"#,
        )
        .unwrap();
        assert_eq!(curve.points()[0].predicted, 0.2);
    }
}
