//! Confidence interval around the reported fraud score.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentinel_config::ScoringConfig;
use sentinel_math::{wilson_interval, ConfidenceLevel, WilsonInterval};

/// Wilson-score interval as reported on a result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// `upper - lower`.
    pub width: f64,
    /// Confidence level in percent (90, 95 or 99).
    pub level: u8,
    /// Effective sample size the interval was computed for.
    pub sample_size: f64,
}

impl ConfidenceInterval {
    pub fn from_wilson(interval: WilsonInterval, level: ConfidenceLevel, sample_size: f64) -> Self {
        ConfidenceInterval {
            lower: interval.lower,
            upper: interval.upper,
            width: interval.width,
            level: level.percent(),
            sample_size,
        }
    }

    pub fn contains(&self, p: f64) -> bool {
        self.lower <= p && p <= self.upper
    }
}

/// Interval for `p` at an explicit sample size and level.
///
/// Sample sizes below the floor of 10 are raised to it.
pub fn interval_for(p: f64, n: f64, level: ConfidenceLevel) -> ConfidenceInterval {
    let n = if n.is_finite() {
        n.max(sentinel_math::MIN_SAMPLE_SIZE)
    } else {
        sentinel_math::MIN_SAMPLE_SIZE
    };
    ConfidenceInterval::from_wilson(wilson_interval(p, n, level), level, n)
}

/// Interval the engine reports: `n = observed × samples_per_evidence`.
pub fn score_interval(p: f64, observed_count: usize, config: &ScoringConfig) -> ConfidenceInterval {
    let n = observed_count as f64 * config.samples_per_evidence;
    interval_for(p, n, config.interval_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_size_floor_applies() {
        let ci = score_interval(0.15, 0, &ScoringConfig::default());
        assert_eq!(ci.sample_size, 10.0);
        assert!(ci.contains(0.15));
    }

    #[test]
    fn engine_interval_scales_with_evidence() {
        let config = ScoringConfig::default();
        let few = score_interval(0.6, 2, &config);
        let many = score_interval(0.6, 8, &config);
        assert_eq!(few.sample_size, 20.0);
        assert_eq!(many.sample_size, 80.0);
        assert!(many.width < few.width);
        assert_eq!(many.level, 95);
    }

    #[test]
    fn interval_stays_in_unit_range_at_extremes() {
        for p in [0.0, 1e-9, 0.5, 1.0 - 1e-9, 1.0] {
            let ci = interval_for(p, 10.0, ConfidenceLevel::P99);
            assert!(ci.lower >= 0.0 && ci.upper <= 1.0);
            assert!(ci.contains(p), "p={p} ci={ci:?}");
        }
    }

    #[test]
    fn non_finite_sample_size_uses_floor() {
        let ci = interval_for(0.5, f64::NAN, ConfidenceLevel::P95);
        assert_eq!(ci.sample_size, 10.0);
    }
}
