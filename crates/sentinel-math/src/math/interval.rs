//! Wilson score interval for a binomial proportion.
//!
//! The interval is well behaved at `p = 0` and `p = 1`, unlike the normal
//! approximation, which is why it is used for the posterior's error bars.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sample sizes below this are raised to it.
pub const MIN_SAMPLE_SIZE: f64 = 10.0;

/// Two-sided confidence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ConfidenceLevel {
    P90,
    #[default]
    P95,
    P99,
}

impl ConfidenceLevel {
    /// Standard normal quantile for this level.
    pub fn z(&self) -> f64 {
        match self {
            ConfidenceLevel::P90 => 1.645,
            ConfidenceLevel::P95 => 1.96,
            ConfidenceLevel::P99 => 2.576,
        }
    }

    pub fn percent(&self) -> u8 {
        match self {
            ConfidenceLevel::P90 => 90,
            ConfidenceLevel::P95 => 95,
            ConfidenceLevel::P99 => 99,
        }
    }
}

impl TryFrom<u8> for ConfidenceLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            90 => Ok(ConfidenceLevel::P90),
            95 => Ok(ConfidenceLevel::P95),
            99 => Ok(ConfidenceLevel::P99),
            other => Err(format!(
                "unsupported confidence level {}: expected 90, 95 or 99",
                other
            )),
        }
    }
}

impl From<ConfidenceLevel> for u8 {
    fn from(level: ConfidenceLevel) -> u8 {
        level.percent()
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('%');
        let value: u8 = trimmed
            .parse()
            .map_err(|_| format!("invalid confidence level: {}", s))?;
        ConfidenceLevel::try_from(value)
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Lower/upper bounds of a Wilson interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WilsonInterval {
    pub lower: f64,
    pub upper: f64,
    pub width: f64,
}

impl WilsonInterval {
    pub fn contains(&self, p: f64) -> bool {
        self.lower <= p && p <= self.upper
    }

    /// Half of `width`; the usual "plus or minus" figure.
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }
}

/// Wilson score interval for proportion `p` observed over `n` trials.
///
/// `p` is clamped into `[0,1]` (NaN becomes 0) and `n` is raised to
/// [`MIN_SAMPLE_SIZE`]. The result always lies in `[0,1]` and contains `p`.
pub fn wilson_interval(p: f64, n: f64, level: ConfidenceLevel) -> WilsonInterval {
    let p = crate::clamp_probability(p);
    let n = if n.is_finite() {
        n.max(MIN_SAMPLE_SIZE)
    } else {
        MIN_SAMPLE_SIZE
    };
    let z = level.z();
    let z2 = z * z;

    let denominator = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denominator;
    let margin = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denominator;

    // Analytically the interval contains p; rounding can push a bound past it
    // at the extremes.
    let lower = (center - margin).clamp(0.0, 1.0).min(p);
    let upper = (center + margin).clamp(0.0, 1.0).max(p);

    WilsonInterval {
        lower,
        upper,
        width: upper - lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_at_half_with_hundred_samples() {
        let ci = wilson_interval(0.5, 100.0, ConfidenceLevel::P95);
        // 0.5 +/- 0.096
        assert!((ci.half_width() - 0.10).abs() < 0.02, "half width {}", ci.half_width());
        assert!((ci.width - 0.192).abs() < 0.005, "width {}", ci.width);
        assert!(ci.contains(0.5));
    }

    #[test]
    fn extremes_stay_in_unit_interval() {
        for p in [0.0, 1.0] {
            let ci = wilson_interval(p, 10.0, ConfidenceLevel::P99);
            assert!(ci.lower >= 0.0 && ci.upper <= 1.0);
            assert!(ci.contains(p));
        }
    }

    #[test]
    fn small_samples_use_floor() {
        let a = wilson_interval(0.3, 0.0, ConfidenceLevel::P95);
        let b = wilson_interval(0.3, MIN_SAMPLE_SIZE, ConfidenceLevel::P95);
        assert_eq!(a, b);
        let c = wilson_interval(0.3, f64::NAN, ConfidenceLevel::P95);
        assert_eq!(a, c);
    }

    #[test]
    fn higher_level_is_wider() {
        let w90 = wilson_interval(0.4, 50.0, ConfidenceLevel::P90).width;
        let w95 = wilson_interval(0.4, 50.0, ConfidenceLevel::P95).width;
        let w99 = wilson_interval(0.4, 50.0, ConfidenceLevel::P99).width;
        assert!(w90 < w95 && w95 < w99);
    }

    #[test]
    fn level_parsing() {
        assert_eq!("95".parse::<ConfidenceLevel>(), Ok(ConfidenceLevel::P95));
        assert_eq!("99%".parse::<ConfidenceLevel>(), Ok(ConfidenceLevel::P99));
        assert!("80".parse::<ConfidenceLevel>().is_err());
        assert_eq!(ConfidenceLevel::P90.to_string(), "90%");
    }
}
