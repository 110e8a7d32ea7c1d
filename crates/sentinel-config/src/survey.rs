//! Per-survey threshold overrides.
//!
//! A survey owner can make detection stricter or more lenient without touching
//! the deployment's scoring configuration. Overrides arrive with the request,
//! so they are sanitized here rather than trusted:
//! - non-finite or non-positive multipliers are ignored (treated as 1.0)
//! - auto thresholds are clamped into `[0,1]`
//! - `auto_accept <= auto_reject` is enforced by lowering the accept threshold

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use sentinel_common::Detector;

pub const DEFAULT_AUTO_ACCEPT: f64 = 0.20;
pub const DEFAULT_AUTO_REJECT: f64 = 0.85;

/// Overall detection sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Scores are inflated by 25% before severity lookup.
    Strict,
    #[default]
    Balanced,
    /// Scores are deflated by 25% before severity lookup.
    Lenient,
}

impl Sensitivity {
    pub const ALL: &'static [Sensitivity] = &[
        Sensitivity::Strict,
        Sensitivity::Balanced,
        Sensitivity::Lenient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Strict => "strict",
            Sensitivity::Balanced => "balanced",
            Sensitivity::Lenient => "lenient",
        }
    }

    pub fn parse(s: &str) -> Option<Sensitivity> {
        match s.to_lowercase().as_str() {
            "strict" | "high" => Some(Sensitivity::Strict),
            "balanced" | "default" | "normal" => Some(Sensitivity::Balanced),
            "lenient" | "low" | "relaxed" => Some(Sensitivity::Lenient),
            _ => None,
        }
    }

    /// Score multiplier applied before per-detector lookup.
    pub fn multiplier(&self) -> f64 {
        match self {
            Sensitivity::Strict => 1.25,
            Sensitivity::Balanced => 1.0,
            Sensitivity::Lenient => 0.75,
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sensitivity::parse(s).ok_or_else(|| {
            format!(
                "Unknown sensitivity '{}'. Available: {}",
                s,
                Sensitivity::ALL
                    .iter()
                    .map(|p| p.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

/// Survey-level overrides, as carried on a scoring request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyThresholdConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,

    #[serde(default)]
    pub sensitivity: Sensitivity,

    /// Per-detector multipliers keyed by detector name. Unknown names are ignored.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub multipliers: BTreeMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_accept_threshold: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_reject_threshold: Option<f64>,

    #[serde(default)]
    pub manual_review_required: bool,
}

/// A per-detector multiplier after sanitizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMultiplier {
    /// Sensitivity × detector multiplier.
    pub value: f64,
    /// The supplied detector multiplier was unusable and 1.0 was used instead.
    pub ignored: Option<f64>,
}

/// Auto thresholds after sanitizing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoThresholds {
    pub accept: f64,
    pub reject: f64,
    /// Something was clamped, defaulted or reordered.
    pub adjusted: bool,
}

impl SurveyThresholdConfig {
    pub fn new(sensitivity: Sensitivity) -> Self {
        SurveyThresholdConfig {
            sensitivity,
            ..Default::default()
        }
    }

    pub fn with_survey_id(mut self, id: impl Into<String>) -> Self {
        self.survey_id = Some(id.into());
        self
    }

    pub fn with_multiplier(mut self, detector: Detector, value: f64) -> Self {
        self.multipliers.insert(detector.as_str().to_string(), value);
        self
    }

    pub fn with_auto_thresholds(mut self, accept: f64, reject: f64) -> Self {
        self.auto_accept_threshold = Some(accept);
        self.auto_reject_threshold = Some(reject);
        self
    }

    pub fn with_manual_review(mut self, required: bool) -> Self {
        self.manual_review_required = required;
        self
    }

    /// Raw multiplier supplied for `detector`, if any.
    pub fn detector_multiplier(&self, detector: Detector) -> Option<f64> {
        self.multipliers
            .iter()
            .find(|(name, _)| Detector::parse(name) == Some(detector))
            .map(|(_, value)| *value)
    }

    /// Effective multiplier for `detector`.
    pub fn multiplier_for(&self, detector: Detector) -> ResolvedMultiplier {
        let preset = self.sensitivity.multiplier();
        match self.detector_multiplier(detector) {
            Some(m) if m.is_finite() && m > 0.0 => ResolvedMultiplier {
                value: preset * m,
                ignored: None,
            },
            Some(bad) => ResolvedMultiplier {
                value: preset,
                ignored: Some(bad),
            },
            None => ResolvedMultiplier {
                value: preset,
                ignored: None,
            },
        }
    }

    /// Apply the effective multiplier to a detector score and clamp into `[0,1]`.
    pub fn adjust_score(&self, detector: Detector, score: f64) -> f64 {
        sentinel_math::clamp_probability(score * self.multiplier_for(detector).value)
    }

    /// Multiplier keys that name no known detector.
    pub fn unknown_multiplier_keys(&self) -> Vec<&str> {
        self.multipliers
            .keys()
            .filter(|name| Detector::parse(name).is_none())
            .map(|name| name.as_str())
            .collect()
    }

    /// Sanitized auto-accept / auto-reject thresholds.
    pub fn auto_thresholds(&self) -> AutoThresholds {
        let mut adjusted = false;
        let mut sanitize = |value: Option<f64>, default: f64| match value {
            None => default,
            Some(v) if v.is_finite() => {
                let clamped = v.clamp(0.0, 1.0);
                if clamped != v {
                    adjusted = true;
                }
                clamped
            }
            Some(_) => {
                adjusted = true;
                default
            }
        };
        let reject = sanitize(self.auto_reject_threshold, DEFAULT_AUTO_REJECT);
        let mut accept = sanitize(self.auto_accept_threshold, DEFAULT_AUTO_ACCEPT);
        if accept > reject {
            accept = reject;
            adjusted = true;
        }
        AutoThresholds {
            accept,
            reject,
            adjusted,
        }
    }
}
