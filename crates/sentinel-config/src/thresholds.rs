//! Threshold tables.
//!
//! A table is an ordered list of half-open `[min, max)` ranges that covers
//! `[0, 1]`; the last range is closed at 1.0. Scores sitting exactly on a
//! boundary therefore resolve to the higher range.

use serde::{Deserialize, Serialize};

use sentinel_common::{Action, RiskLevel};

/// One band of a per-detector table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
    pub risk_level: RiskLevel,
    /// Minimum confidence for the band to be taken at face value.
    pub confidence_floor: f64,
    pub description: String,
}

impl ThresholdRange {
    pub fn new(min: f64, max: f64, risk_level: RiskLevel, floor: f64, description: &str) -> Self {
        ThresholdRange {
            min,
            max,
            risk_level,
            confidence_floor: floor,
            description: description.to_string(),
        }
    }
}

/// One band of the ensemble table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleBand {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub risk_level: RiskLevel,
    pub action: Action,
    pub confidence_floor: f64,
    pub description: String,
}

/// Anything with a `[min, max)` span can be looked up.
pub trait Band {
    fn min(&self) -> f64;
    fn max(&self) -> f64;
    fn risk_level(&self) -> RiskLevel;
    fn confidence_floor(&self) -> f64;
}

impl Band for ThresholdRange {
    fn min(&self) -> f64 {
        self.min
    }
    fn max(&self) -> f64 {
        self.max
    }
    fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
    fn confidence_floor(&self) -> f64 {
        self.confidence_floor
    }
}

impl Band for EnsembleBand {
    fn min(&self) -> f64 {
        self.min
    }
    fn max(&self) -> f64 {
        self.max
    }
    fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
    fn confidence_floor(&self) -> f64 {
        self.confidence_floor
    }
}

/// Find the band containing `score`.
///
/// `score` is clamped into `[0,1]` first. A score no half-open band contains
/// (1.0 for a valid table) falls into the last band. Returns `None` only for
/// an empty table.
pub fn locate<B: Band>(bands: &[B], score: f64) -> Option<&B> {
    let score = sentinel_math::clamp_probability(score);
    let last = bands.last()?;
    bands
        .iter()
        .find(|band| score >= band.min() && score < band.max())
        .or(Some(last))
}

/// The built-in 8-band ensemble table.
pub fn default_ensemble_bands() -> Vec<EnsembleBand> {
    let band = |name: &str,
                min: f64,
                max: f64,
                risk_level: RiskLevel,
                action: Action,
                floor: f64,
                description: &str| EnsembleBand {
        name: name.to_string(),
        min,
        max,
        risk_level,
        action,
        confidence_floor: floor,
        description: description.to_string(),
    };

    vec![
        band(
            "veryLow",
            0.00,
            0.20,
            RiskLevel::Low,
            Action::Accept,
            0.00,
            "Highly likely legitimate response",
        ),
        band(
            "low",
            0.20,
            0.35,
            RiskLevel::Low,
            Action::Accept,
            0.60,
            "Likely legitimate with minimal concerns",
        ),
        band(
            "mediumLow",
            0.35,
            0.50,
            RiskLevel::Medium,
            Action::Review,
            0.65,
            "Some suspicious patterns, review recommended",
        ),
        band(
            "medium",
            0.50,
            0.65,
            RiskLevel::Medium,
            Action::Review,
            0.70,
            "Multiple fraud indicators, manual review required",
        ),
        band(
            "mediumHigh",
            0.65,
            0.75,
            RiskLevel::High,
            Action::Flag,
            0.75,
            "High fraud probability, flag for immediate review",
        ),
        band(
            "high",
            0.75,
            0.85,
            RiskLevel::High,
            Action::Flag,
            0.80,
            "Very high fraud probability, likely reject",
        ),
        band(
            "critical",
            0.85,
            0.95,
            RiskLevel::Critical,
            Action::Reject,
            0.85,
            "Clear fraud detected, recommend automatic rejection",
        ),
        band(
            "extreme",
            0.95,
            1.00,
            RiskLevel::Critical,
            Action::Reject,
            0.90,
            "Obvious fraud (bot/AI), automatic rejection",
        ),
    ]
}
