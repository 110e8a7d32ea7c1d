//! Threshold classification of the final fraud score.
//!
//! Bands are half-open `[min, max)` (the last is closed at 1.0), so a score
//! on a boundary resolves to the higher band. A band is taken at face value
//! only when the evidence confidence reaches its floor; otherwise the risk
//! tier escalates one step and an `accept` becomes a `review`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentinel_common::{Action, RiskLevel};
use sentinel_config::thresholds::{default_ensemble_bands, locate};
use sentinel_config::{EnsembleBand, ThresholdRange};

use crate::logging::{event_names, Stage};

/// Suffix appended to the band description on escalation.
pub const LOW_CONFIDENCE_SUFFIX: &str = " (low confidence adjustment)";

/// Classification of one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub risk_level: RiskLevel,
    pub action: Action,
    pub description: String,
    /// Name of the ensemble band the score fell into.
    pub band: String,
    /// Confidence was below the band's floor.
    pub escalated: bool,
    /// Set when a survey threshold replaced the band's action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_reason: Option<String>,
}

/// Classify a fraud score against the ensemble table.
///
/// An empty table falls back to the built-in bands.
pub fn classify(score: f64, confidence: f64, bands: &[EnsembleBand]) -> Decision {
    let fallback;
    let bands = if bands.is_empty() {
        fallback = default_ensemble_bands();
        fallback.as_slice()
    } else {
        bands
    };

    // locate only fails on an empty table, ruled out above.
    let Some(band) = locate(bands, score) else {
        return Decision {
            risk_level: RiskLevel::Medium,
            action: Action::Review,
            description: String::new(),
            band: String::new(),
            escalated: false,
            override_reason: None,
        };
    };

    if confidence >= band.confidence_floor {
        return Decision {
            risk_level: band.risk_level,
            action: band.action,
            description: band.description.clone(),
            band: band.name.clone(),
            escalated: false,
            override_reason: None,
        };
    }

    let risk_level = band.risk_level.escalate();
    let action = match band.action {
        Action::Accept => Action::Review,
        other => other,
    };
    tracing::debug!(
        target: event_names::DECIDE_ESCALATED,
        stage = %Stage::Decide,
        band = band.name.as_str(),
        confidence,
        floor = band.confidence_floor,
        from = %band.risk_level,
        to = %risk_level,
        "confidence below band floor; risk escalated"
    );
    Decision {
        risk_level,
        action,
        description: format!("{}{}", band.description, LOW_CONFIDENCE_SUFFIX),
        band: band.name.clone(),
        escalated: true,
        override_reason: None,
    }
}

/// Look up a detector score in its own 4-band table.
pub fn classify_detector(score: f64, bands: &[ThresholdRange]) -> Option<&ThresholdRange> {
    locate(bands, score)
}
