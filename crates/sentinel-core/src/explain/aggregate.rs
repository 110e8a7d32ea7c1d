//! Evidence aggregation.
//!
//! Each present detector is looked up in its own 4-band table using its
//! survey-adjusted score. Medium and above become findings; a detector that
//! sits in its low band is reported as benign evidence instead.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentinel_common::{Detector, RiskLevel, Severity};
use sentinel_config::DetectorProfiles;

use crate::decision::classify_detector;
use crate::normalize::Normalized;

/// One finding in the evidence report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Detector label, e.g. "AI Content Detection".
    pub source: String,
    pub detector: Detector,
    pub description: String,
    pub severity: Severity,
    /// Confidence floor of the band the detector fell into.
    pub confidence: f64,
    /// Weighted contribution; negative for benign findings.
    pub impact: f64,
}

/// Findings grouped by severity.
///
/// `low` is part of the report shape but never populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvidenceBuckets {
    pub critical: Vec<Finding>,
    pub high: Vec<Finding>,
    pub medium: Vec<Finding>,
    pub low: Vec<Finding>,
    pub benign: Vec<Finding>,
}

impl EvidenceBuckets {
    /// Count of critical, high and medium findings.
    pub fn indicator_count(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicator_count() == 0 && self.low.is_empty() && self.benign.is_empty()
    }

    /// All fraud indicators, most severe first.
    pub fn indicators(&self) -> impl Iterator<Item = &Finding> {
        self.critical.iter().chain(&self.high).chain(&self.medium)
    }

    fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Critical => self.critical.push(finding),
            Severity::High => self.high.push(finding),
            Severity::Medium => self.medium.push(finding),
            Severity::Low => self.low.push(finding),
            Severity::Benign => self.benign.push(finding),
        }
    }
}

/// Sort present detectors into severity buckets.
///
/// `adjusted` holds one `(detector, score)` per present detector, as produced
/// by [`crate::decision::adjusted_scores`].
pub fn aggregate(
    normalized: &Normalized,
    adjusted: &[(Detector, f64)],
    profiles: &DetectorProfiles,
) -> EvidenceBuckets {
    let mut buckets = EvidenceBuckets::default();

    for &(detector, score) in adjusted {
        let Some(entry) = normalized.entry(detector).filter(|e| e.present) else {
            continue;
        };
        let profile = profiles.get(detector);
        let Some(band) = classify_detector(score, &profile.bands) else {
            continue;
        };

        let (severity, impact) = match band.risk_level {
            RiskLevel::Low => (Severity::Benign, -entry.weight * (1.0 - score)),
            level => (level.severity(), entry.contribution),
        };
        buckets.push(Finding {
            source: profile.label.clone(),
            detector,
            description: band.description.clone(),
            severity,
            confidence: band.confidence_floor,
            impact,
        });
    }

    buckets
}
