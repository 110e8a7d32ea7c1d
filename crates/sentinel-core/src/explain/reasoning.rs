//! Human-readable reasoning for a scored response.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use sentinel_common::{Action, Detector, RiskLevel};
use sentinel_config::DetectorProfiles;

use super::aggregate::{EvidenceBuckets, Finding};
use crate::decision::Decision;
use crate::inference::{BayesianAnalysis, EvidenceOrigin};
use crate::logging::{event_names, Stage};
use crate::normalize::Normalized;

/// Mitigating note added when the evidence lowered the probability.
pub const DECREASED_FROM_BASELINE: &str =
    "Evidence actually decreased fraud probability from baseline";

/// Medium findings promoted to key factors.
const MEDIUM_KEY_FACTORS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reasoning {
    pub summary: String,
    pub key_factors: Vec<String>,
    pub mitigating_factors: Vec<String>,
    pub recommendation: String,
    pub alternative_explanations: Vec<String>,
}

/// Canned interpretation of a single detector score.
pub fn score_interpretation(score: f64) -> &'static str {
    if score >= 0.9 {
        "Very High - Strong fraud signals"
    } else if score >= 0.7 {
        "High - Multiple fraud indicators"
    } else if score >= 0.5 {
        "Moderate - Some suspicious patterns"
    } else if score >= 0.3 {
        "Low-Moderate - Minor concerns"
    } else if score >= 0.1 {
        "Low - Minimal issues"
    } else {
        "Very Low - Normal behavior"
    }
}

/// Recommendation text for a risk tier.
pub fn recommendation(risk_level: RiskLevel) -> &'static str {
    match risk_level {
        RiskLevel::Critical => {
            "REJECT: This response shows strong fraud indicators and should be automatically rejected."
        }
        RiskLevel::High => {
            "FLAG FOR REVIEW: This response is likely fraudulent and requires manual review before acceptance."
        }
        RiskLevel::Medium => {
            "MANUAL REVIEW RECOMMENDED: Some suspicious patterns detected. Review recommended before final decision."
        }
        RiskLevel::Low => "ACCEPT: This response appears legitimate with minimal fraud indicators.",
    }
}

/// Build the reasoning block.
///
/// `fraud_score` is the final score, which differs from the posterior when a
/// calibration curve was applied. A survey override on `decision` is listed
/// as a key factor (or a mitigating one when it accepts) and noted after the
/// recommendation.
pub fn explain(
    decision: &Decision,
    fraud_score: f64,
    analysis: &BayesianAnalysis,
    normalized: &Normalized,
    buckets: &EvidenceBuckets,
    profiles: &DetectorProfiles,
) -> Reasoning {
    let risk_level = decision.risk_level;
    let key = key_findings(buckets);
    let mut key_factors: Vec<String> = key
        .iter()
        .map(|f| format!("{}: {} - {}", f.severity.tag(), f.source, f.description))
        .collect();

    let mut mitigating_factors: Vec<String> =
        buckets.benign.iter().map(|f| f.description.clone()).collect();
    if analysis.posterior_probability < analysis.prior_probability {
        mitigating_factors.push(DECREASED_FROM_BASELINE.to_string());
    }

    let mut recommendation = recommendation(risk_level).to_string();
    if let Some(reason) = &decision.override_reason {
        let note = override_note(decision.action, reason);
        match decision.action {
            Action::Accept => mitigating_factors.push(note.clone()),
            _ => key_factors.push(note.clone()),
        }
        recommendation.push(' ');
        recommendation.push_str(&note);
    }

    let reasoning = Reasoning {
        summary: summary(risk_level, fraud_score, analysis, normalized, buckets, &key, profiles),
        key_factors,
        mitigating_factors,
        recommendation,
        alternative_explanations: alternative_explanations(normalized),
    };
    tracing::debug!(
        target: event_names::EXPLAIN_FINISHED,
        stage = %Stage::Explain,
        indicators = buckets.indicator_count(),
        benign = buckets.benign.len(),
        key_factors = reasoning.key_factors.len(),
        "reasoning built"
    );
    reasoning
}

fn override_note(action: Action, reason: &str) -> String {
    format!(
        "SURVEY OVERRIDE: action set to {} ({}).",
        action.as_str().to_uppercase(),
        reason
    )
}

/// Critical and high findings, then the strongest medium ones.
fn key_findings(buckets: &EvidenceBuckets) -> Vec<&Finding> {
    let mut medium: Vec<&Finding> = buckets.medium.iter().collect();
    medium.sort_by(|a, b| b.impact.total_cmp(&a.impact));

    buckets
        .critical
        .iter()
        .chain(&buckets.high)
        .chain(medium.into_iter().take(MEDIUM_KEY_FACTORS))
        .collect()
}

fn summary(
    risk_level: RiskLevel,
    fraud_score: f64,
    analysis: &BayesianAnalysis,
    normalized: &Normalized,
    buckets: &EvidenceBuckets,
    key: &[&Finding],
    profiles: &DetectorProfiles,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "FRAUD ASSESSMENT: {} RISK",
        risk_level.as_str().to_uppercase()
    );
    let _ = write!(out, "Fraud probability {:.1}%", fraud_score * 100.0);
    if fraud_score != analysis.posterior_probability {
        let _ = write!(
            out,
            " (calibrated from {:.1}%)",
            analysis.posterior_probability * 100.0
        );
    }
    let _ = writeln!(out, " (confidence {:.0}%)", analysis.confidence * 100.0);
    let _ = writeln!(
        out,
        "{} of {} detectors reported; {} fraud indicators ({} critical, {} high, {} medium)",
        normalized.present_count(),
        Detector::ALL.len(),
        buckets.indicator_count(),
        buckets.critical.len(),
        buckets.high.len(),
        buckets.medium.len()
    );

    let mut sources: Vec<&str> = Vec::new();
    for finding in key {
        if !sources.contains(&finding.source.as_str()) {
            sources.push(&finding.source);
        }
    }
    if !sources.is_empty() {
        let _ = writeln!(out, "Key factors from: {}", sources.join(", "));
    }

    let active: Vec<Detector> = normalized
        .evidence
        .iter()
        .filter(|e| e.observed && e.origin == EvidenceOrigin::Detector)
        .map(|e| e.detector)
        .collect();
    if active.is_empty() {
        let _ = write!(out, "No detector scored above its evidence cutoff.");
        return out;
    }
    let _ = write!(out, "Active detectors:");
    for detector in active {
        let score = normalized.score(detector).unwrap_or(0.0);
        let _ = write!(
            out,
            "\n- {}: {:.1}% ({})",
            profiles.get(detector).label,
            score * 100.0,
            score_interpretation(score)
        );
    }
    out
}

/// Innocent readings of specific score combinations.
///
/// Absent detectors read as 0.
fn alternative_explanations(normalized: &Normalized) -> Vec<String> {
    let score = |d: Detector| normalized.score(d).unwrap_or(0.0);
    let behavioral = score(Detector::Behavioral);
    let ai = score(Detector::AiContent);

    let rules: [(bool, &str); 5] = [
        (
            behavioral > 0.5 && ai < 0.3,
            "Fast completion could indicate familiarity with topic rather than cheating",
        ),
        (
            score(Detector::IpReputation) > 0.5,
            "VPN usage may be for privacy rather than fraud",
        ),
        (
            score(Detector::Contradictions) > 0.4,
            "Contradictions could indicate carelessness or misunderstanding rather than fraud",
        ),
        (
            score(Detector::DeviceFingerprint) > 0.5 && behavioral < 0.3,
            "Unusual device signature may come from privacy or accessibility tooling rather than automation",
        ),
        (
            score(Detector::Plagiarism) > 0.4 && ai < 0.3,
            "Similarity to known sources may reflect quoting common phrasing rather than copying",
        ),
    ];
    rules
        .into_iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, text)| text.to_string())
        .collect()
}
