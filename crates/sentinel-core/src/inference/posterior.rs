//! Sequential Bayesian combination of fraud evidence.
//!
//! Starting from a prior `p0`, each observed item is folded in order:
//!
//! ```text
//! P(e)   = L·p + (1-L)·(1-p)        with L = P(e | fraud), P(e | ¬fraud) = 1-L
//! p_raw  = L·p / P(e)
//! p     <- clamp(p + (p_raw - p)·strength)
//! ```
//!
//! `strength` blends between no update (0) and the full Bayes update (1).
//! The order of folding matters; callers supply evidence in canonical order.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentinel_common::Detector;
use sentinel_config::ScoringConfig;
use sentinel_math::{clamp_prior, clamp_probability, safe_div};

use crate::logging::{event_names, Stage};

/// Where an evidence item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceOrigin {
    /// One of the eight detector scores.
    Detector,
    /// A named signal from the catalog.
    Catalog,
}

/// One piece of evidence offered to the combiner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub detector: Detector,
    pub origin: EvidenceOrigin,
    pub signal: String,
    /// `P(evidence | fraud)`.
    pub likelihood: f64,
    pub strength: f64,
    pub observed: bool,
}

impl EvidenceItem {
    pub fn from_detector(
        detector: Detector,
        signal: &str,
        likelihood: f64,
        strength: f64,
        observed: bool,
    ) -> Self {
        EvidenceItem {
            detector,
            origin: EvidenceOrigin::Detector,
            signal: signal.to_string(),
            likelihood,
            strength,
            observed,
        }
    }
}

/// One applied update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStep {
    pub signal: String,
    pub detector: Detector,
    pub likelihood: f64,
    pub strength: f64,
    pub before: f64,
    pub after: f64,
    /// `after - before`.
    pub shift: f64,
}

/// Result of folding the evidence list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BayesianAnalysis {
    pub posterior_probability: f64,
    pub prior_probability: f64,
    /// `|posterior - prior|`.
    pub evidence_strength: f64,
    pub confidence: f64,
    pub observed_count: usize,
    pub trace: Vec<UpdateStep>,
    pub reasoning_text: String,
    /// Requested catalog signal names that are not in the catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_signals: Vec<String>,
}

/// One blended Bayes update. `None` when `P(e)` is zero.
pub fn bayes_update(p: f64, likelihood: f64, strength: f64) -> Option<f64> {
    let p_e = likelihood * p + (1.0 - likelihood) * (1.0 - p);
    if p_e == 0.0 || !p_e.is_finite() {
        return None;
    }
    let p_raw = likelihood * p / p_e;
    Some(clamp_probability(p + (p_raw - p) * strength))
}

/// Fold observed evidence into a posterior.
///
/// `prior` falls back to `config.default_prior` when absent or non-finite
/// and is clamped into [0, 1]. With no observed evidence the posterior
/// equals the prior exactly and confidence is 0.
pub fn combine(prior: Option<f64>, evidence: &[EvidenceItem], config: &ScoringConfig) -> BayesianAnalysis {
    let default_prior = config.default_prior;
    let p0 = clamp_prior(prior.unwrap_or(default_prior), default_prior);

    let mut p = p0;
    let mut trace = Vec::new();
    let mut observed_count = 0usize;
    let mut strength_sum = 0.0;

    for item in evidence.iter().filter(|e| e.observed) {
        observed_count += 1;
        let strength = clamp_probability(item.strength);
        strength_sum += strength;

        let Some(next) = bayes_update(p, item.likelihood, strength) else {
            continue;
        };
        tracing::debug!(
            target: event_names::INFER_EVIDENCE_APPLIED,
            stage = %Stage::Infer,
            signal = item.signal.as_str(),
            detector = item.detector.as_str(),
            before = p,
            after = next,
            "evidence applied"
        );
        trace.push(UpdateStep {
            signal: item.signal.clone(),
            detector: item.detector,
            likelihood: item.likelihood,
            strength,
            before: p,
            after: next,
            shift: next - p,
        });
        p = next;
    }

    let confidence = evidence_confidence(strength_sum, observed_count, config);
    let reasoning_text = narrate(p0, p, observed_count, &trace);

    tracing::debug!(
        target: event_names::INFER_FINISHED,
        stage = %Stage::Infer,
        prior = p0,
        posterior = p,
        observed = observed_count,
        confidence,
        "posterior computed"
    );

    BayesianAnalysis {
        posterior_probability: p,
        prior_probability: p0,
        evidence_strength: (p - p0).abs(),
        confidence,
        observed_count,
        trace,
        reasoning_text,
        ignored_signals: Vec::new(),
    }
}

/// `min(cap, avgStrength × min(count / saturation, 1))`.
fn evidence_confidence(strength_sum: f64, count: usize, config: &ScoringConfig) -> f64 {
    let avg_strength = strength_sum / count.max(1) as f64;
    let saturation = safe_div(count as f64, config.evidence_saturation.max(1) as f64, 0.0).min(1.0);
    (avg_strength * saturation).min(config.confidence_cap)
}

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

fn points(shift: f64) -> String {
    format!("{:+.1} pts", shift * 100.0)
}

fn narrate(p0: f64, p: f64, observed: usize, trace: &[UpdateStep]) -> String {
    if observed == 0 {
        return format!(
            "No fraud signals were observed; the probability stays at the {} base rate.",
            percent(p0)
        );
    }

    let mut ranked: Vec<&UpdateStep> = trace.iter().collect();
    ranked.sort_by(|a, b| b.shift.abs().total_cmp(&a.shift.abs()));

    let top: Vec<String> = ranked
        .iter()
        .take(3)
        .map(|s| format!("{} ({})", s.signal, points(s.shift)))
        .collect();

    let net = p - p0;
    let magnitude = match net.abs() {
        m if m >= 0.40 => "strong",
        m if m >= 0.15 => "moderate",
        m if m > 0.0 => "slight",
        _ => "no",
    };
    let direction = if net >= 0.0 { "increase" } else { "decrease" };

    let noun = if observed == 1 { "signal" } else { "signals" };
    let mut text = format!(
        "Starting from a {} base rate, {} observed {} moved the fraud probability to {}.",
        percent(p0),
        observed,
        noun,
        percent(p)
    );
    if !top.is_empty() {
        text.push_str(&format!(" Strongest updates: {}.", top.join("; ")));
    }
    text.push_str(&format!(
        " Net change: {} ({} {}).",
        points(net),
        magnitude,
        direction
    ));
    text
}
