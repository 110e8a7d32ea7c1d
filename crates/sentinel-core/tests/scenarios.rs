//! End-to-end scoring scenarios.
//!
//! Each test runs the full pipeline through `score_response_at` with the
//! built-in configuration and checks the verdict a reviewer would expect.

use chrono::{DateTime, TimeZone, Utc};
use sentinel_common::{Action, Detector, RiskLevel};
use sentinel_config::{ScoringConfig, Sensitivity, SurveyThresholdConfig};
use sentinel_core::calibrate::{interval_for, CalibrationCurve};
use sentinel_core::decision::{classify, LOW_CONFIDENCE_SUFFIX};
use sentinel_core::{score_response_at, EnsembleScoreResult, ScoreRequest};
use sentinel_math::ConfidenceLevel;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

fn score(request: &ScoreRequest) -> EnsembleScoreResult {
    score_response_at(request, &ScoringConfig::default(), fixed_time())
}

fn all_detectors(value: f64) -> ScoreRequest {
    Detector::ALL
        .into_iter()
        .fold(ScoreRequest::new(), |req, d| req.with_score(d, value))
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn ai_generated_text_with_normal_behavior() {
    let request = ScoreRequest::new()
        .with_score(Detector::AiContent, 0.92)
        .with_score(Detector::Behavioral, 0.15);
    let result = score(&request);

    // 0.15 prior, one observed item (L = 0.90, strength 0.92).
    assert!((result.fraud_score - 0.576_55).abs() < 1e-4, "{}", result.fraud_score);
    assert!((result.confidence - 0.092).abs() < 1e-12);

    // "medium" band, floor 0.70 not met: escalated one tier.
    assert_eq!(result.decision.band, "medium");
    assert!(result.decision.escalated);
    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.decision.action, Action::Review);
    assert!(!result.is_likely_fraud);

    assert_eq!(result.evidence.critical.len(), 1);
    assert_eq!(result.evidence.benign.len(), 1);
    assert!(result.reasoning.summary.contains("AI Content Detection"));
    assert!(!result.reasoning.summary.contains("Behavioral Analysis"));
    assert!(result.reasoning.recommendation.starts_with("FLAG FOR REVIEW"));
}

#[test]
fn all_zero_scores_stay_at_prior() {
    let result = score(&all_detectors(0.0));

    assert_eq!(result.fraud_score, 0.15);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.decision.band, "veryLow");
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.decision.action, Action::Accept);
    assert!(!result.decision.escalated);
    assert_eq!(result.evidence.indicator_count(), 0);
    assert_eq!(result.evidence.benign.len(), 8);
}

#[test]
fn all_one_scores_are_rejected() {
    let result = score(&all_detectors(1.0));

    assert!(result.fraud_score >= 0.95);
    assert!((result.confidence - 0.8).abs() < 1e-12);
    assert_eq!(result.decision.band, "extreme");
    assert_eq!(result.risk_level, RiskLevel::Critical);
    assert_eq!(result.decision.action, Action::Reject);
    assert!(result.decision.description.ends_with(LOW_CONFIDENCE_SUFFIX));
    assert!(result.is_likely_fraud);
    assert_eq!(result.evidence.critical.len(), 8);
    assert!(result.reasoning.recommendation.starts_with("REJECT"));
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn empty_request_is_a_fixed_point() {
    let result = score(&ScoreRequest::new().with_prior(0.3));
    assert_eq!(result.fraud_score, 0.3);
    assert_eq!(result.bayesian_analysis.prior_probability, 0.3);
    assert_eq!(result.confidence, 0.0);
    assert!(result.evidence.is_empty());
    assert!(result.model_scores.values().all(|e| e.weight == 0.0));
    assert!(result.bayesian_analysis.trace.is_empty());
}

#[test]
fn tiny_and_near_certain_priors_pass_through_unchanged() {
    for prior in [1e-7, 1.0 - 1e-9] {
        let result = score(&ScoreRequest::new().with_prior(prior));
        assert_eq!(result.fraud_score, prior);
        assert_eq!(result.bayesian_analysis.prior_probability, prior);
        assert_eq!(result.bayesian_analysis.posterior_probability, prior);
    }
}

#[test]
fn weights_sum_to_one_over_present_detectors() {
    let request = ScoreRequest::new()
        .with_score(Detector::Plagiarism, 0.4)
        .with_score(Detector::FraudRing, 0.9)
        .with_score(Detector::IpReputation, 0.1);
    let result = score(&request);
    let sum: f64 = result.model_scores.values().map(|e| e.weight).sum();
    assert!((sum - 1.0).abs() < 1e-9);
    assert!(!result.model_scores[&Detector::Behavioral].present);
}

#[test]
fn out_of_range_scores_are_clamped() {
    let request = ScoreRequest::new()
        .with_score(Detector::AiContent, 7.0)
        .with_score(Detector::Behavioral, -2.0);
    let result = score(&request);
    assert_eq!(result.model_scores[&Detector::AiContent].score, 1.0);
    assert_eq!(result.model_scores[&Detector::Behavioral].score, 0.0);
    assert!((0.0..=1.0).contains(&result.fraud_score));
}

#[test]
fn low_confidence_escalates_low_band_to_review() {
    let d = classify(0.30, 0.10, &ScoringConfig::default().ensemble_bands);
    assert_eq!(d.risk_level, RiskLevel::Medium);
    assert_eq!(d.action, Action::Review);
}

#[test]
fn wilson_interval_width_at_reference_point() {
    let ci = interval_for(0.5, 100.0, ConfidenceLevel::P95);
    // Half-width ~0.096 at n = 100.
    assert!((ci.width / 2.0 - 0.10).abs() <= 0.02, "width {}", ci.width);
    assert!(ci.lower >= 0.0 && ci.upper <= 1.0);
    assert!(ci.contains(0.5));
}

#[test]
fn fraud_score_lies_within_its_interval() {
    for request in [
        ScoreRequest::new(),
        all_detectors(0.5),
        all_detectors(1.0),
        ScoreRequest::new().with_score(Detector::DeviceFingerprint, 0.97),
    ] {
        let result = score(&request);
        assert!(
            result.confidence_interval.contains(result.fraud_score),
            "{} not in {:?}",
            result.fraud_score,
            result.confidence_interval
        );
    }
}

#[test]
fn identity_calibration_changes_nothing() {
    let base = ScoreRequest::new().with_score(Detector::Plagiarism, 0.85);
    let identity = CalibrationCurve::from_pairs(&[(0.0, 0.0), (1.0, 1.0)]);
    let plain = score(&base);
    let calibrated = score(&base.clone().with_calibration(identity));
    assert!((plain.fraud_score - calibrated.fraud_score).abs() < 1e-12);
    assert_eq!(plain.risk_level, calibrated.risk_level);
    assert_eq!(calibrated.raw_score, Some(plain.fraud_score));
}

// ============================================================================
// Signals and surveys
// ============================================================================

#[test]
fn catalog_signals_fold_after_detectors() {
    let request = ScoreRequest::new()
        .with_score(Detector::AiContent, 0.92)
        .with_signal("webdriver_detected")
        .with_signal("not_a_signal");
    let result = score(&request);
    let trace = &result.bayesian_analysis.trace;
    assert_eq!(trace.len(), 2);
    assert_eq!(trace[0].detector, Detector::AiContent);
    assert_eq!(trace[1].detector, Detector::DeviceFingerprint);
    assert_eq!(result.bayesian_analysis.ignored_signals, vec!["not_a_signal"]);
    let without = score(&ScoreRequest::new().with_score(Detector::AiContent, 0.92));
    assert!(result.fraud_score > without.fraud_score);
}

#[test]
fn strict_survey_reports_more_evidence() {
    let request = ScoreRequest::new().with_score(Detector::Contradictions, 0.36);
    let lenient =
        score(&request.clone().with_survey(SurveyThresholdConfig::new(Sensitivity::Lenient)));
    let strict = score(&request.with_survey(
        SurveyThresholdConfig::new(Sensitivity::Strict).with_survey_id("s-strict"),
    ));
    // 0.36 × 1.25 = 0.45 crosses into the high band; × 0.75 = 0.27 stays medium.
    assert_eq!(strict.evidence.high.len(), 1);
    assert_eq!(lenient.evidence.medium.len(), 1);
    assert_eq!(strict.survey_id.as_deref(), Some("s-strict"));
    // The posterior itself ignores survey sensitivity.
    assert_eq!(strict.fraud_score, lenient.fraud_score);
}

#[test]
fn auto_reject_threshold_overrides_band_action() {
    let survey = SurveyThresholdConfig::new(Sensitivity::Balanced).with_auto_thresholds(0.1, 0.5);
    let result = score(
        &ScoreRequest::new()
            .with_score(Detector::AiContent, 0.92)
            .with_survey(survey),
    );
    assert_eq!(result.decision.action, Action::Reject);
    // Risk level still comes from the band table.
    assert_eq!(result.risk_level, RiskLevel::High);
}
