//! End-to-end scoring of one response.
//!
//! normalize → combine → calibrate → interval → classify → survey overrides
//! → aggregate → explain. Every stage is a pure function of the request and
//! the read-only config; the only side effects are `tracing` events.

use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use sentinel_common::{AssessmentId, Detector, Error, RiskLevel};
use sentinel_config::{ScoringConfig, SurveyThresholdConfig};

use crate::calibrate::{score_interval, CalibrationCurve, ConfidenceInterval};
use crate::decision::{adjusted_scores, apply_survey_overrides, classify, Decision};
use crate::explain::{aggregate, explain, EvidenceBuckets, Reasoning};
use crate::inference::{combine, resolve_signals, BayesianAnalysis};
use crate::logging::{event_names, Stage};
use crate::normalize::{normalize, DetectorScores, ModelScoreEntry};

/// Input for one scoring call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// Detector name → score. `null` and missing both mean "not run".
    #[serde(default)]
    pub detector_scores: BTreeMap<String, Option<f64>>,

    /// Base fraud rate; the config default is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_fraud_rate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_threshold_config: Option<SurveyThresholdConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_curve: Option<CalibrationCurve>,

    /// Named catalog signals observed for this response.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signals: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_id: Option<String>,
}

impl ScoreRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a request from JSON.
    pub fn from_json(input: &str) -> Result<Self, Error> {
        serde_json::from_str(input)
            .map_err(|e| Error::InvalidRequest(format!("malformed score request: {e}")))
    }

    pub fn with_score(mut self, detector: Detector, score: f64) -> Self {
        self.detector_scores
            .insert(detector.as_str().to_string(), Some(score));
        self
    }

    pub fn with_prior(mut self, prior: f64) -> Self {
        self.prior_fraud_rate = Some(prior);
        self
    }

    pub fn with_survey(mut self, survey: SurveyThresholdConfig) -> Self {
        self.survey_threshold_config = Some(survey);
        self
    }

    pub fn with_calibration(mut self, curve: CalibrationCurve) -> Self {
        self.calibration_curve = Some(curve);
        self
    }

    pub fn with_signal(mut self, name: impl Into<String>) -> Self {
        self.signals.push(name.into());
        self
    }

    /// Typed view of `detector_scores`.
    pub fn detector_scores(&self) -> DetectorScores {
        DetectorScores::from_named(
            self.detector_scores
                .iter()
                .map(|(name, score)| (name.as_str(), *score)),
        )
    }
}

/// Full scoring result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleScoreResult {
    /// Final fraud probability (calibrated when a curve was supplied).
    pub fraud_score: f64,
    pub risk_level: RiskLevel,
    pub is_likely_fraud: bool,
    pub decision: Decision,
    pub confidence: f64,
    pub confidence_interval: ConfidenceInterval,
    pub model_scores: BTreeMap<Detector, ModelScoreEntry>,
    pub bayesian_analysis: BayesianAnalysis,
    pub evidence: EvidenceBuckets,
    pub reasoning: Reasoning,
    pub assessment_id: AssessmentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_id: Option<String>,
    /// Posterior before calibration; only set when a curve was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<f64>,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub model_version: String,
}

/// Score a response now.
pub fn score_response(request: &ScoreRequest, config: &ScoringConfig) -> EnsembleScoreResult {
    score_response_at(request, config, Utc::now())
}

/// Score a response with an explicit timestamp.
pub fn score_response_at(
    request: &ScoreRequest,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> EnsembleScoreResult {
    let assessment_id = AssessmentId::at(now);
    tracing::debug!(
        target: event_names::SCORE_STARTED,
        stage = %Stage::Init,
        assessment_id = %assessment_id,
        detectors = request.detector_scores.len(),
        signals = request.signals.len(),
        "scoring started"
    );

    let scores = request.detector_scores();
    for name in scores.unknown() {
        tracing::warn!(
            target: event_names::NORMALIZE_SCORE_DROPPED,
            stage = %Stage::Normalize,
            detector = name.as_str(),
            "unknown detector name ignored"
        );
    }
    let normalized = normalize(&scores, &config.detectors);

    let resolved = resolve_signals(&request.signals);
    let mut evidence = normalized.evidence.clone();
    evidence.extend(resolved.evidence);
    let mut analysis = combine(request.prior_fraud_rate, &evidence, config);
    analysis.ignored_signals = resolved.ignored;

    let posterior = analysis.posterior_probability;
    let (fraud_score, raw_score) = match &request.calibration_curve {
        Some(curve) if !curve.is_empty() => {
            let calibrated = curve.apply(posterior);
            tracing::debug!(
                target: event_names::CALIBRATE_APPLIED,
                stage = %Stage::Calibrate,
                raw = posterior,
                calibrated,
                points = curve.points().len(),
                "calibration curve applied"
            );
            (calibrated, Some(posterior))
        }
        _ => (posterior, None),
    };
    let confidence_interval = score_interval(fraud_score, analysis.observed_count, config);

    let survey = request.survey_threshold_config.as_ref();
    let mut decision = classify(fraud_score, analysis.confidence, &config.ensemble_bands);
    if let Some(survey) = survey {
        decision = apply_survey_overrides(decision, fraud_score, survey);
    }

    let adjusted = adjusted_scores(&normalized, survey);
    let buckets = aggregate(&normalized, &adjusted, &config.detectors);
    let reasoning = explain(
        &decision,
        fraud_score,
        &analysis,
        &normalized,
        &buckets,
        &config.detectors,
    );

    let result = EnsembleScoreResult {
        fraud_score,
        risk_level: decision.risk_level,
        is_likely_fraud: fraud_score >= config.likely_fraud_cutoff,
        confidence: analysis.confidence,
        confidence_interval,
        model_scores: normalized.entries,
        bayesian_analysis: analysis,
        evidence: buckets,
        reasoning,
        assessment_id,
        survey_id: survey.and_then(|s| s.survey_id.clone()),
        respondent_id: request.respondent_id.clone(),
        raw_score,
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        model_version: config.model_version.clone(),
        decision,
    };

    tracing::debug!(
        target: event_names::SCORE_FINISHED,
        stage = %Stage::Report,
        assessment_id = %result.assessment_id,
        fraud_score = result.fraud_score,
        risk_level = %result.risk_level,
        action = %result.decision.action,
        "scoring finished"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sentinel_common::Action;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 22).unwrap()
    }

    #[test]
    fn request_parses_camel_case_json() {
        let req = ScoreRequest::from_json(
            r#"{
                "detectorScores": {"aiContent": 0.9, "behavioral": null},
                "priorFraudRate": 0.2,
                "signals": ["vpn_usage"],
                "respondentId": "r-1"
            }"#,
        )
        .unwrap();
        assert_eq!(req.detector_scores.len(), 2);
        assert_eq!(req.prior_fraud_rate, Some(0.2));
        let scores = req.detector_scores();
        assert_eq!(scores.get(Detector::AiContent), Some(0.9));
        assert_eq!(scores.get(Detector::Behavioral), None);
    }

    #[test]
    fn malformed_request_is_an_input_error() {
        let err = ScoreRequest::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn result_is_stamped() {
        let config = ScoringConfig::default();
        let result = score_response_at(&ScoreRequest::new(), &config, at());
        assert_eq!(result.timestamp, "2026-10-19T14:30:22.000Z");
        assert!(result.assessment_id.as_str().starts_with("sa-20261019-143022-"));
        assert_eq!(result.model_version, config.model_version);
        assert!(result.survey_id.is_none());
    }

    #[test]
    fn unknown_names_are_reported_not_fatal() {
        let mut req = ScoreRequest::new()
            .with_signal("tor_detected")
            .with_signal("moon_phase");
        req.detector_scores.insert("horoscope".into(), Some(1.0));
        let result = score_response_at(&req, &ScoringConfig::default(), at());
        assert_eq!(result.bayesian_analysis.ignored_signals, vec!["moon_phase"]);
        assert_eq!(result.bayesian_analysis.observed_count, 1);
        assert!(result.fraud_score > 0.15);
    }

    #[test]
    fn calibration_only_when_curve_supplied() {
        let config = ScoringConfig::default();
        let base = ScoreRequest::new().with_score(Detector::AiContent, 0.92);
        let plain = score_response_at(&base, &config, at());
        assert!(plain.raw_score.is_none());

        let curve = CalibrationCurve::from_pairs(&[(0.0, 0.0), (1.0, 0.5)]);
        let calibrated = score_response_at(&base.clone().with_calibration(curve), &config, at());
        assert_eq!(calibrated.raw_score, Some(plain.fraud_score));
        assert!((calibrated.fraud_score - plain.fraud_score / 2.0).abs() < 1e-12);
        assert!(calibrated.confidence_interval.contains(calibrated.fraud_score));
        assert!(calibrated.reasoning.summary.contains("calibrated from"));
    }

    #[test]
    fn survey_id_and_override_flow_through() {
        let survey = SurveyThresholdConfig::new(sentinel_config::Sensitivity::Balanced)
            .with_survey_id("s-42")
            .with_auto_thresholds(0.1, 0.5);
        let req = ScoreRequest::new()
            .with_score(Detector::AiContent, 0.92)
            .with_survey(survey);
        let result = score_response_at(&req, &ScoringConfig::default(), at());
        assert_eq!(result.survey_id.as_deref(), Some("s-42"));
        assert_eq!(result.decision.action, Action::Reject);
        assert!(result.decision.override_reason.is_some());
        assert!(result.reasoning.recommendation.contains("action set to REJECT"));
    }

    #[test]
    fn result_serializes_with_camel_case_keys() {
        let result = score_response_at(
            &ScoreRequest::new().with_score(Detector::DeviceFingerprint, 0.8),
            &ScoringConfig::default(),
            at(),
        );
        let json = serde_json::to_value(&result).unwrap();
        for key in [
            "fraudScore",
            "riskLevel",
            "isLikelyFraud",
            "confidenceInterval",
            "modelScores",
            "bayesianAnalysis",
            "assessmentId",
            "modelVersion",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["modelScores"].get("deviceFingerprint").is_some());
        assert!(json.get("rawScore").is_none());
    }
}
