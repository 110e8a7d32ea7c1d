//! Fuzz target for the numeric scoring path.
//!
//! Drives arbitrary detector scores, priors and survey multipliers through the
//! full pipeline, bypassing JSON so non-finite values reach the engine.

#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use sentinel_common::Detector;
use sentinel_config::{ScoringConfig, Sensitivity, SurveyThresholdConfig};
use sentinel_core::{score_response_at, ScoreRequest};

#[derive(Debug, Arbitrary)]
struct Input {
    scores: [Option<f64>; 8],
    prior: Option<f64>,
    strict: bool,
    multiplier: Option<f64>,
    auto_accept: Option<f64>,
    auto_reject: Option<f64>,
}

fuzz_target!(|input: Input| {
    let mut request = Detector::ALL
        .into_iter()
        .zip(input.scores)
        .fold(ScoreRequest::new(), |req, (d, s)| match s {
            Some(score) => req.with_score(d, score),
            None => req,
        });
    request.prior_fraud_rate = input.prior;

    let mut survey = SurveyThresholdConfig::new(if input.strict {
        Sensitivity::Strict
    } else {
        Sensitivity::Lenient
    });
    if let Some(m) = input.multiplier {
        survey.multipliers.insert("aiContent".to_string(), m);
    }
    survey.auto_accept_threshold = input.auto_accept;
    survey.auto_reject_threshold = input.auto_reject;
    let request = request.with_survey(survey);

    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let result = score_response_at(&request, &ScoringConfig::default(), at);

    assert!((0.0..=1.0).contains(&result.fraud_score));
    assert!(result.confidence_interval.contains(result.fraud_score));
    let weights: f64 = result.model_scores.values().map(|e| e.weight).sum();
    assert!(weights == 0.0 || (weights - 1.0).abs() < 1e-9);
});
