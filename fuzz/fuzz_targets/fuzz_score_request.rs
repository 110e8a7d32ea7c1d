//! Fuzz target for score request parsing and scoring.
//!
//! Any request that parses must score without panicking, and the result
//! must stay inside its own invariants.

#![no_main]

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use sentinel_config::ScoringConfig;
use sentinel_core::{score_response_at, ScoreRequest};

fuzz_target!(|data: &str| {
    let Ok(request) = ScoreRequest::from_json(data) else {
        return;
    };
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let result = score_response_at(&request, &ScoringConfig::default(), at);

    assert!((0.0..=1.0).contains(&result.fraud_score) || result.fraud_score.is_nan());
    assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
    let _ = serde_json::to_string(&result);
});
