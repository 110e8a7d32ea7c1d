//! Fuzz target for scoring config parsing and validation.
//!
//! Tests that JSON and TOML scoring configs are rejected with an error, never
//! a panic, and that configs passing validation can score a request.

#![no_main]

use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use sentinel_common::Detector;
use sentinel_config::scoring::ConfigFormat;
use sentinel_config::{validate_scoring_config, ScoringConfig};
use sentinel_core::{score_response_at, ScoreRequest};

fuzz_target!(|data: &str| {
    for format in [ConfigFormat::Json, ConfigFormat::Toml] {
        let Ok(config) = ScoringConfig::parse(data, format) else {
            continue;
        };
        if validate_scoring_config(&config).is_err() {
            continue;
        }
        let request = ScoreRequest::new()
            .with_score(Detector::AiContent, 0.92)
            .with_score(Detector::Behavioral, 0.15);
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let _ = score_response_at(&request, &config, at);
    }
});
