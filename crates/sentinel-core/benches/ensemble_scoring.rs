//! Criterion benchmarks for the end-to-end scoring path in `sentinel-core`.
//!
//! Timestamps are fixed so runs are deterministic.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sentinel_common::Detector;
use sentinel_config::{ScoringConfig, Sensitivity, SurveyThresholdConfig};
use sentinel_core::calibrate::CalibrationCurve;
use sentinel_core::inference::combine;
use sentinel_core::{normalize, score_response_at, ScoreRequest};

fn ai_text_request() -> ScoreRequest {
    ScoreRequest::new()
        .with_score(Detector::AiContent, 0.92)
        .with_score(Detector::Behavioral, 0.15)
}

fn full_request() -> ScoreRequest {
    Detector::ALL
        .into_iter()
        .enumerate()
        .fold(ScoreRequest::new(), |req, (i, d)| {
            req.with_score(d, 0.1 + 0.11 * i as f64)
        })
        .with_signal("webdriver_detected")
        .with_signal("vpn_usage")
        .with_survey(SurveyThresholdConfig::new(Sensitivity::Strict).with_auto_thresholds(0.1, 0.9))
        .with_calibration(CalibrationCurve::from_pairs(&[
            (0.0, 0.0),
            (0.5, 0.4),
            (0.8, 0.75),
            (1.0, 1.0),
        ]))
}

fn bench_score_response(c: &mut Criterion) {
    let config = ScoringConfig::default();
    let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();

    let mut group = c.benchmark_group("ensemble");

    for (name, request) in [
        ("empty", ScoreRequest::new()),
        ("ai_text", ai_text_request()),
        ("all_detectors", full_request()),
    ] {
        group.bench_with_input(
            BenchmarkId::new("score_response", name),
            &request,
            |b, req| {
                b.iter(|| {
                    let result = score_response_at(black_box(req), black_box(&config), at);
                    black_box(result.fraud_score);
                })
            },
        );
    }

    // Posterior fold alone, without explanation or reasoning text.
    let request = full_request();
    let normalized = normalize(&request.detector_scores(), &config.detectors);
    group.bench_function("combine_only", |b| {
        b.iter(|| {
            let analysis = combine(None, black_box(&normalized.evidence), &config);
            black_box(analysis.posterior_probability);
        })
    });

    // Batch of 1k varied responses.
    let batch: Vec<ScoreRequest> = (0..1_000u32)
        .map(|i| {
            Detector::ALL
                .into_iter()
                .enumerate()
                .filter(|(j, _)| (i as usize + j) % 3 != 0)
                .fold(ScoreRequest::new(), |req, (j, d)| {
                    req.with_score(d, ((i as usize * 7 + j * 13) % 100) as f64 / 100.0)
                })
        })
        .collect();

    group.bench_function("score_response_1k", |b| {
        b.iter(|| {
            let mut acc = 0.0f64;
            for req in batch.iter() {
                acc += score_response_at(req, &config, at).fraud_score;
            }
            black_box(acc);
        })
    });

    group.finish();
}

criterion_group!(benches, bench_score_response);
criterion_main!(benches);
