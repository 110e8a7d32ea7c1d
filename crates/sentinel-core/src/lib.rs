//! SENTINEL Core Library
//!
//! This library provides the ensemble fraud scoring engine:
//! - Evidence normalization over the eight detector scores
//! - Sequential Bayesian combination with an auditable trace
//! - Confidence intervals, ensemble voting and calibration curves
//! - Threshold classification with per-survey overrides
//! - Evidence aggregation and human-readable reasoning
//! - Configuration loading, structured logging and exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod calibrate;
pub mod config;
pub mod decision;
pub mod ensemble;
pub mod exit_codes;
pub mod explain;
pub mod inference;
pub mod logging;
pub mod normalize;

pub use ensemble::{score_response, score_response_at, EnsembleScoreResult, ScoreRequest};
pub use normalize::{normalize, DetectorScores, ModelScoreEntry, Normalized};
