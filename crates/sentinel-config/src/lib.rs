//! SENTINEL scoring configuration.
//!
//! This crate provides:
//! - Typed structs for the scoring configuration (detector profiles, 4-band
//!   detector tables, the 8-band ensemble table, engine constants)
//! - Survey threshold overrides and sensitivity presets
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - Config snapshots (path + SHA-256) for audit output

pub mod detectors;
pub mod resolve;
pub mod scoring;
pub mod snapshot;
pub mod survey;
pub mod thresholds;
pub mod validate;

pub use detectors::{DetectorProfile, DetectorProfiles};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource};
pub use scoring::ScoringConfig;
pub use snapshot::ConfigSnapshot;
pub use survey::{Sensitivity, SurveyThresholdConfig};
pub use thresholds::{EnsembleBand, ThresholdRange};
pub use validate::{validate_scoring_config, validate_survey_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = sentinel_common::SCHEMA_VERSION;
