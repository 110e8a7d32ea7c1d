//! The scoring configuration passed to every engine call.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::detectors::DetectorProfiles;
use crate::thresholds::{default_ensemble_bands, EnsembleBand};
use crate::validate::{ValidationError, ValidationResult};
use sentinel_math::ConfidenceLevel;

/// Read-only configuration for the scoring engine.
///
/// `ScoringConfig::default()` is the built-in deployment profile. Config files
/// may set any subset of fields; the rest keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub schema_version: String,

    /// Stamped on every result.
    pub model_version: String,

    /// Base fraud rate used when a request carries no prior.
    pub default_prior: f64,

    /// `is_likely_fraud` threshold on the final fraud score.
    pub likely_fraud_cutoff: f64,

    /// Upper bound on reported confidence.
    pub confidence_cap: f64,

    /// Observed-evidence count at which confidence stops growing with count.
    pub evidence_saturation: u32,

    /// Effective Wilson sample size contributed by each observed item.
    pub samples_per_evidence: f64,

    /// Confidence level of the reported interval.
    pub interval_level: ConfidenceLevel,

    pub detectors: DetectorProfiles,

    pub ensemble_bands: Vec<EnsembleBand>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            model_version: sentinel_common::MODEL_VERSION.to_string(),
            default_prior: 0.15,
            likely_fraud_cutoff: 0.6,
            confidence_cap: 0.95,
            evidence_saturation: 10,
            samples_per_evidence: 10.0,
            interval_level: ConfidenceLevel::P95,
            detectors: DetectorProfiles::default(),
            ensemble_bands: default_ensemble_bands(),
        }
    }
}

/// On-disk encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension. Anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> ConfigFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

impl ScoringConfig {
    /// Load a configuration from a JSON or TOML file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// Parse a configuration from a string in the given format.
    pub fn parse(content: &str, format: ConfigFormat) -> ValidationResult<Self> {
        match format {
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e))),
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| ValidationError::ParseError(format!("Invalid TOML: {}", e))),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
