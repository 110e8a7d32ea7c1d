//! Audit record of the scoring config behind a run.
//!
//! `sentinel check` prints one of these so a verdict can be traced back to
//! the exact bytes that configured it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::ConfigPaths;
use crate::ScoringConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub timestamp: DateTime<Utc>,
    pub schema_version: String,
    #[serde(default)]
    pub path: Option<String>,
    pub source: String,
    /// SHA-256 hex of the file bytes. Defaults hash their canonical JSON.
    pub hash: String,
    pub summary: ConfigSummary,
}

/// The handful of values an operator checks first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub model_version: String,
    pub default_prior: f64,
    pub likely_fraud_cutoff: f64,
    pub confidence_cap: f64,
    pub interval_level: u8,
    pub ensemble_band_count: usize,
    pub detector_weight_sum: f64,
}

impl From<&ScoringConfig> for ConfigSummary {
    fn from(config: &ScoringConfig) -> Self {
        ConfigSummary {
            model_version: config.model_version.clone(),
            default_prior: config.default_prior,
            likely_fraud_cutoff: config.likely_fraud_cutoff,
            confidence_cap: config.confidence_cap,
            interval_level: config.interval_level.percent(),
            ensemble_band_count: config.ensemble_bands.len(),
            detector_weight_sum: config.detectors.weight_sum(),
        }
    }
}

impl ConfigSnapshot {
    /// `raw` is the file content when the config came from disk.
    pub fn new(config: &ScoringConfig, paths: &ConfigPaths, raw: Option<&str>) -> Self {
        let hash = match raw {
            Some(content) => sha256_hex(content.as_bytes()),
            None => sha256_hex(&serde_json::to_vec(config).unwrap_or_default()),
        };
        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: config.schema_version.clone(),
            path: paths.scoring.as_ref().map(|p| p.display().to_string()),
            source: paths.source.to_string(),
            hash,
            summary: ConfigSummary::from(config),
        }
    }

    /// First 12 hex digits of the hash, for one-line output.
    pub fn short_id(&self) -> &str {
        self.hash.get(..12).unwrap_or(&self.hash)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ConfigSource;

    fn defaults() -> ConfigSnapshot {
        ConfigSnapshot::new(&ScoringConfig::default(), &ConfigPaths::default(), None)
    }

    #[test]
    fn defaults_hash_is_deterministic() {
        let (a, b) = (defaults(), defaults());
        assert_eq!(a.hash, b.hash);
        assert_eq!(a.hash.len(), 64);
        assert_eq!(a.short_id().len(), 12);
        assert_eq!(a.source, "builtin default");
        assert_eq!(a.summary.ensemble_band_count, 8);
        assert!(a.path.is_none());
    }

    #[test]
    fn file_bytes_drive_the_hash() {
        let config = ScoringConfig::default();
        let paths = ConfigPaths {
            scoring: Some("scoring.json".into()),
            source: ConfigSource::CliArgument,
        };
        let a = ConfigSnapshot::new(&config, &paths, Some("{}"));
        let b = ConfigSnapshot::new(&config, &paths, Some("{ }"));
        assert_ne!(a.hash, b.hash);
        // sha256("{}")
        assert!(a.hash.starts_with("44136fa355b3678a"));
        assert_eq!(a.path.as_deref(), Some("scoring.json"));
        assert_eq!(a.source, "CLI argument");
    }
}
