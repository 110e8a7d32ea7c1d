//! Configuration loading and validation for sentinel-core.
//!
//! This module handles:
//! - Config resolution order (CLI > env > XDG > defaults)
//! - Parsing (JSON or TOML by extension)
//! - Semantic validation (weights, bands, probabilities)
//! - Config snapshot generation for audit output

pub use sentinel_config::{
    resolve_config, validate_scoring_config, validate_survey_config, ConfigPaths, ConfigSnapshot,
    ConfigSource, ScoringConfig, SurveyThresholdConfig, ValidationError,
};

use sentinel_config::scoring::ConfigFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::logging::{event_names, Stage};

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for sentinel_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::IoError { source, .. } => sentinel_common::Error::Io(source),
            ConfigError::ValidationError(inner) => inner.into(),
            other => sentinel_common::Error::Config(other.to_string()),
        }
    }
}

/// Resolved configuration with provenance information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ScoringConfig,
    pub paths: ConfigPaths,
    /// Raw file content (None if using defaults).
    raw: Option<String>,
}

impl ResolvedConfig {
    /// Built-in defaults with no backing file.
    pub fn defaults() -> Self {
        ResolvedConfig {
            config: ScoringConfig::default(),
            paths: ConfigPaths::default(),
            raw: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.paths.scoring.as_deref()
    }

    pub fn using_defaults(&self) -> bool {
        self.raw.is_none()
    }

    /// Create a config snapshot for audit output.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(&self.config, &self.paths, self.raw.as_deref())
    }
}

/// Load the scoring configuration with the standard resolution order.
///
/// Resolution order (highest to lowest priority):
/// 1. Explicit `--config` path (must exist)
/// 2. `SENTINEL_CONFIG`
/// 3. `SENTINEL_CONFIG_DIR/scoring.{json,toml}`
/// 4. XDG config home (`~/.config/sentinel/`)
/// 5. Built-in defaults
pub fn load_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let paths = resolve_config(cli_path);

    let Some(path) = paths.scoring.clone() else {
        tracing::debug!(
            target: event_names::CONFIG_DEFAULT_USED,
            stage = %Stage::Init,
            "no scoring config found; using built-in defaults"
        );
        return Ok(ResolvedConfig::defaults());
    };

    let raw = read_config_file(&path)?;
    let config = parse_config(&path, &raw)?;
    validate_scoring_config(&config)?;

    tracing::info!(
        target: event_names::CONFIG_LOADED,
        stage = %Stage::Init,
        path = %path.display(),
        source = %paths.source,
        "scoring config loaded"
    );

    Ok(ResolvedConfig {
        config,
        paths,
        raw: Some(raw),
    })
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(path: &Path, raw: &str) -> Result<ScoringConfig, ConfigError> {
    ScoringConfig::parse(raw, ConfigFormat::from_path(path)).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
