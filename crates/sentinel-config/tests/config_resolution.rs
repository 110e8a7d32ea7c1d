//! Configuration resolution + file validation tests against real files.
//!
//! Covers:
//! - Resolution order (CLI > SENTINEL_CONFIG > SENTINEL_CONFIG_DIR > XDG)
//! - JSON and TOML files parsed by extension
//! - Validation failures on malformed files

use sentinel_config::resolve::{resolve_config, ConfigSource};
use sentinel_config::validate::{validate_scoring_config, ValidationError};
use sentinel_config::ScoringConfig;
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const ENV_KEYS: [&str; 3] = ["SENTINEL_CONFIG", "SENTINEL_CONFIG_DIR", "XDG_CONFIG_HOME"];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn new(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|k| (k.to_string(), env::var(k).ok()))
            .collect();
        for key in keys {
            env::remove_var(key);
        }
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

fn with_env_lock<T>(f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f()
}

fn write_default_json(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    let json = ScoringConfig::default().to_json_pretty().expect("serialize");
    fs::write(path, json).expect("write config");
}

#[test]
fn test_cli_over_env() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let cli = temp.path().join("cli").join("scoring.json");
        let env_file = temp.path().join("env").join("scoring.json");
        write_default_json(&cli);
        write_default_json(&env_file);
        env::set_var("SENTINEL_CONFIG", env_file.display().to_string());

        let paths = resolve_config(Some(&cli));
        assert_eq!(paths.source, ConfigSource::CliArgument);
        assert_eq!(paths.scoring.unwrap(), cli);
    });
}

#[test]
fn test_env_path_over_config_dir() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let env_file = temp.path().join("env").join("custom.json");
        let dir = temp.path().join("dir");
        write_default_json(&env_file);
        write_default_json(&dir.join("scoring.json"));
        env::set_var("SENTINEL_CONFIG", env_file.display().to_string());
        env::set_var("SENTINEL_CONFIG_DIR", dir.display().to_string());

        let paths = resolve_config(None);
        assert_eq!(paths.source, ConfigSource::Environment);
        assert_eq!(paths.scoring.unwrap(), env_file);
    });
}

#[test]
fn test_config_dir_finds_toml() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        let toml_path = temp.path().join("scoring.toml");
        fs::write(&toml_path, ScoringConfig::default().to_toml().expect("toml")).expect("write");
        env::set_var("SENTINEL_CONFIG_DIR", temp.path().display().to_string());

        let paths = resolve_config(None);
        assert_eq!(paths.source, ConfigSource::Environment);
        let found = paths.scoring.expect("path");
        assert_eq!(found, toml_path);

        let cfg = ScoringConfig::from_file(&found).expect("parse toml");
        validate_scoring_config(&cfg).expect("defaults validate");
    });
}

#[test]
fn test_missing_env_path_falls_through() {
    with_env_lock(|| {
        let _guard = EnvGuard::new(&ENV_KEYS);
        let temp = TempDir::new().expect("temp dir");
        env::set_var(
            "SENTINEL_CONFIG",
            temp.path().join("missing.json").display().to_string(),
        );
        env::set_var("XDG_CONFIG_HOME", temp.path().join("xdg").display().to_string());

        let paths = resolve_config(None);
        assert_ne!(paths.source, ConfigSource::Environment);
    });
}

#[test]
fn test_invalid_file_fails_validation() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("scoring.json");
    fs::write(
        &path,
        r#"{"detectors": {"behavioral": {
            "base_weight": 0.9, "likelihood": 0.85, "observed_above": 0.3,
            "label": "Behavioral Analysis", "signal": "Suspicious behavioral patterns",
            "bands": [{"min": 0.0, "max": 1.0, "risk_level": "low",
                       "confidence_floor": 0.6, "description": "all"}]
        }}}"#,
    )
    .expect("write");

    let cfg = ScoringConfig::from_file(&path).expect("parses");
    let err = validate_scoring_config(&cfg).expect_err("weights no longer sum to 1");
    assert!(matches!(err, ValidationError::SemanticError(_)));
}

#[test]
fn test_partial_detector_override_keeps_defaults() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("scoring.toml");
    fs::write(
        &path,
        "[detectors.ai_content]\nbase_weight = 0.15\n\n[detectors.plagiarism]\nbase_weight = 0.20\n",
    )
    .expect("write");

    let cfg = ScoringConfig::from_file(&path).expect("parses");
    assert_eq!(cfg.detectors.ai_content.base_weight, 0.15);
    assert_eq!(cfg.detectors.ai_content.label, "AI Content Detection");
    assert_eq!(cfg.detectors.plagiarism.bands.len(), 4);
    validate_scoring_config(&cfg).expect("weights still sum to 1");
}

#[test]
fn test_unreadable_file_is_io_error() {
    let err = ScoringConfig::from_file(Path::new("/nonexistent/sentinel/scoring.json"))
        .expect_err("missing file");
    assert!(matches!(err, ValidationError::IoError(_)));
}

#[test]
fn test_garbage_is_parse_error() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("scoring.toml");
    fs::write(&path, "default_prior = [").expect("write");
    let err = ScoringConfig::from_file(&path).expect_err("bad toml");
    assert!(matches!(err, ValidationError::ParseError(_)));
}
