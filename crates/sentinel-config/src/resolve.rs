//! Configuration resolution and path discovery.
//!
//! Lookup order: `--config`, then environment variables, then the XDG
//! config directory, then built-in defaults.

use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "SENTINEL_CONFIG";
pub const ENV_CONFIG_DIR: &str = "SENTINEL_CONFIG_DIR";

/// Looked up in this order inside a config directory.
const CONFIG_FILENAMES: [&str; 2] = ["scoring.json", "scoring.toml"];
const APP_NAME: &str = "sentinel";

/// Where the scoring config came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    XdgConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConfigSource::CliArgument => "CLI argument",
            ConfigSource::Environment => "environment variable",
            ConfigSource::XdgConfig => "XDG config",
            ConfigSource::BuiltinDefault => "builtin default",
        })
    }
}

/// Result of config discovery. `scoring` is `None` when defaults apply.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub scoring: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Find the scoring config file.
///
/// An explicit CLI path is returned even when missing so the caller can
/// report it. Otherwise the first hit wins among `SENTINEL_CONFIG`,
/// `$SENTINEL_CONFIG_DIR/scoring.{json,toml}` and
/// `$XDG_CONFIG_HOME/sentinel/scoring.{json,toml}`. No hit means built-in
/// defaults.
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPaths {
    if let Some(path) = cli_path {
        return ConfigPaths {
            scoring: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    let env_file = || {
        std::env::var_os(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .filter(|p| p.exists())
    };
    let env_dir = || std::env::var_os(ENV_CONFIG_DIR).and_then(|d| first_existing(Path::new(&d)));
    let xdg = || dirs::config_dir().and_then(|d| first_existing(&d.join(APP_NAME)));

    let found = env_file()
        .map(|p| (p, ConfigSource::Environment))
        .or_else(|| env_dir().map(|p| (p, ConfigSource::Environment)))
        .or_else(|| xdg().map(|p| (p, ConfigSource::XdgConfig)));

    match found {
        Some((path, source)) => ConfigPaths {
            scoring: Some(path),
            source,
        },
        None => ConfigPaths::default(),
    }
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_path_wins_even_when_missing() {
        let paths = resolve_config(Some(Path::new("/nonexistent/scoring.toml")));
        assert_eq!(paths.source, ConfigSource::CliArgument);
        assert_eq!(paths.scoring, Some(PathBuf::from("/nonexistent/scoring.toml")));
    }

    #[test]
    fn first_existing_prefers_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scoring.toml"), "").unwrap();
        assert_eq!(first_existing(dir.path()), Some(dir.path().join("scoring.toml")));
        std::fs::write(dir.path().join("scoring.json"), "{}").unwrap();
        assert_eq!(first_existing(dir.path()), Some(dir.path().join("scoring.json")));
    }

    #[test]
    fn source_display() {
        assert_eq!(ConfigSource::BuiltinDefault.to_string(), "builtin default");
        assert_eq!(ConfigSource::Environment.to_string(), "environment variable");
    }
}
