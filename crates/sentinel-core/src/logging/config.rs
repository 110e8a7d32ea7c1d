//! Logging configuration.
//!
//! The filter comes from, in order: `-v`/`-q` on the command line,
//! `SENTINEL_LOG`, `RUST_LOG`, then [`DEFAULT_DIRECTIVE`]. The output format
//! comes from `--log-format`, then `SENTINEL_LOG_FORMAT`.

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a level or filter directive.
pub const ENV_LOG: &str = "SENTINEL_LOG";
/// Environment variable selecting `human` or `jsonl` output.
pub const ENV_LOG_FORMAT: &str = "SENTINEL_LOG_FORMAT";
/// Clamped or ignored request overrides are the only thing shown by default.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

/// Level selected by `-v` / `-q`, or `None` to defer to the environment.
pub fn verbosity(verbose: u8, quiet: bool) -> Option<LevelFilter> {
    if quiet {
        return Some(LevelFilter::ERROR);
    }
    match verbose {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. `warn` or `warn,infer.evidence_applied=debug`.
    pub directive: String,
    /// Prefix human output with timestamps.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            directive: DEFAULT_DIRECTIVE.to_string(),
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Resolve settings from the process environment and CLI flags.
    pub fn from_env(cli_level: Option<LevelFilter>, cli_format: Option<LogFormat>) -> Self {
        Self::resolve(
            cli_level,
            cli_format,
            std::env::var(ENV_LOG).ok(),
            std::env::var("RUST_LOG").ok(),
            std::env::var(ENV_LOG_FORMAT).ok(),
        )
    }

    fn resolve(
        cli_level: Option<LevelFilter>,
        cli_format: Option<LogFormat>,
        sentinel_log: Option<String>,
        rust_log: Option<String>,
        log_format: Option<String>,
    ) -> Self {
        let directive = match cli_level {
            Some(level) => level.to_string().to_ascii_lowercase(),
            None => [sentinel_log, rust_log]
                .into_iter()
                .flatten()
                .map(|d| d.trim().to_string())
                .find(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string()),
        };

        let format = cli_format
            .or_else(|| log_format.and_then(|f| f.parse().ok()))
            .unwrap_or_default();

        LogConfig {
            format,
            directive,
            timestamps: true,
        }
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Build the filter. A malformed directive falls back to the default.
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
    }
}
