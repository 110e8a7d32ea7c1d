//! Boundary errors.
//!
//! Scoring itself is total: missing detectors are skipped and out-of-range
//! numbers are clamped. Errors only come from loading configuration, reading
//! request files and writing output. On stderr they render either as a short
//! human block or as a [`StructuredError`]:
//!
//! ```json
//! {
//!   "code": 11,
//!   "category": "config",
//!   "message": "invalid scoring config: detector weights sum to 0.9",
//!   "recoverable": true,
//!   "suggested_action": "run_check"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Config,
    /// Malformed requests, curves, survey overrides or estimate files.
    Input,
    Io,
    /// A bug in sentinel itself.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Config => "config",
            ErrorCategory::Input => "input",
            ErrorCategory::Io => "io",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// What an automated caller should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    Retry,
    /// Run `sentinel check` against the config.
    RunCheck,
    FixInput,
    ReportBug,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid scoring config: {0}")]
    InvalidScoringConfig(String),

    #[error("schema version mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    #[error("invalid survey threshold config: {0}")]
    InvalidSurveyConfig(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid calibration curve: {0}")]
    InvalidCurve(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Static facts about one error variant.
struct Profile {
    code: u32,
    category: ErrorCategory,
    action: SuggestedAction,
    headline: &'static str,
    fix: &'static str,
}

impl Error {
    fn profile(&self) -> Profile {
        use ErrorCategory as C;
        use SuggestedAction as A;
        let (code, category, action, headline, fix) = match self {
            Error::Config(_) => (
                10,
                C::Config,
                A::RunCheck,
                "Configuration Error",
                "Run 'sentinel check' and fix the reported file.",
            ),
            Error::InvalidScoringConfig(_) => (
                11,
                C::Config,
                A::RunCheck,
                "Invalid Scoring Configuration",
                "Run 'sentinel check' for details, or remove the file to use built-in defaults.",
            ),
            Error::SchemaMismatch { .. } => (
                12,
                C::Config,
                A::RunCheck,
                "Schema Version Mismatch",
                "Regenerate the file from 'sentinel thresholds --format json'.",
            ),
            Error::InvalidSurveyConfig(_) => (
                20,
                C::Input,
                A::FixInput,
                "Invalid Survey Threshold Configuration",
                "Thresholds must lie in [0,1] and multipliers must be positive.",
            ),
            Error::InvalidRequest(_) => (
                21,
                C::Input,
                A::FixInput,
                "Invalid Request",
                "Send a JSON object with a 'detectorScores' map. See 'sentinel schema'.",
            ),
            Error::InvalidCurve(_) => (
                22,
                C::Input,
                A::FixInput,
                "Invalid Calibration Curve",
                "Send a non-empty JSON array of {\"predicted\", \"actual\"} points.",
            ),
            Error::Io(_) => (
                60,
                C::Io,
                A::Retry,
                "I/O Error",
                "Check that the file exists and is readable.",
            ),
            Error::Internal(_) => (
                90,
                C::Internal,
                A::ReportBug,
                "Internal Error",
                "Report this with the request payload that triggered it.",
            ),
        };
        Profile {
            code,
            category,
            action,
            headline,
            fix,
        }
    }

    /// Stable numeric code for machine parsing.
    pub fn code(&self) -> u32 {
        self.profile().code
    }

    pub fn category(&self) -> ErrorCategory {
        self.profile().category
    }

    pub fn suggested_action(&self) -> SuggestedAction {
        self.profile().action
    }

    /// Schema mismatches and bugs need a human; the rest can be fixed and retried.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::SchemaMismatch { .. } | Error::Internal(_))
    }
}

/// JSON shape of an error on stderr.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    pub suggested_action: SuggestedAction,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = BTreeMap::new();
        if let Error::SchemaMismatch { expected, found } = err {
            context.insert("expected_version".to_string(), expected.clone());
            context.insert("found_version".to_string(), found.clone());
        }
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Compact JSON. Never fails.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!(r#"{{"code":{},"message":"unserializable error"}}"#, self.code))
    }
}

/// Render an error for a terminal: headline, reason, fix.
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let profile = err.profile();
    let (mark, fix) = if use_color {
        ("\x1b[31m✗\x1b[0m", "\x1b[36mFix:\x1b[0m")
    } else {
        ("✗", "Fix:")
    };
    format!(
        "{mark} {}\n  Reason: {err}\n  {fix} {}",
        profile.headline, profile.fix
    )
}
