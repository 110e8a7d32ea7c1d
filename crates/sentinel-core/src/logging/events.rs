//! Structured event definitions for logging.
//!
//! Events carry a stable name (used as the tracing target) and a pipeline
//! stage. Events emitted through [`log_event!`](crate::log_event) also carry
//! the run and host correlation ids of a [`LogContext`].

use serde::{Deserialize, Serialize};

/// Pipeline step an event belongs to, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Init,
    /// Detector scores to weighted entries and evidence.
    Normalize,
    Infer,
    /// Optional calibration and the confidence interval.
    Calibrate,
    /// Band lookup, escalation, survey overrides.
    Decide,
    Explain,
    Report,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Init,
        Stage::Normalize,
        Stage::Infer,
        Stage::Calibrate,
        Stage::Decide,
        Stage::Explain,
        Stage::Report,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Normalize => "normalize",
            Stage::Infer => "infer",
            Stage::Calibrate => "calibrate",
            Stage::Decide => "decide",
            Stage::Explain => "explain",
            Stage::Report => "report",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard event names used in logging.
pub mod event_names {
    // Scoring lifecycle
    pub const SCORE_STARTED: &str = "score.started";
    pub const SCORE_FINISHED: &str = "score.finished";

    // Normalize stage
    pub const NORMALIZE_FINISHED: &str = "normalize.finished";
    pub const NORMALIZE_SCORE_DROPPED: &str = "normalize.score_dropped";

    // Infer stage
    pub const INFER_EVIDENCE_APPLIED: &str = "infer.evidence_applied";
    pub const INFER_SIGNAL_IGNORED: &str = "infer.signal_ignored";
    pub const INFER_FINISHED: &str = "infer.finished";

    // Calibrate stage
    pub const CALIBRATE_APPLIED: &str = "calibrate.applied";

    // Decide stage
    pub const DECIDE_ESCALATED: &str = "decide.escalated";
    pub const DECIDE_OVERRIDDEN: &str = "decide.overridden";
    pub const SURVEY_OVERRIDE_CLAMPED: &str = "survey.override_clamped";

    // Explain stage
    pub const EXPLAIN_FINISHED: &str = "explain.finished";

    // Config/init events
    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    // Error events
    pub const INPUT_REJECTED: &str = "input.rejected";
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Correlation ids shared by every event of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    /// Assessment the events concern, once one has been issued.
    pub assessment_id: Option<String>,
    pub host_id: String,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>, host_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            assessment_id: None,
            host_id: host_id.into(),
        }
    }

    pub fn with_assessment_id(mut self, id: impl Into<String>) -> Self {
        self.assessment_id = Some(id.into());
        self
    }
}
