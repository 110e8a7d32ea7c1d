//! Structured logging on stderr.
//!
//! stdout carries command payloads only. Engine events use their event name
//! as the tracing target and carry `run_id`, `assessment_id`, `host_id` and
//! `stage`, so a directive like `SENTINEL_LOG=infer.evidence_applied=debug`
//! narrows output to one step of the pipeline.
//!
//! ```ignore
//! init_logging(&LogConfig::from_env(None, None));
//! let ctx = LogContext::new(generate_run_id(), get_host_id());
//! log_event!(ctx, INFO, event_names::SCORE_STARTED, Stage::Init, "scoring response");
//! ```

pub mod config;
pub mod events;

pub use config::{verbosity, LogConfig, LogFormat};
pub use events::{event_names, LogContext, Stage};

use sha2::{Digest, Sha256};
use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn output_layer(config: &LogConfig) -> BoxedLayer {
    match config.format {
        LogFormat::Jsonl => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal());
            if config.timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    }
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init_logging(config: &LogConfig) {
    let installed = tracing_subscriber::registry()
        .with(output_layer(config).with_filter(config.filter()))
        .try_init();
    if installed.is_err() {
        tracing::debug!(directive = %config.directive, "subscriber already installed");
    }
}

fn short_id(prefix: &str, hex: &str, len: usize) -> String {
    format!("{}-{}", prefix, &hex[..len.min(hex.len())])
}

/// Fresh correlation id for one CLI invocation: `run-` plus 12 hex digits.
pub fn generate_run_id() -> String {
    short_id("run", &uuid::Uuid::new_v4().simple().to_string(), 12)
}

/// Stable-ish host id: machine-id, else hashed `HOSTNAME`, else random.
pub fn get_host_id() -> String {
    let machine_id = std::fs::read_to_string("/etc/machine-id")
        .ok()
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| s.len() >= 8 && s.chars().all(|c| c.is_ascii_hexdigit()));
    let hex = machine_id
        .or_else(|| {
            std::env::var("HOSTNAME")
                .ok()
                .map(|h| hex::encode(Sha256::digest(h.as_bytes())))
        })
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
    short_id("host", &hex, 8)
}

/// Emit a pipeline event with the context's correlation fields attached.
///
/// The level is one of `TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`. The event
/// must be a constant from [`event_names`].
///
/// ```ignore
/// log_event!(ctx, WARN, event_names::CONFIG_ERROR, Stage::Init, "bad config",
///     path = path_str.as_str());
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)* $(,)?) => {
        tracing::event!(
            target: $event,
            tracing::Level::$level,
            run_id = %$ctx.run_id,
            assessment_id = ?$ctx.assessment_id,
            host_id = %$ctx.host_id,
            stage = %$stage,
            $($key = $val,)*
            "{}",
            $msg
        )
    };
}
