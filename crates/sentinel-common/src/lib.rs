//! SENTINEL common types, IDs, and errors.
//!
//! This crate provides the vocabulary shared by the scoring crates:
//! - The eight detector kinds and their canonical fold order
//! - Risk levels, recommended actions, and evidence severities
//! - Assessment identifiers
//! - Common error types with stable codes
//! - Output format specifications

pub mod detector;
pub mod error;
pub mod id;
pub mod output;
pub mod risk;
pub mod schema;

pub use detector::Detector;
pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use id::AssessmentId;
pub use output::OutputFormat;
pub use risk::{Action, RiskLevel, Severity};
pub use schema::{MODEL_VERSION, SCHEMA_VERSION};
