//! Bayesian inference over detector evidence.
//!
//! - [`posterior`]: the sequential combiner, its trace and narration
//! - [`signals`]: the catalog of named fine-grained signals

pub mod posterior;
pub mod signals;

pub use posterior::{
    bayes_update, combine, BayesianAnalysis, EvidenceItem, EvidenceOrigin, UpdateStep,
};
pub use signals::{lookup, resolve_signals, ResolvedSignals, SignalSpec, SIGNAL_CATALOG};
