//! Evidence report and reasoning.
//!
//! [`aggregate`] sorts present detectors into severity buckets;
//! [`explain`] turns those buckets and the posterior into readable text.

pub mod aggregate;
pub mod reasoning;

pub use aggregate::{aggregate, EvidenceBuckets, Finding};
pub use reasoning::{explain, recommendation, score_interpretation, Reasoning};
