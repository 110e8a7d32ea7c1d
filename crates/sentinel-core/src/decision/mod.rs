//! Decision layer: band classification and survey overrides.

pub mod classifier;
pub mod survey;

pub use classifier::{classify, classify_detector, Decision, LOW_CONFIDENCE_SUFFIX};
pub use survey::{adjusted_scores, apply_survey_overrides};
