//! Stateless confidence and calibration utilities.
//!
//! - [`interval`]: Wilson-score interval around a probability
//! - [`voting`]: combining independent `{probability, confidence}` estimates
//! - [`curve`]: piecewise-linear calibration of raw posteriors

pub mod curve;
pub mod interval;
pub mod voting;

pub use curve::{calibrate, CalibrationCurve, CalibrationPoint};
pub use interval::{interval_for, score_interval, ConfidenceInterval};
pub use voting::{vote, Estimate, Vote, VotingMethod};
