//! SENTINEL math utilities.

pub mod math;

pub use math::interp::interpolate;
pub use math::interval::{wilson_interval, ConfidenceLevel, WilsonInterval, MIN_SAMPLE_SIZE};
pub use math::stable::*;
