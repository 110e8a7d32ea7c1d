//! Schema and model version constants.

/// Version of the serialized result/request schema.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Version tag stamped on every assessment produced by the engine.
pub const MODEL_VERSION: &str = "2.0.0-bayesian";
