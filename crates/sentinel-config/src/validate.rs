//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::detectors::DetectorProfiles;
use crate::scoring::ScoringConfig;
use crate::survey::SurveyThresholdConfig;
use crate::thresholds::Band;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Tolerance on the detector weight sum and on band boundaries.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for sentinel_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::IoError(msg) => sentinel_common::Error::Config(msg),
            ValidationError::VersionMismatch { expected, actual } => {
                sentinel_common::Error::SchemaMismatch {
                    expected,
                    found: actual,
                }
            }
            other => sentinel_common::Error::InvalidScoringConfig(other.to_string()),
        }
    }
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

fn check_unit(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(invalid(field, format!("Must be in [0, 1], got {}", value)));
    }
    Ok(())
}

fn check_open_unit(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(invalid(field, format!("Must be in (0, 1), got {}", value)));
    }
    Ok(())
}

/// Validate a scoring configuration semantically.
pub fn validate_scoring_config(config: &ScoringConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    check_open_unit("default_prior", config.default_prior)?;
    check_unit("likely_fraud_cutoff", config.likely_fraud_cutoff)?;

    if !config.confidence_cap.is_finite()
        || config.confidence_cap <= 0.0
        || config.confidence_cap > 1.0
    {
        return Err(invalid(
            "confidence_cap",
            format!("Must be in (0, 1], got {}", config.confidence_cap),
        ));
    }
    if config.evidence_saturation < 1 {
        return Err(invalid("evidence_saturation", "Must be at least 1"));
    }
    if !config.samples_per_evidence.is_finite() || config.samples_per_evidence <= 0.0 {
        return Err(invalid(
            "samples_per_evidence",
            format!("Must be positive, got {}", config.samples_per_evidence),
        ));
    }

    for (detector, profile) in config.detectors.iter() {
        let prefix = format!("detectors.{}", DetectorProfiles::config_key(detector));
        if !profile.base_weight.is_finite() || profile.base_weight < 0.0 {
            return Err(invalid(
                format!("{}.base_weight", prefix),
                format!("Must be non-negative, got {}", profile.base_weight),
            ));
        }
        check_open_unit(&format!("{}.likelihood", prefix), profile.likelihood)?;
        check_unit(&format!("{}.observed_above", prefix), profile.observed_above)?;
        validate_table(&format!("{}.bands", prefix), &profile.bands)?;
    }

    let weight_sum = config.detectors.weight_sum();
    if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ValidationError::SemanticError(format!(
            "Detector base weights must sum to 1.0, got {:.4}",
            weight_sum
        )));
    }

    validate_table("ensemble_bands", &config.ensemble_bands)?;
    let mut names: Vec<&str> = config.ensemble_bands.iter().map(|b| b.name.as_str()).collect();
    if names.iter().any(|n| n.is_empty()) {
        return Err(invalid("ensemble_bands", "Band names must not be empty"));
    }
    names.sort_unstable();
    if names.windows(2).any(|w| w[0] == w[1]) {
        return Err(invalid("ensemble_bands", "Band names must be unique"));
    }

    Ok(())
}

/// Validate one threshold table: non-empty, contiguous from 0 to 1, risk
/// non-decreasing, floors in `[0, 1]`.
pub fn validate_table<B: Band>(field: &str, bands: &[B]) -> ValidationResult<()> {
    let (first, last) = match (bands.first(), bands.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(invalid(field, "Table must contain at least one band")),
    };
    if first.min().abs() > BOUNDARY_TOLERANCE {
        return Err(invalid(field, format!("First band must start at 0, got {}", first.min())));
    }
    if (last.max() - 1.0).abs() > BOUNDARY_TOLERANCE {
        return Err(invalid(field, format!("Last band must end at 1, got {}", last.max())));
    }
    for (i, band) in bands.iter().enumerate() {
        if !band.min().is_finite() || !band.max().is_finite() || band.min() >= band.max() {
            return Err(invalid(
                format!("{}[{}]", field, i),
                format!("Band must have min < max, got [{}, {})", band.min(), band.max()),
            ));
        }
        check_unit(&format!("{}[{}].confidence_floor", field, i), band.confidence_floor())?;
    }
    for (i, pair) in bands.windows(2).enumerate() {
        if (pair[0].max() - pair[1].min()).abs() > BOUNDARY_TOLERANCE {
            return Err(ValidationError::SemanticError(format!(
                "{}: bands {} and {} are not contiguous ({} vs {})",
                field,
                i,
                i + 1,
                pair[0].max(),
                pair[1].min()
            )));
        }
        if pair[1].risk_level() < pair[0].risk_level() {
            return Err(ValidationError::SemanticError(format!(
                "{}: risk level decreases from {} to {} at band {}",
                field,
                pair[0].risk_level(),
                pair[1].risk_level(),
                i + 1
            )));
        }
    }
    Ok(())
}

/// Validate survey overrides at a request boundary.
///
/// The engine sanitizes malformed overrides on its own; this lets callers
/// reject them up front instead.
pub fn validate_survey_config(config: &SurveyThresholdConfig) -> ValidationResult<()> {
    for (name, value) in &config.multipliers {
        if sentinel_common::Detector::parse(name).is_none() {
            return Err(invalid(
                format!("multipliers.{}", name),
                "Unknown detector name",
            ));
        }
        if !value.is_finite() || *value <= 0.0 {
            return Err(invalid(
                format!("multipliers.{}", name),
                format!("Must be a positive number, got {}", value),
            ));
        }
    }
    if let Some(accept) = config.auto_accept_threshold {
        check_unit("autoAcceptThreshold", accept)?;
    }
    if let Some(reject) = config.auto_reject_threshold {
        check_unit("autoRejectThreshold", reject)?;
    }
    let thresholds = config.auto_thresholds();
    if config.auto_accept_threshold.is_some() && thresholds.adjusted {
        return Err(ValidationError::SemanticError(format!(
            "autoAcceptThreshold ({}) must not exceed autoRejectThreshold ({})",
            config.auto_accept_threshold.unwrap_or_default(),
            thresholds.reject
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::Sensitivity;
    use sentinel_common::{Detector, RiskLevel};

    #[test]
    fn default_config_is_valid() {
        validate_scoring_config(&ScoringConfig::default()).unwrap();
    }

    #[test]
    fn rejects_weight_sum() {
        let mut cfg = ScoringConfig::default();
        cfg.detectors.get_mut(Detector::AiContent).base_weight = 0.5;
        let err = validate_scoring_config(&cfg).unwrap_err();
        assert!(matches!(err, ValidationError::SemanticError(_)));
        assert_eq!(err.code(), 63);
    }

    #[test]
    fn rejects_negative_weight() {
        let mut cfg = ScoringConfig::default();
        cfg.detectors.get_mut(Detector::FraudRing).base_weight = -0.05;
        let err = validate_scoring_config(&cfg).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "detectors.fraud_ring.base_weight"));
    }

    #[test]
    fn rejects_degenerate_likelihood() {
        let mut cfg = ScoringConfig::default();
        cfg.detectors.get_mut(Detector::Plagiarism).likelihood = 1.0;
        assert!(matches!(
            validate_scoring_config(&cfg),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_gap_in_table() {
        let mut cfg = ScoringConfig::default();
        cfg.detectors.get_mut(Detector::Behavioral).bands[1].min = 0.26;
        assert!(matches!(
            validate_scoring_config(&cfg),
            Err(ValidationError::SemanticError(_))
        ));
    }

    #[test]
    fn rejects_descending_risk() {
        let mut cfg = ScoringConfig::default();
        cfg.ensemble_bands[7].risk_level = RiskLevel::Low;
        assert!(matches!(
            validate_scoring_config(&cfg),
            Err(ValidationError::SemanticError(_))
        ));
    }

    #[test]
    fn rejects_bad_engine_constants() {
        let mut cfg = ScoringConfig::default();
        cfg.confidence_cap = 0.0;
        assert!(validate_scoring_config(&cfg).is_err());

        let mut cfg = ScoringConfig::default();
        cfg.evidence_saturation = 0;
        assert!(validate_scoring_config(&cfg).is_err());

        let mut cfg = ScoringConfig::default();
        cfg.default_prior = 1.0;
        assert!(validate_scoring_config(&cfg).is_err());
    }

    #[test]
    fn rejects_schema_mismatch() {
        let cfg = ScoringConfig {
            schema_version: "0.1.0".to_string(),
            ..ScoringConfig::default()
        };
        let err = validate_scoring_config(&cfg).unwrap_err();
        assert_eq!(err.code(), 66);
        let common: sentinel_common::Error = err.into();
        assert_eq!(common.code(), 12);
    }

    #[test]
    fn survey_config_validation() {
        let ok = SurveyThresholdConfig::new(Sensitivity::Strict)
            .with_multiplier(Detector::AiContent, 1.5)
            .with_auto_thresholds(0.1, 0.9);
        validate_survey_config(&ok).unwrap();

        let bad_mult = SurveyThresholdConfig::default().with_multiplier(Detector::AiContent, 0.0);
        assert!(validate_survey_config(&bad_mult).is_err());

        let mut unknown = SurveyThresholdConfig::default();
        unknown.multipliers.insert("lowEffort".into(), 1.0);
        assert!(validate_survey_config(&unknown).is_err());

        let inverted = SurveyThresholdConfig::default().with_auto_thresholds(0.9, 0.5);
        assert!(matches!(
            validate_survey_config(&inverted),
            Err(ValidationError::SemanticError(_))
        ));

        let out_of_range = SurveyThresholdConfig::default().with_auto_thresholds(0.1, 1.5);
        assert!(matches!(
            validate_survey_config(&out_of_range),
            Err(ValidationError::InvalidValue { .. })
        ));
    }
}
