//! Ensemble voting over independent probability estimates.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use sentinel_math::{clamp_probability, safe_div};

/// How estimates are combined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum VotingMethod {
    /// Mean probability and mean confidence.
    Average,
    /// Confidence-weighted mean probability; confidence is the mean confidence.
    #[default]
    Weighted,
    /// The estimate with the highest probability (first one on ties).
    Max,
}

impl std::fmt::Display for VotingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingMethod::Average => write!(f, "average"),
            VotingMethod::Weighted => write!(f, "weighted"),
            VotingMethod::Max => write!(f, "max"),
        }
    }
}

/// One model's estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub probability: f64,
    pub confidence: f64,
}

impl Estimate {
    pub fn new(probability: f64, confidence: f64) -> Self {
        Estimate {
            model: None,
            probability,
            confidence,
        }
    }

    pub fn named(model: impl Into<String>, probability: f64, confidence: f64) -> Self {
        Estimate {
            model: Some(model.into()),
            probability,
            confidence,
        }
    }
}

/// Combined estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Vote {
    pub probability: f64,
    pub confidence: f64,
}

/// Combine estimates. Inputs are clamped into `[0,1]`.
///
/// No estimates gives `{0.5, 0}`. Weighted voting over estimates whose
/// confidences sum to zero falls back to the plain mean probability with
/// confidence 0.
pub fn vote(estimates: &[Estimate], method: VotingMethod) -> Vote {
    if estimates.is_empty() {
        return Vote {
            probability: 0.5,
            confidence: 0.0,
        };
    }

    let clean: Vec<(f64, f64)> = estimates
        .iter()
        .map(|e| (clamp_probability(e.probability), clamp_probability(e.confidence)))
        .collect();
    let count = clean.len() as f64;
    let mean_probability = clean.iter().map(|(p, _)| p).sum::<f64>() / count;

    match method {
        VotingMethod::Average => Vote {
            probability: mean_probability,
            confidence: clean.iter().map(|(_, c)| c).sum::<f64>() / count,
        },
        VotingMethod::Weighted => {
            let total_confidence: f64 = clean.iter().map(|(_, c)| c).sum();
            if total_confidence <= 0.0 {
                return Vote {
                    probability: mean_probability,
                    confidence: 0.0,
                };
            }
            let weighted: f64 = clean.iter().map(|(p, c)| p * c).sum();
            Vote {
                probability: clamp_probability(safe_div(weighted, total_confidence, mean_probability)),
                confidence: total_confidence / count,
            }
        }
        VotingMethod::Max => {
            let mut best = clean[0];
            for &candidate in &clean[1..] {
                if candidate.0 > best.0 {
                    best = candidate;
                }
            }
            Vote {
                probability: best.0,
                confidence: best.1,
            }
        }
    }
}
