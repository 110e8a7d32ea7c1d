//! Detector kinds.
//!
//! Each detector is an external subsystem that reports one suspicion score in
//! `[0,1]`. The declaration order below is the canonical fold order used by the
//! Bayesian combiner, so `Ord` on [`Detector`] is meaningful.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight fraud-signal categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Detector {
    /// Mouse/keyboard/timing telemetry.
    Behavioral,
    /// AI-generated text classifier.
    AiContent,
    /// Copy detection against web sources and other responses.
    Plagiarism,
    /// Cross-question consistency analysis.
    Contradictions,
    /// VPN/proxy/datacenter IP reputation.
    IpReputation,
    /// Automation and spoofed-device fingerprinting.
    DeviceFingerprint,
    /// Coordinated-ring signals across submissions.
    FraudRing,
    /// Deviation from the survey population baseline.
    BaselineDeviation,
}

impl Detector {
    /// All detectors in canonical order.
    pub const ALL: [Detector; 8] = [
        Detector::Behavioral,
        Detector::AiContent,
        Detector::Plagiarism,
        Detector::Contradictions,
        Detector::IpReputation,
        Detector::DeviceFingerprint,
        Detector::FraudRing,
        Detector::BaselineDeviation,
    ];

    /// Wire name (camelCase, as used in requests and results).
    pub fn as_str(&self) -> &'static str {
        match self {
            Detector::Behavioral => "behavioral",
            Detector::AiContent => "aiContent",
            Detector::Plagiarism => "plagiarism",
            Detector::Contradictions => "contradictions",
            Detector::IpReputation => "ipReputation",
            Detector::DeviceFingerprint => "deviceFingerprint",
            Detector::FraudRing => "fraudRing",
            Detector::BaselineDeviation => "baselineDeviation",
        }
    }

    /// Position in the canonical fold order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a detector name. Accepts camelCase, snake_case and kebab-case.
    pub fn parse(s: &str) -> Option<Detector> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "behavioral" | "behavior" => Some(Detector::Behavioral),
            "aicontent" | "ai" => Some(Detector::AiContent),
            "plagiarism" => Some(Detector::Plagiarism),
            "contradictions" | "contradiction" => Some(Detector::Contradictions),
            "ipreputation" | "ip" => Some(Detector::IpReputation),
            "devicefingerprint" | "device" => Some(Detector::DeviceFingerprint),
            "fraudring" | "ring" => Some(Detector::FraudRing),
            "baselinedeviation" | "baseline" => Some(Detector::BaselineDeviation),
            _ => None,
        }
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Detector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Detector::parse(s).ok_or_else(|| format!("unknown detector: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_index() {
        for (i, d) in Detector::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
        }
        assert!(Detector::Behavioral < Detector::BaselineDeviation);
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!(Detector::parse("aiContent"), Some(Detector::AiContent));
        assert_eq!(Detector::parse("ai_content"), Some(Detector::AiContent));
        assert_eq!(
            Detector::parse("device-fingerprint"),
            Some(Detector::DeviceFingerprint)
        );
        assert_eq!(Detector::parse("lowEffort"), None);
    }

    #[test]
    fn wire_names_round_trip_through_serde() {
        for d in Detector::ALL {
            let json = serde_json::to_string(&d).unwrap();
            assert_eq!(json, format!("\"{}\"", d.as_str()));
            let back: Detector = serde_json::from_str(&json).unwrap();
            assert_eq!(back, d);
        }
    }
}
