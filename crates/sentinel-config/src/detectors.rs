//! Detector profiles.
//!
//! A profile carries everything the engine knows about one detector: its base
//! ensemble weight, `P(evidence | fraud)`, the score above which it counts as
//! observed evidence, its display strings, and its 4-band severity table.

use serde::{Deserialize, Serialize};

use crate::thresholds::ThresholdRange;
use sentinel_common::{Detector, RiskLevel};

/// Scoring parameters for one detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorProfile {
    /// Ensemble weight before renormalization over present detectors.
    pub base_weight: f64,
    /// `P(evidence | fraud)`; the complement is used for `P(evidence | not fraud)`.
    pub likelihood: f64,
    /// Scores strictly above this count as observed evidence.
    pub observed_above: f64,
    /// Human label, e.g. "AI Content Detection".
    pub label: String,
    /// Evidence signal name, e.g. "AI-generated text detected".
    pub signal: String,
    /// Severity table (low, medium, high, critical).
    pub bands: Vec<ThresholdRange>,
}

/// Profiles for all eight detectors.
///
/// Config files may name any subset of detectors and any subset of a
/// profile's fields; the rest keep their built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfilesOverride")]
pub struct DetectorProfiles {
    pub behavioral: DetectorProfile,
    pub ai_content: DetectorProfile,
    pub plagiarism: DetectorProfile,
    pub contradictions: DetectorProfile,
    pub ip_reputation: DetectorProfile,
    pub device_fingerprint: DetectorProfile,
    pub fraud_ring: DetectorProfile,
    pub baseline_deviation: DetectorProfile,
}

impl DetectorProfiles {
    pub fn get(&self, detector: Detector) -> &DetectorProfile {
        match detector {
            Detector::Behavioral => &self.behavioral,
            Detector::AiContent => &self.ai_content,
            Detector::Plagiarism => &self.plagiarism,
            Detector::Contradictions => &self.contradictions,
            Detector::IpReputation => &self.ip_reputation,
            Detector::DeviceFingerprint => &self.device_fingerprint,
            Detector::FraudRing => &self.fraud_ring,
            Detector::BaselineDeviation => &self.baseline_deviation,
        }
    }

    pub fn get_mut(&mut self, detector: Detector) -> &mut DetectorProfile {
        match detector {
            Detector::Behavioral => &mut self.behavioral,
            Detector::AiContent => &mut self.ai_content,
            Detector::Plagiarism => &mut self.plagiarism,
            Detector::Contradictions => &mut self.contradictions,
            Detector::IpReputation => &mut self.ip_reputation,
            Detector::DeviceFingerprint => &mut self.device_fingerprint,
            Detector::FraudRing => &mut self.fraud_ring,
            Detector::BaselineDeviation => &mut self.baseline_deviation,
        }
    }

    /// Field name of `detector` in config files.
    pub fn config_key(detector: Detector) -> &'static str {
        match detector {
            Detector::Behavioral => "behavioral",
            Detector::AiContent => "ai_content",
            Detector::Plagiarism => "plagiarism",
            Detector::Contradictions => "contradictions",
            Detector::IpReputation => "ip_reputation",
            Detector::DeviceFingerprint => "device_fingerprint",
            Detector::FraudRing => "fraud_ring",
            Detector::BaselineDeviation => "baseline_deviation",
        }
    }

    /// Profiles in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Detector, &DetectorProfile)> {
        Detector::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Sum of base weights over all detectors.
    pub fn weight_sum(&self) -> f64 {
        self.iter().map(|(_, p)| p.base_weight).sum()
    }
}

/// Per-field override of one profile as read from a config file.
#[derive(Debug, Default, Deserialize)]
struct ProfileOverride {
    base_weight: Option<f64>,
    likelihood: Option<f64>,
    observed_above: Option<f64>,
    label: Option<String>,
    signal: Option<String>,
    bands: Option<Vec<ThresholdRange>>,
}

impl ProfileOverride {
    fn apply_to(self, profile: &mut DetectorProfile) {
        if let Some(v) = self.base_weight {
            profile.base_weight = v;
        }
        if let Some(v) = self.likelihood {
            profile.likelihood = v;
        }
        if let Some(v) = self.observed_above {
            profile.observed_above = v;
        }
        if let Some(v) = self.label {
            profile.label = v;
        }
        if let Some(v) = self.signal {
            profile.signal = v;
        }
        if let Some(v) = self.bands {
            profile.bands = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfilesOverride {
    behavioral: ProfileOverride,
    ai_content: ProfileOverride,
    plagiarism: ProfileOverride,
    contradictions: ProfileOverride,
    ip_reputation: ProfileOverride,
    device_fingerprint: ProfileOverride,
    fraud_ring: ProfileOverride,
    baseline_deviation: ProfileOverride,
}

impl From<ProfilesOverride> for DetectorProfiles {
    fn from(o: ProfilesOverride) -> Self {
        let mut profiles = DetectorProfiles::default();
        let overrides = [
            (Detector::Behavioral, o.behavioral),
            (Detector::AiContent, o.ai_content),
            (Detector::Plagiarism, o.plagiarism),
            (Detector::Contradictions, o.contradictions),
            (Detector::IpReputation, o.ip_reputation),
            (Detector::DeviceFingerprint, o.device_fingerprint),
            (Detector::FraudRing, o.fraud_ring),
            (Detector::BaselineDeviation, o.baseline_deviation),
        ];
        for (detector, patch) in overrides {
            patch.apply_to(profiles.get_mut(detector));
        }
        profiles
    }
}

type BandSpec = (f64, f64, f64, &'static str);

fn table(specs: [BandSpec; 4]) -> Vec<ThresholdRange> {
    let risks = RiskLevel::ALL;
    specs
        .iter()
        .zip(risks)
        .map(|(&(min, max, floor, description), risk)| {
            ThresholdRange::new(min, max, risk, floor, description)
        })
        .collect()
}

fn profile(
    base_weight: f64,
    likelihood: f64,
    observed_above: f64,
    label: &str,
    signal: &str,
    bands: [BandSpec; 4],
) -> DetectorProfile {
    DetectorProfile {
        base_weight,
        likelihood,
        observed_above,
        label: label.to_string(),
        signal: signal.to_string(),
        bands: table(bands),
    }
}

impl Default for DetectorProfiles {
    fn default() -> Self {
        DetectorProfiles {
            behavioral: profile(
                0.20,
                0.85,
                0.30,
                "Behavioral Analysis",
                "Suspicious behavioral patterns",
                [
                    (0.00, 0.25, 0.60, "Normal human-like behavior patterns"),
                    (0.25, 0.45, 0.65, "Some suspicious patterns detected"),
                    (0.45, 0.70, 0.75, "Multiple behavioral anomalies detected"),
                    (0.70, 1.00, 0.85, "Clear bot/automation signatures"),
                ],
            ),
            ai_content: profile(
                0.20,
                0.90,
                0.50,
                "AI Content Detection",
                "AI-generated text detected",
                [
                    (0.00, 0.30, 0.70, "Natural human writing style"),
                    (0.30, 0.55, 0.75, "Some AI-like patterns detected"),
                    (0.55, 0.75, 0.80, "High probability of AI-generated content"),
                    (0.75, 1.00, 0.90, "Clear AI-generated content (ChatGPT/Claude)"),
                ],
            ),
            plagiarism: profile(
                0.15,
                0.80,
                0.40,
                "Plagiarism Detection",
                "Plagiarized content found",
                [
                    (0.00, 0.35, 0.65, "Original content"),
                    (0.35, 0.60, 0.70, "Some similarities to known sources"),
                    (0.60, 0.80, 0.80, "Substantial copying detected"),
                    (0.80, 1.00, 0.85, "Direct plagiarism from web/duplicate answers"),
                ],
            ),
            contradictions: profile(
                0.10,
                0.70,
                0.30,
                "Contradiction Analysis",
                "Contradictory answers detected",
                [
                    (0.00, 0.20, 0.60, "Consistent answers across questions"),
                    (0.20, 0.40, 0.65, "Minor inconsistencies detected"),
                    (0.40, 0.65, 0.75, "Significant contradictions found"),
                    (0.65, 1.00, 0.80, "Multiple logical contradictions"),
                ],
            ),
            ip_reputation: profile(
                0.10,
                0.65,
                0.40,
                "IP Reputation",
                "Suspicious IP address (VPN/proxy/datacenter)",
                [
                    (0.00, 0.40, 0.60, "Residential or reputable IP address"),
                    (0.40, 0.60, 0.65, "VPN or proxy usage detected"),
                    (0.60, 0.80, 0.75, "Datacenter or known-abuse IP range"),
                    (0.80, 1.00, 0.85, "Tor exit node or blacklisted IP"),
                ],
            ),
            device_fingerprint: profile(
                0.15,
                0.95,
                0.50,
                "Device Fingerprint",
                "Automation tools or spoofed device",
                [
                    (0.00, 0.30, 0.75, "Legitimate device signature"),
                    (0.30, 0.55, 0.80, "Suspicious device characteristics"),
                    (0.55, 0.75, 0.85, "Likely spoofed or automated device"),
                    (0.75, 1.00, 0.95, "WebDriver/automation detected"),
                ],
            ),
            fraud_ring: profile(
                0.05,
                0.90,
                0.60,
                "Fraud Ring Detection",
                "Part of coordinated fraud ring",
                [
                    (0.00, 0.40, 0.60, "Independent submission"),
                    (0.40, 0.65, 0.70, "Some similarity to other submissions"),
                    (0.65, 0.85, 0.80, "Part of possible coordinated group"),
                    (0.85, 1.00, 0.90, "Clear fraud ring participation"),
                ],
            ),
            baseline_deviation: profile(
                0.05,
                0.60,
                0.50,
                "Baseline Analysis",
                "Anomalous behavior compared to population",
                [
                    (0.00, 0.40, 0.60, "Behavior within population norms"),
                    (0.40, 0.60, 0.65, "Mild deviation from population norms"),
                    (0.60, 0.80, 0.75, "Marked deviation from population norms"),
                    (
                        0.80,
                        1.00,
                        0.85,
                        "Behavior significantly different from population norms",
                    ),
                ],
            ),
        }
    }
}
