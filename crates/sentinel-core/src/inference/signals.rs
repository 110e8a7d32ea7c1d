//! Catalog of fine-grained fraud signals.
//!
//! Upstream detectors may report named findings (e.g. `webdriver_detected`)
//! in addition to their aggregate score. Each known name carries a fixed
//! likelihood and strength and is folded after the eight detector items.

use sentinel_common::Detector;

use super::posterior::{EvidenceItem, EvidenceOrigin};
use crate::logging::{event_names, Stage};

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSpec {
    pub name: &'static str,
    /// Detector family the signal belongs to.
    pub detector: Detector,
    pub likelihood: f64,
    pub strength: f64,
}

const fn spec(name: &'static str, detector: Detector, likelihood: f64, strength: f64) -> SignalSpec {
    SignalSpec {
        name,
        detector,
        likelihood,
        strength,
    }
}

/// All known signals.
pub const SIGNAL_CATALOG: &[SignalSpec] = &[
    // AI content
    spec("ai_signature_detected", Detector::AiContent, 0.95, 0.95),
    spec("perfect_grammar_no_errors", Detector::AiContent, 0.85, 0.70),
    spec("overly_formal_tone", Detector::AiContent, 0.70, 0.60),
    spec("hedging_language", Detector::AiContent, 0.65, 0.50),
    // Automation
    spec("webdriver_detected", Detector::DeviceFingerprint, 0.98, 0.95),
    spec("headless_browser", Detector::DeviceFingerprint, 0.95, 0.90),
    spec("robotic_mouse_movements", Detector::Behavioral, 0.90, 0.85),
    spec("mouse_teleporting", Detector::Behavioral, 0.95, 0.90),
    spec("uniform_keystroke_timing", Detector::Behavioral, 0.88, 0.80),
    spec("no_typing_corrections", Detector::Behavioral, 0.75, 0.70),
    spec("impossible_typing_speed", Detector::Behavioral, 0.92, 0.85),
    spec("instant_form_filling", Detector::Behavioral, 0.90, 0.85),
    spec("no_hover_behavior", Detector::Behavioral, 0.70, 0.65),
    // Plagiarism
    spec("plagiarism_detected", Detector::Plagiarism, 0.90, 0.85),
    spec("template_responses", Detector::Plagiarism, 0.85, 0.80),
    spec("duplicate_answers", Detector::Plagiarism, 0.80, 0.75),
    // Contradictions
    spec("logical_contradictions", Detector::Contradictions, 0.70, 0.65),
    spec("temporal_contradictions", Detector::Contradictions, 0.75, 0.70),
    spec("demographic_contradictions", Detector::Contradictions, 0.80, 0.75),
    // Identity and network
    spec("vpn_usage", Detector::IpReputation, 0.65, 0.60),
    spec("datacenter_ip", Detector::IpReputation, 0.75, 0.70),
    spec("tor_detected", Detector::IpReputation, 0.95, 0.90),
    spec("timezone_mismatch", Detector::IpReputation, 0.70, 0.65),
    // Behavioral
    spec("extremely_fast_completion", Detector::Behavioral, 0.80, 0.75),
    spec("quality_time_mismatch", Detector::Behavioral, 0.85, 0.80),
    spec("excessive_paste_events", Detector::Behavioral, 0.75, 0.70),
    spec("excessive_tab_switches", Detector::Behavioral, 0.70, 0.65),
    // Fraud ring
    spec("answer_sharing", Detector::FraudRing, 0.95, 0.90),
    spec("coordinated_timing", Detector::FraudRing, 0.85, 0.80),
    spec("device_sharing", Detector::FraudRing, 0.90, 0.85),
    spec("ip_sharing", Detector::FraudRing, 0.75, 0.70),
];

/// Look up a signal by name (case-insensitive, `-` accepted for `_`).
pub fn lookup(name: &str) -> Option<&'static SignalSpec> {
    let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
    SIGNAL_CATALOG.iter().find(|s| s.name == normalized)
}

impl From<&SignalSpec> for EvidenceItem {
    fn from(spec: &SignalSpec) -> Self {
        EvidenceItem {
            detector: spec.detector,
            origin: EvidenceOrigin::Catalog,
            signal: spec.name.to_string(),
            likelihood: spec.likelihood,
            strength: spec.strength,
            observed: true,
        }
    }
}

/// Resolved catalog signals: evidence in request order plus the unknown names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSignals {
    pub evidence: Vec<EvidenceItem>,
    pub ignored: Vec<String>,
}

/// Resolve observed signal names against the catalog.
pub fn resolve_signals<S: AsRef<str>>(names: &[S]) -> ResolvedSignals {
    let mut resolved = ResolvedSignals::default();
    for name in names {
        let name = name.as_ref();
        match lookup(name) {
            Some(spec) => resolved.evidence.push(EvidenceItem::from(spec)),
            None => {
                tracing::debug!(
                    target: event_names::INFER_SIGNAL_IGNORED,
                    stage = %Stage::Infer,
                    signal = name,
                    "unknown signal ignored"
                );
                resolved.ignored.push(name.to_string());
            }
        }
    }
    resolved
}
