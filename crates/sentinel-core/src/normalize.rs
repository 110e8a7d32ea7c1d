//! Evidence normalization.
//!
//! Turns a partial map of detector scores into a weighted entry for every
//! detector plus the canonical evidence list the combiner folds over.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use sentinel_common::Detector;
use sentinel_config::DetectorProfiles;
use sentinel_math::{finite_probability, safe_div};

use crate::inference::EvidenceItem;
use crate::logging::{event_names, Stage};

/// Detector scores supplied for one response.
///
/// Absent detectors carry `None`. Absence is "unknown", never "no fraud".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectorScores {
    scores: [Option<f64>; 8],
    unknown: Vec<String>,
}

impl DetectorScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, detector: Detector, score: f64) -> Self {
        self.set(detector, Some(score));
        self
    }

    pub fn set(&mut self, detector: Detector, score: Option<f64>) {
        self.scores[detector.index()] = score;
    }

    pub fn get(&self, detector: Detector) -> Option<f64> {
        self.scores[detector.index()]
    }

    /// Build from wire names. Names that match no detector are kept aside.
    pub fn from_named<'a, I>(named: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Option<f64>)>,
    {
        let mut scores = DetectorScores::new();
        for (name, score) in named {
            match Detector::parse(name) {
                Some(detector) => scores.set(detector, score),
                None => scores.unknown.push(name.to_string()),
            }
        }
        scores
    }

    /// Names supplied that match no detector.
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    pub fn is_empty(&self) -> bool {
        self.scores.iter().all(Option::is_none)
    }
}

/// One detector's score after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelScoreEntry {
    /// Clamped score, 0 when absent.
    pub score: f64,
    /// Base weight rescaled over present detectors, 0 when absent.
    pub weight: f64,
    pub contribution: f64,
    pub present: bool,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub entries: BTreeMap<Detector, ModelScoreEntry>,
    /// One item per detector, in canonical order.
    pub evidence: Vec<EvidenceItem>,
}

impl Normalized {
    pub fn entry(&self, detector: Detector) -> Option<&ModelScoreEntry> {
        self.entries.get(&detector)
    }

    pub fn present_count(&self) -> usize {
        self.entries.values().filter(|e| e.present).count()
    }

    /// Score of a present detector, `None` when absent.
    pub fn score(&self, detector: Detector) -> Option<f64> {
        self.entry(detector).filter(|e| e.present).map(|e| e.score)
    }
}

/// Normalize detector scores against the configured profiles.
///
/// Non-finite scores are dropped as absent; finite ones are clamped to
/// `[0,1]`. Present base weights are rescaled to sum to 1.
pub fn normalize(scores: &DetectorScores, profiles: &DetectorProfiles) -> Normalized {
    let mut clean: [Option<f64>; 8] = [None; 8];
    for detector in Detector::ALL {
        if let Some(raw) = scores.get(detector) {
            clean[detector.index()] = finite_probability(raw);
            if clean[detector.index()].is_none() {
                tracing::debug!(
                    target: event_names::NORMALIZE_SCORE_DROPPED,
                    stage = %Stage::Normalize,
                    detector = detector.as_str(),
                    "non-finite score treated as absent"
                );
            }
        }
    }

    let present_weight: f64 = profiles
        .iter()
        .filter(|(d, _)| clean[d.index()].is_some())
        .map(|(_, p)| p.base_weight.max(0.0))
        .sum();

    let mut entries = BTreeMap::new();
    let mut evidence = Vec::with_capacity(Detector::ALL.len());
    for (detector, profile) in profiles.iter() {
        let entry = match clean[detector.index()] {
            Some(score) => {
                let weight = safe_div(profile.base_weight.max(0.0), present_weight, 0.0);
                ModelScoreEntry {
                    score,
                    weight,
                    contribution: score * weight,
                    present: true,
                }
            }
            None => ModelScoreEntry {
                score: 0.0,
                weight: 0.0,
                contribution: 0.0,
                present: false,
            },
        };
        evidence.push(EvidenceItem::from_detector(
            detector,
            &profile.signal,
            profile.likelihood,
            entry.score,
            entry.present && entry.score > profile.observed_above,
        ));
        entries.insert(detector, entry);
    }

    let normalized = Normalized { entries, evidence };
    tracing::debug!(
        target: event_names::NORMALIZE_FINISHED,
        stage = %Stage::Normalize,
        present = normalized.present_count(),
        observed = normalized.evidence.iter().filter(|e| e.observed).count(),
        "detector scores normalized"
    );
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles() -> DetectorProfiles {
        DetectorProfiles::default()
    }

    #[test]
    fn empty_input_has_zero_weights() {
        let out = normalize(&DetectorScores::new(), &profiles());
        assert_eq!(out.entries.len(), 8);
        assert_eq!(out.present_count(), 0);
        assert!(out.entries.values().all(|e| e.weight == 0.0));
        assert!(out.evidence.iter().all(|e| !e.observed));
    }

    #[test]
    fn present_weights_sum_to_one() {
        let scores = DetectorScores::new()
            .with(Detector::AiContent, 0.92)
            .with(Detector::Behavioral, 0.15);
        let out = normalize(&scores, &profiles());
        let sum: f64 = out.entries.values().map(|e| e.weight).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // Equal base weights (.20/.20) split evenly.
        assert!((out.entries[&Detector::AiContent].weight - 0.5).abs() < 1e-12);
        assert!((out.entries[&Detector::AiContent].contribution - 0.46).abs() < 1e-12);
    }

    #[test]
    fn observed_uses_strict_cutoff() {
        // aiContent cutoff is .50: exactly .50 is not observed.
        let at = normalize(&DetectorScores::new().with(Detector::AiContent, 0.5), &profiles());
        assert!(!at.evidence[Detector::AiContent.index()].observed);
        let above = normalize(&DetectorScores::new().with(Detector::AiContent, 0.51), &profiles());
        assert!(above.evidence[Detector::AiContent.index()].observed);
    }

    #[test]
    fn scores_are_clamped_and_nan_dropped() {
        let scores = DetectorScores::new()
            .with(Detector::Plagiarism, 1.7)
            .with(Detector::FraudRing, -0.2)
            .with(Detector::IpReputation, f64::NAN);
        let out = normalize(&scores, &profiles());
        assert_eq!(out.score(Detector::Plagiarism), Some(1.0));
        assert_eq!(out.score(Detector::FraudRing), Some(0.0));
        assert_eq!(out.score(Detector::IpReputation), None);
        assert_eq!(out.present_count(), 2);
    }

    #[test]
    fn evidence_follows_canonical_order() {
        let out = normalize(&DetectorScores::new(), &profiles());
        let order: Vec<Detector> = out.evidence.iter().map(|e| e.detector).collect();
        assert_eq!(order, Detector::ALL.to_vec());
    }

    #[test]
    fn named_input_collects_unknown_names() {
        let scores = DetectorScores::from_named([
            ("aiContent", Some(0.4)),
            ("ip_reputation", Some(0.3)),
            ("telepathy", Some(0.9)),
            ("plagiarism", None),
        ]);
        assert_eq!(scores.get(Detector::AiContent), Some(0.4));
        assert_eq!(scores.get(Detector::IpReputation), Some(0.3));
        assert_eq!(scores.get(Detector::Plagiarism), None);
        assert_eq!(scores.unknown().to_vec(), vec!["telepathy".to_string()]);
    }
}
