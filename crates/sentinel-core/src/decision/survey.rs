//! Per-survey threshold overrides.
//!
//! A survey may scale detector scores before the per-detector lookup
//! (sensitivity preset × per-detector multiplier) and may replace the band's
//! action with auto-accept / auto-reject thresholds on the final score.

use sentinel_common::{Action, Detector};
use sentinel_config::SurveyThresholdConfig;

use super::classifier::Decision;
use crate::logging::{event_names, Stage};
use crate::normalize::Normalized;

/// Survey-adjusted score per present detector, in canonical order.
///
/// Unusable multipliers and unknown multiplier keys are logged and ignored.
pub fn adjusted_scores(
    normalized: &Normalized,
    survey: Option<&SurveyThresholdConfig>,
) -> Vec<(Detector, f64)> {
    if let Some(survey) = survey {
        for key in survey.unknown_multiplier_keys() {
            tracing::warn!(
                target: event_names::SURVEY_OVERRIDE_CLAMPED,
                stage = %Stage::Decide,
                key,
                "multiplier for unknown detector ignored"
            );
        }
    }

    Detector::ALL
        .into_iter()
        .filter_map(|detector| {
            let score = normalized.score(detector)?;
            let Some(survey) = survey else {
                return Some((detector, score));
            };
            if let Some(bad) = survey.multiplier_for(detector).ignored {
                tracing::warn!(
                    target: event_names::SURVEY_OVERRIDE_CLAMPED,
                    stage = %Stage::Decide,
                    detector = detector.as_str(),
                    multiplier = bad,
                    "non-positive or non-finite multiplier ignored"
                );
            }
            Some((detector, survey.adjust_score(detector, score)))
        })
        .collect()
}

/// Apply the survey's auto thresholds to a decision.
///
/// - `score >= autoReject` rejects
/// - `score < autoAccept` accepts, unless the decision was escalated
/// - `manualReviewRequired` turns an accept inside `[autoAccept, autoReject)`
///   into a review
pub fn apply_survey_overrides(
    mut decision: Decision,
    score: f64,
    survey: &SurveyThresholdConfig,
) -> Decision {
    let thresholds = survey.auto_thresholds();
    if thresholds.adjusted {
        tracing::warn!(
            target: event_names::SURVEY_OVERRIDE_CLAMPED,
            stage = %Stage::Decide,
            accept = thresholds.accept,
            reject = thresholds.reject,
            "survey auto thresholds clamped"
        );
    }

    let (action, reason) = if score >= thresholds.reject {
        (
            Action::Reject,
            format!("score at or above survey auto-reject threshold {:.2}", thresholds.reject),
        )
    } else if score < thresholds.accept && !decision.escalated {
        (
            Action::Accept,
            format!("score below survey auto-accept threshold {:.2}", thresholds.accept),
        )
    } else if survey.manual_review_required && decision.action == Action::Accept {
        (
            Action::Review,
            "survey requires manual review".to_string(),
        )
    } else {
        return decision;
    };

    if action != decision.action {
        tracing::debug!(
            target: event_names::DECIDE_OVERRIDDEN,
            stage = %Stage::Decide,
            from = %decision.action,
            to = %action,
            "survey threshold replaced band action"
        );
        decision.action = action;
        decision.override_reason = Some(reason);
    }
    decision
}
