//! Adapt analyzer
//!
//! Turns a `recommendation` into a remediation strategy. Priority is the mean of two
//! lookup tables, one keyed by `risk_level` and one by the caller-reported
//! `guardrail_status`; unrecognised keys score 0.5 in either table.

use super::{into_insight, round_to, text_or, Analyzer};
use crate::types::{Insight, Payload};
use serde_json::{json, Value};

pub const NAME: &str = "adapt";

const BASE_ACUITY: f64 = 0.4;
const MAX_ACUITY: f64 = 0.9;

/// Score for keys missing from either lookup table
const UNLISTED_SCORE: f64 = 0.5;

pub struct AdaptAnalyzer;

impl Analyzer for AdaptAnalyzer {
    fn name(&self) -> &str {
        NAME
    }

    fn analyze(&self, payload: &Payload) -> Insight {
        let recommendation = text_or(payload, "recommendation", "iterate protocols");
        let risk_level = label_or(payload, "risk_level", "moderate");
        let guardrail_status = label_or(payload, "guardrail_status", "unknown");
        let constraints = payload
            .get("constraints")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));

        let strategy = derive_strategy(&recommendation, &risk_level, &guardrail_status);
        let priority = priority_score(&risk_level, &guardrail_status);
        let acuity = BASE_ACUITY + (priority * 0.1).min(0.15);

        into_insight(json!({
            "summary": recommendation,
            "action": strategy,
            "constraints": constraints,
            "priority": priority,
            "acuity": round_to(acuity.min(MAX_ACUITY), 3),
        }))
    }
}

/// Table key at `key`; only a missing or null value takes the fallback
///
/// Any other value is kept (non-strings as JSON text) and scores as unlisted.
fn label_or(payload: &Payload, key: &str, fallback: &str) -> String {
    match payload.get(key) {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn risk_weight(risk_level: &str) -> f64 {
    match risk_level {
        "critical" => 1.0,
        "high" => 0.8,
        "moderate" => 0.6,
        "low" => 0.3,
        _ => UNLISTED_SCORE,
    }
}

fn guardrail_weight(guardrail_status: &str) -> f64 {
    match guardrail_status {
        "pass" => 0.3,
        "review" => 0.6,
        "fail" => 0.9,
        "unknown" => 0.5,
        _ => UNLISTED_SCORE,
    }
}

fn priority_score(risk_level: &str, guardrail_status: &str) -> f64 {
    round_to(
        (risk_weight(risk_level) + guardrail_weight(guardrail_status)) / 2.0,
        2,
    )
}

fn derive_strategy(recommendation: &str, risk_level: &str, guardrail_status: &str) -> String {
    let posture = match risk_level {
        "critical" | "high" => "stabilize",
        _ => "optimize",
    };
    let guardrail_note = match guardrail_status {
        "review" | "fail" => "after guardrail remediation",
        _ => "with guardrails intact",
    };
    format!(
        "{} pathways to {} while operating {}.",
        posture, recommendation, guardrail_note
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let insight = AdaptAnalyzer.analyze(&Payload::new());
        assert_eq!(insight["summary"], "iterate protocols");
        assert_eq!(
            insight["action"],
            "optimize pathways to iterate protocols while operating with guardrails intact."
        );
        assert_eq!(insight["constraints"], json!([]));
        // (0.6 + 0.5) / 2
        assert_eq!(insight["priority"], 0.55);
        assert_eq!(insight["acuity"], 0.455);
    }

    #[test]
    fn test_critical_failure_stabilizes() {
        let payload = into_insight(json!({
            "recommendation": "rotate keys",
            "risk_level": "critical",
            "guardrail_status": "fail",
            "constraints": ["no downtime"],
        }));
        let insight = AdaptAnalyzer.analyze(&payload);
        assert_eq!(
            insight["action"],
            "stabilize pathways to rotate keys while operating after guardrail remediation."
        );
        assert_eq!(insight["priority"], 0.95);
        assert_eq!(insight["acuity"], 0.495);
        assert_eq!(insight["constraints"], json!(["no downtime"]));
    }

    #[test]
    fn test_empty_risk_level_scores_unlisted() {
        let insight = AdaptAnalyzer.analyze(&into_insight(json!({"risk_level": ""})));
        // (0.5 unlisted + 0.5 unknown) / 2
        assert_eq!(insight["priority"], 0.5);
        assert_eq!(insight["acuity"], 0.45);
    }

    #[test]
    fn test_non_string_labels_score_unlisted() {
        let insight = AdaptAnalyzer.analyze(&into_insight(json!({
            "risk_level": 3,
            "guardrail_status": ["fail"],
        })));
        assert_eq!(insight["priority"], 0.5);
        assert_eq!(
            insight["action"],
            "optimize pathways to iterate protocols while operating with guardrails intact."
        );
    }

    #[test]
    fn test_null_labels_take_defaults() {
        let insight = AdaptAnalyzer.analyze(&into_insight(json!({
            "risk_level": null,
            "guardrail_status": null,
        })));
        assert_eq!(insight["priority"], 0.55);
    }

    #[test]
    fn test_unlisted_keys_score_half() {
        assert_eq!(priority_score("apocalyptic", "mystery"), 0.5);
        assert_eq!(priority_score("low", "pass"), 0.3);
    }
}
