//! Vulnerability analyzer
//!
//! Scores the `exposures` list against the reported `guardrail_coverage`. Coverage at or
//! above 0.7 earns a bonus; below 0.6 it triggers a coverage recommendation.

use super::{array_at, as_number, into_insight, round_to, Analyzer};
use crate::types::{Insight, Payload};
use serde_json::{json, Value};

pub const NAME: &str = "vulnerability";

const BASE_ACUITY: f64 = 0.45;
const MAX_ACUITY: f64 = 0.95;

/// Coverage assumed when the payload does not report one
const DEFAULT_COVERAGE: f64 = 0.5;

/// Coverage at or above this earns the bonus
const COVERAGE_BONUS_THRESHOLD: f64 = 0.7;

/// Coverage below this is flagged
const COVERAGE_FLOOR: f64 = 0.6;

pub struct VulnerabilityAnalyzer;

impl Analyzer for VulnerabilityAnalyzer {
    fn name(&self) -> &str {
        NAME
    }

    fn analyze(&self, payload: &Payload) -> Insight {
        let exposures = array_at(payload, "exposures");
        let coverage = payload
            .get("guardrail_coverage")
            .and_then(as_number)
            .unwrap_or(DEFAULT_COVERAGE);

        let exposure_count = exposures.len();
        let mut acuity = BASE_ACUITY + (exposure_count as f64 * 0.05).min(0.25);
        if coverage >= COVERAGE_BONUS_THRESHOLD {
            acuity += 0.1;
        }

        let mut recommendations = Vec::new();
        if let Some(top) = exposures.first() {
            let vector = top
                .get("vector")
                .and_then(Value::as_str)
                .unwrap_or("primary vector");
            recommendations.push(format!("Prioritize mitigation for {}.", vector));
        }
        if coverage < COVERAGE_FLOOR {
            recommendations.push("Increase guardrail coverage to at least 60%.".to_string());
        }
        if recommendations.is_empty() {
            recommendations.push("Maintain current guardrail posture and monitor drift.".to_string());
        }

        into_insight(json!({
            "summary": "emergent vulnerability landscape",
            "exposures": exposures,
            "coverage": coverage,
            "recommendations": recommendations,
            "acuity": round_to(acuity.min(MAX_ACUITY), 3),
        }))
    }
}
