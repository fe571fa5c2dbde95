//! Pipeline data model
//!
//! Values flow one way: `AnalyzerResult` (orchestrator) → `EnhancedResult` (enhancement
//! pass) → `AuditFinding` (audit layer) → `RecursionOutcome` (synthesizer). Each stage
//! produces new values; nothing is mutated in place.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Triggering payload: an arbitrary JSON object
pub type Payload = Map<String, Value>;

/// Structured analyzer output: an arbitrary JSON object
pub type Insight = Map<String, Value>;

/// Key carrying the analyzer's self-reported confidence
pub const ACUITY_KEY: &str = "acuity";

/// Key carrying the human-readable headline of an insight
pub const SUMMARY_KEY: &str = "summary";

/// Key added by the enhancement pass
pub const FOLLOW_UP_KEY: &str = "follow_up_question";

/// Pass/review verdict shared by audit findings and recursion outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailStatus {
    Pass,
    Review,
}

impl GuardrailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardrailStatus::Pass => "pass",
            GuardrailStatus::Review => "review",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, GuardrailStatus::Pass)
    }
}

impl fmt::Display for GuardrailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analyzer's output for one payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub analyzer_name: String,
    pub insight: Insight,
    /// Confidence in [0.0, 1.0]
    pub acuity: f64,
}

impl AnalyzerResult {
    /// Build a result from a raw insight, reading acuity out of the insight itself
    pub fn from_insight(analyzer_name: impl Into<String>, insight: Insight) -> Self {
        let acuity = read_acuity(&insight);
        Self {
            analyzer_name: analyzer_name.into(),
            insight,
            acuity,
        }
    }
}

/// An analyzer result after the enhancement pass
///
/// Only the enhancement pass constructs these, which guarantees the insight carries a
/// `follow_up_question`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancedResult {
    analyzer_name: String,
    acuity: f64,
    insight: Insight,
}

impl EnhancedResult {
    pub(crate) fn new(analyzer_name: String, acuity: f64, insight: Insight) -> Self {
        Self {
            analyzer_name,
            acuity,
            insight,
        }
    }

    pub fn analyzer_name(&self) -> &str {
        &self.analyzer_name
    }

    pub fn acuity(&self) -> f64 {
        self.acuity
    }

    pub fn insight(&self) -> &Insight {
        &self.insight
    }

    pub fn follow_up_question(&self) -> &str {
        self.insight
            .get(FOLLOW_UP_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// `insight.summary` when it is a string
    pub fn summary(&self) -> Option<&str> {
        self.insight.get(SUMMARY_KEY).and_then(Value::as_str)
    }
}

/// One guardrail layer's verdict over a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditFinding {
    pub layer: String,
    pub status: GuardrailStatus,
    pub details: String,
}

/// Run-level status plus the follow-up question for the next cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecursionOutcome {
    pub status: GuardrailStatus,
    pub question: Option<String>,
}

/// Everything one cycle produced, as returned to HTTP and CLI callers
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub run_id: i64,
    pub insights: Vec<EnhancedResult>,
    pub guardrails: Vec<AuditFinding>,
    pub recursive: RecursionOutcome,
}

/// Read `acuity` from an insight
///
/// Numbers and numeric strings are accepted. Missing, non-numeric and non-finite values
/// read as 0.0; finite values are clamped into [0.0, 1.0].
pub fn read_acuity(insight: &Insight) -> f64 {
    let raw = match insight.get(ACUITY_KEY) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Text used to stand in for `insight.summary` inside generated questions
///
/// Strings are used verbatim; other non-null values are rendered as JSON text.
pub fn summary_or(insight: &Insight, fallback: &str) -> String {
    match insight.get(SUMMARY_KEY) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => fallback.to_string(),
        Some(other) => other.to_string(),
    }
}
