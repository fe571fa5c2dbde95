//! Enhancement pass
//!
//! Produces an enhanced copy of every analyzer result: acuity nudged up by a fixed boost
//! and a follow-up question attached to the insight. Input order is preserved.

use crate::types::{summary_or, AnalyzerResult, EnhancedResult, FOLLOW_UP_KEY};
use serde_json::Value;

/// Added to every analyzer's acuity
pub const ACUITY_BOOST: f64 = 0.05;

/// Boosted acuity never exceeds this
pub const ACUITY_CEILING: f64 = 1.0;

/// Stand-in when an insight has no summary
const DEFAULT_SUBJECT: &str = "insight";

#[derive(Debug, Clone, Copy, Default)]
pub struct EnhancementPass;

impl EnhancementPass {
    /// Enhance each result, one output per input in the same order
    pub fn boost(&self, results: &[AnalyzerResult]) -> Vec<EnhancedResult> {
        results.iter().map(enhance).collect()
    }
}

fn enhance(result: &AnalyzerResult) -> EnhancedResult {
    let mut insight = result.insight.clone();
    let question = follow_up_question(&summary_or(&insight, DEFAULT_SUBJECT));
    insight.insert(FOLLOW_UP_KEY.to_string(), Value::String(question));

    EnhancedResult::new(
        result.analyzer_name.clone(),
        boosted_acuity(result.acuity),
        insight,
    )
}

pub fn boosted_acuity(acuity: f64) -> f64 {
    (acuity + ACUITY_BOOST).min(ACUITY_CEILING)
}

fn follow_up_question(subject: &str) -> String {
    format!("What new data could clarify the {} finding?", subject)
}
