//! Recursion synthesizer
//!
//! Turns a finished run into the question that seeds the next one. The highest-acuity
//! insight wins (first occurrence on ties); the run passes only if every finding passes.

use crate::types::{summary_or, AuditFinding, EnhancedResult, GuardrailStatus, RecursionOutcome};

/// Asked when no analyzer produced anything
pub const FALLBACK_QUESTION: &str = "What new data source should be illuminated next?";

const DEFAULT_SUBJECT: &str = "core insight";

#[derive(Debug, Clone, Copy, Default)]
pub struct RecursionSynthesizer;

impl RecursionSynthesizer {
    pub fn derive(&self, results: &[EnhancedResult], findings: &[AuditFinding]) -> RecursionOutcome {
        let question = match strongest(results) {
            Some(top) => format!(
                "What evidence would increase confidence in the {} perspective?",
                summary_or(top.insight(), DEFAULT_SUBJECT)
            ),
            None => FALLBACK_QUESTION.to_string(),
        };

        RecursionOutcome {
            status: overall_status(findings),
            question: Some(question),
        }
    }
}

/// Highest acuity, earliest on ties
fn strongest(results: &[EnhancedResult]) -> Option<&EnhancedResult> {
    results.iter().fold(None, |best, candidate| match best {
        Some(current) if current.acuity() >= candidate.acuity() => Some(current),
        _ => Some(candidate),
    })
}

fn overall_status(findings: &[AuditFinding]) -> GuardrailStatus {
    if findings.iter().all(|f| f.status.is_pass()) {
        GuardrailStatus::Pass
    } else {
        GuardrailStatus::Review
    }
}
