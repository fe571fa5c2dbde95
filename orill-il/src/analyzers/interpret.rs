//! Interpret analyzer
//!
//! Ranks `signals` by descending strength and lets the strongest one carry the
//! `hypothesis`. Non-object signals are skipped; a missing or non-numeric strength reads
//! as 0.0.

use super::{array_at, as_number, into_insight, round_to, text_or, Analyzer};
use crate::types::{Insight, Payload};
use serde_json::{json, Value};

pub const NAME: &str = "interpret";

/// Confidence assumed when no signal is present
const DEFAULT_CONFIDENCE: f64 = 0.25;

const MAX_ACUITY: f64 = 0.85;

/// Signals echoed back in the insight
const TOP_SIGNALS: usize = 3;

pub struct InterpretAnalyzer;

struct Signal {
    label: String,
    strength: f64,
    evidence: Value,
}

impl Analyzer for InterpretAnalyzer {
    fn name(&self) -> &str {
        NAME
    }

    fn analyze(&self, payload: &Payload) -> Insight {
        let hypothesis = text_or(payload, "hypothesis", "emergent interpretation");
        let weighted = rank_signals(array_at(payload, "signals"));

        let top = weighted.first();
        let confidence = top.map(|s| s.strength).unwrap_or(DEFAULT_CONFIDENCE);
        let narrative = match top {
            Some(signal) => format!("Dominant signal `{}` supports the hypothesis.", signal.label),
            None => "No dominant signals detected; hypothesis remains exploratory.".to_string(),
        };

        let acuity = 0.35 + (confidence * 0.4).min(0.3);
        let alignment_gap = 1.0 - confidence;

        let supporting: Vec<Value> = weighted
            .iter()
            .take(TOP_SIGNALS)
            .map(|s| {
                json!({
                    "label": s.label,
                    "strength": s.strength,
                    "evidence": s.evidence,
                })
            })
            .collect();

        into_insight(json!({
            "summary": hypothesis,
            "insight": narrative,
            "supporting_signals": supporting,
            "alignment_gap": round_to(alignment_gap, 3),
            "acuity": round_to(acuity.clamp(0.0, MAX_ACUITY), 3),
        }))
    }
}

/// Object signals sorted by descending strength; equal strengths keep payload order
fn rank_signals(raw: &[Value]) -> Vec<Signal> {
    let mut signals: Vec<Signal> = raw
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let map = item.as_object()?;
            let label = match map.get("label") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => format!("signal-{}", idx),
                Some(other) => other.to_string(),
            };
            Some(Signal {
                label,
                strength: map.get("strength").and_then(as_number).unwrap_or(0.0),
                evidence: map.get("evidence").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    signals.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    signals
}
