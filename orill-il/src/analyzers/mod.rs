//! Reference analyzers ("oracles")
//!
//! Each analyzer maps a payload to an insight carrying an `acuity` score. Analyzers are
//! independent of one another and hold no state, so the orchestrator may run them in
//! parallel.
//!
//! # Analyzers
//! 1. **dataset** - trend detection with 2σ anomaly flagging
//! 2. **interpret** - hypothesis signal ranking by descending strength
//! 3. **adapt** - risk/guardrail lookup tables averaged into a priority
//! 4. **vulnerability** - exposure prioritization with a 0.7 coverage bonus
//!
//! # Contract
//! `analyze` must be a pure function of the payload and must never panic on malformed
//! input: unexpected shapes degrade to default, low-confidence output. A panic is
//! treated as an analyzer fault and fails the whole cycle.

pub mod adapt;
pub mod dataset;
pub mod interpret;
pub mod vulnerability;

pub use adapt::AdaptAnalyzer;
pub use dataset::DatasetAnalyzer;
pub use interpret::InterpretAnalyzer;
pub use vulnerability::VulnerabilityAnalyzer;

use crate::types::{Insight, Payload};
use orill_common::config::DEFAULT_ANALYZERS;
use orill_common::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// A named, pluggable scoring unit
///
/// # Example
/// ```rust,ignore
/// use orill_il::analyzers::Analyzer;
/// use orill_il::types::{Insight, Payload};
/// use serde_json::json;
///
/// struct Constant;
///
/// impl Analyzer for Constant {
///     fn name(&self) -> &str { "constant" }
///
///     fn analyze(&self, _payload: &Payload) -> Insight {
///         json!({"summary": "constant", "acuity": 0.5}).as_object().cloned().unwrap_or_default()
///     }
/// }
/// ```
pub trait Analyzer: Send + Sync {
    /// Unique name; becomes `analyzer_name` on every result
    fn name(&self) -> &str;

    /// Produce an insight containing at least `acuity`
    fn analyze(&self, payload: &Payload) -> Insight;
}

/// Look up a reference analyzer by name
pub fn analyzer_by_name(name: &str) -> Option<Arc<dyn Analyzer>> {
    match name {
        dataset::NAME => Some(Arc::new(DatasetAnalyzer)),
        interpret::NAME => Some(Arc::new(InterpretAnalyzer)),
        adapt::NAME => Some(Arc::new(AdaptAnalyzer)),
        vulnerability::NAME => Some(Arc::new(VulnerabilityAnalyzer)),
        _ => None,
    }
}

/// All four reference analyzers in default dispatch order
pub fn default_analyzers() -> Vec<Arc<dyn Analyzer>> {
    DEFAULT_ANALYZERS
        .iter()
        .filter_map(|name| analyzer_by_name(name))
        .collect()
}

/// Resolve configured analyzer names into an ordered registry
///
/// Unknown names are rejected in strict mode and skipped with a warning otherwise.
/// An empty result is left for the orchestrator to reject.
pub fn resolve_analyzers(names: &[String], strict: bool) -> Result<Vec<Arc<dyn Analyzer>>> {
    let mut analyzers = Vec::with_capacity(names.len());

    for name in names {
        match analyzer_by_name(name.trim()) {
            Some(analyzer) => analyzers.push(analyzer),
            None if strict => {
                return Err(Error::InvalidInput(format!("Unsupported analyzer: {}", name)));
            }
            None => warn!(analyzer = %name, "Skipping unknown analyzer"),
        }
    }

    Ok(analyzers)
}

/// Build an insight from a `json!` object literal
pub(crate) fn into_insight(value: Value) -> Insight {
    match value {
        Value::Object(map) => map,
        _ => Insight::new(),
    }
}

/// Round half away from zero to `places` decimal places
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Lenient numeric read: numbers and numeric strings, anything else is `None`
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Non-empty string at `key`, else `fallback`
pub(crate) fn text_or(payload: &Payload, key: &str, fallback: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => fallback.to_string(),
    }
}

/// Array at `key`, or an empty slice for anything else
pub(crate) fn array_at<'a>(payload: &'a Payload, key: &str) -> &'a [Value] {
    payload
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
