//! Guardrail audit
//!
//! Every configured layer judges the same run-wide acuity aggregate, computed once per
//! audit. A mean strictly below [`REVIEW_THRESHOLD`] sends every layer to review; an empty
//! result set has mean 0.0 and therefore always reviews.

use crate::types::{AuditFinding, EnhancedResult, GuardrailStatus};
use orill_common::config::DEFAULT_GUARDRAIL_LAYERS;
use orill_common::{Error, Result};
use std::collections::HashSet;
use tracing::warn;

pub const REVIEW_THRESHOLD: f64 = 0.2;

/// Count and mean of enhanced acuities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcuityAggregate {
    pub count: usize,
    pub mean: f64,
}

impl AcuityAggregate {
    pub fn status(&self) -> GuardrailStatus {
        if self.mean < REVIEW_THRESHOLD {
            GuardrailStatus::Review
        } else {
            GuardrailStatus::Pass
        }
    }

    pub fn details(&self) -> String {
        format!(
            "Acuity average {:.2} across {} analyzers.",
            self.mean, self.count
        )
    }
}

pub fn aggregate_acuity(results: &[EnhancedResult]) -> AcuityAggregate {
    let count = results.len();
    let mean = if count == 0 {
        0.0
    } else {
        results.iter().map(EnhancedResult::acuity).sum::<f64>() / count as f64
    };
    AcuityAggregate { count, mean }
}

/// Ordered set of guardrail layer names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLayer {
    layers: Vec<String>,
}

impl Default for AuditLayer {
    fn default() -> Self {
        Self {
            layers: DEFAULT_GUARDRAIL_LAYERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AuditLayer {
    /// Layers used exactly as given
    pub fn new(layers: Vec<String>) -> Self {
        Self { layers }
    }

    /// Layers from configuration
    ///
    /// Strict mode rejects an empty list, blank names and duplicates with
    /// `Error::InvalidInput`. Lenient mode drops blank and duplicate names with a warning;
    /// an empty list is allowed and yields no findings.
    pub fn from_config(layers: &[String], strict: bool) -> Result<Self> {
        if strict && layers.is_empty() {
            return Err(Error::InvalidInput(
                "At least one guardrail layer must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut accepted = Vec::with_capacity(layers.len());
        for raw in layers {
            let name = raw.trim();
            if name.is_empty() {
                if strict {
                    return Err(Error::InvalidInput(
                        "Guardrail layer names must be non-empty".to_string(),
                    ));
                }
                warn!("Skipping blank guardrail layer name");
                continue;
            }
            if !seen.insert(name.to_string()) {
                if strict {
                    return Err(Error::InvalidInput(format!(
                        "Guardrail layer configured twice: {}",
                        name
                    )));
                }
                warn!(layer = name, "Skipping duplicate guardrail layer");
                continue;
            }
            accepted.push(name.to_string());
        }

        Ok(Self { layers: accepted })
    }

    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// One finding per layer, in layer order
    pub fn audit(&self, results: &[EnhancedResult]) -> Vec<AuditFinding> {
        let aggregate = aggregate_acuity(results);
        let status = aggregate.status();
        let details = aggregate.details();

        self.layers
            .iter()
            .map(|layer| AuditFinding {
                layer: layer.clone(),
                status,
                details: details.clone(),
            })
            .collect()
    }
}
