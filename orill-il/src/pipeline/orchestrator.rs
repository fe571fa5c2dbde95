//! Analyzer fan-out
//!
//! Every registered analyzer runs on the blocking pool. Each task is tagged with its
//! registration index and its result lands in a slot vector sized to the registry, so
//! output order is registration order no matter which task finishes first.

use crate::analyzers::Analyzer;
use crate::types::{AnalyzerResult, Payload};
use orill_common::{Error, Result};
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Dispatches a payload to an ordered, non-empty set of analyzers
pub struct Orchestrator {
    analyzers: Vec<Arc<dyn Analyzer>>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("analyzers", &self.analyzer_names())
            .finish()
    }
}

impl Orchestrator {
    /// Build an orchestrator
    ///
    /// # Errors
    /// `Error::Config` when the registry is empty or two analyzers share a name.
    pub fn new(analyzers: Vec<Arc<dyn Analyzer>>) -> Result<Self> {
        if analyzers.is_empty() {
            return Err(Error::Config(
                "At least one analyzer must be registered".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for analyzer in &analyzers {
            if analyzer.name().is_empty() {
                return Err(Error::Config("Analyzer names must be non-empty".to_string()));
            }
            if !seen.insert(analyzer.name().to_string()) {
                return Err(Error::Config(format!(
                    "Analyzer registered twice: {}",
                    analyzer.name()
                )));
            }
        }

        Ok(Self { analyzers })
    }

    pub fn analyzer_names(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    /// Run every analyzer against `payload`
    ///
    /// Returns exactly one result per analyzer, in registration order.
    ///
    /// # Errors
    /// `Error::AnalyzerFault` if any analyzer panics; no partial result set is returned.
    pub async fn evaluate(&self, payload: &Payload) -> Result<Vec<AnalyzerResult>> {
        let payload = Arc::new(payload.clone());
        let mut tasks = JoinSet::new();

        for (idx, analyzer) in self.analyzers.iter().enumerate() {
            let analyzer = Arc::clone(analyzer);
            let payload = Arc::clone(&payload);
            tasks.spawn_blocking(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(&payload)));
                (idx, outcome.map_err(panic_message))
            });
        }

        let mut slots: Vec<Option<AnalyzerResult>> = (0..self.analyzers.len()).map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            let (idx, outcome) = joined
                .map_err(|e| Error::Internal(format!("Analyzer task failed to join: {}", e)))?;
            let name = self.analyzers[idx].name();

            let insight = outcome.map_err(|message| {
                warn!(analyzer = name, error = %message, "Analyzer panicked");
                Error::AnalyzerFault {
                    analyzer: name.to_string(),
                    message,
                }
            })?;

            let result = AnalyzerResult::from_insight(name, insight);
            debug!(analyzer = name, index = idx, acuity = result.acuity, "Analyzer complete");
            slots[idx] = Some(result);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.ok_or_else(|| {
                    Error::Internal(format!(
                        "Analyzer '{}' produced no result",
                        self.analyzers[idx].name()
                    ))
                })
            })
            .collect()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "analyzer panicked".to_string()
    }
}
