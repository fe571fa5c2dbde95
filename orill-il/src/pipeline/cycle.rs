//! End-to-end illumination cycle
//!
//! payload → orchestrator → enhancement → audit → recursion → recorder. The first
//! failing stage's error is returned and nothing is recorded for that cycle.

use super::{AuditLayer, EnhancementPass, Orchestrator, RecursionSynthesizer};
use crate::analyzers::{resolve_analyzers, Analyzer};
use crate::services::RunRecorder;
use crate::types::{CycleReport, Payload};
use orill_common::config::TomlConfig;
use orill_common::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Run source for HTTP-triggered cycles
pub const SOURCE_API: &str = "api";

/// Run source for CLI-triggered cycles
pub const SOURCE_WORKFLOW: &str = "workflow";

#[derive(Debug)]
pub struct IlluminationCycle {
    orchestrator: Orchestrator,
    enhancement: EnhancementPass,
    audit: AuditLayer,
    recursion: RecursionSynthesizer,
    recorder: RunRecorder,
}

impl IlluminationCycle {
    pub fn new(
        analyzers: Vec<Arc<dyn Analyzer>>,
        audit: AuditLayer,
        recorder: RunRecorder,
    ) -> Result<Self> {
        Ok(Self {
            orchestrator: Orchestrator::new(analyzers)?,
            enhancement: EnhancementPass,
            audit,
            recursion: RecursionSynthesizer,
            recorder,
        })
    }

    /// Build the analyzer registry and guardrail layers from configuration
    pub fn from_config(config: &TomlConfig, recorder: RunRecorder) -> Result<Self> {
        let analyzers = resolve_analyzers(&config.analyzers, config.strict)?;
        let audit = AuditLayer::from_config(&config.guardrail_layers, config.strict)?;
        let cycle = Self::new(analyzers, audit, recorder)?;

        info!(
            analyzers = ?cycle.analyzer_names(),
            guardrail_layers = ?cycle.guardrail_layers(),
            strict = config.strict,
            "Illumination cycle configured"
        );

        Ok(cycle)
    }

    pub fn analyzer_names(&self) -> Vec<&str> {
        self.orchestrator.analyzer_names()
    }

    pub fn guardrail_layers(&self) -> &[String] {
        self.audit.layers()
    }

    pub fn recorder(&self) -> &RunRecorder {
        &self.recorder
    }

    /// Run one full cycle and persist it
    pub async fn run_cycle(&self, source: &str, payload: &Payload) -> Result<CycleReport> {
        debug!(source, keys = payload.len(), "Starting illumination cycle");

        let results = self.orchestrator.evaluate(payload).await?;
        let insights = self.enhancement.boost(&results);
        let guardrails = self.audit.audit(&insights);
        let recursive = self.recursion.derive(&insights, &guardrails);

        let run_id = self
            .recorder
            .record(source, payload, &insights, &guardrails, &recursive)
            .await?;

        Ok(CycleReport {
            run_id,
            insights,
            guardrails,
            recursive,
        })
    }
}
