//! Test helpers for orill-il integration tests

#![allow(dead_code)]

use orill_common::db::init_database;
use orill_il::analyzers::Analyzer;
use orill_il::pipeline::EnhancementPass;
use orill_il::services::RunRecorder;
use orill_il::types::{AnalyzerResult, EnhancedResult, Insight, Payload};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Fresh database in a temp dir; keep the `TempDir` alive for the test's duration
pub async fn temp_recorder() -> (RunRecorder, TempDir) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("orill.db"))
        .await
        .expect("Should initialize database");
    (RunRecorder::new(pool), dir)
}

/// Analyzer returning a fixed acuity and summary
pub struct FixedAnalyzer {
    pub name: String,
    pub acuity: f64,
}

impl Analyzer for FixedAnalyzer {
    fn name(&self) -> &str {
        &self.name
    }

    fn analyze(&self, _payload: &Payload) -> Insight {
        object(json!({
            "summary": format!("{} view", self.name),
            "insight": "fixed",
            "acuity": self.acuity,
        }))
    }
}

pub fn fixed(name: &str, acuity: f64) -> Arc<dyn Analyzer> {
    Arc::new(FixedAnalyzer {
        name: name.to_string(),
        acuity,
    })
}

/// Analyzer that always panics
pub struct FaultyAnalyzer;

impl Analyzer for FaultyAnalyzer {
    fn name(&self) -> &str {
        "faulty"
    }

    fn analyze(&self, _payload: &Payload) -> Insight {
        panic!("faulty analyzer")
    }
}

pub fn object(value: Value) -> Payload {
    value.as_object().cloned().expect("Should be a JSON object")
}

/// Enhanced result for a raw (pre-boost) acuity
pub fn enhanced(name: &str, raw_acuity: f64, summary: &str) -> EnhancedResult {
    let raw = AnalyzerResult::from_insight(
        name,
        object(json!({"summary": summary, "acuity": raw_acuity})),
    );
    EnhancementPass
        .boost(&[raw])
        .pop()
        .expect("Should produce one enhanced result")
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
