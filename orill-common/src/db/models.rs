//! Persisted record shapes
//!
//! Runs are append-only. Child rows reference their run by id and are written in the
//! same transaction as the run header.

use serde::{Deserialize, Serialize};

/// One illumination cycle (`illumination_runs`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IlluminationRun {
    pub id: i64,
    /// RFC 3339, millisecond precision (see `time::to_iso8601`)
    pub created_at: String,
    pub source: String,
    pub guardrail_status: String,
    pub recursive_question: Option<String>,
    /// Serialized JSON echo of the triggering payload
    pub input_payload: String,
}

/// One enhanced analyzer output (`analyzer_results`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalyzerResultRecord {
    pub id: i64,
    pub run_id: i64,
    pub analyzer_name: String,
    pub acuity: f64,
    pub summary: Option<String>,
    pub detail: Option<String>,
    /// Serialized JSON insight
    pub payload: String,
}

/// One guardrail layer verdict (`audit_findings`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditFindingRecord {
    pub id: i64,
    pub run_id: i64,
    pub layer: String,
    pub status: String,
    pub details: Option<String>,
}
