//! Run recording and run-history aggregation
//!
//! A run header and all of its child rows are written in one transaction; readers only
//! ever see fully committed runs. Every read method opens its own read transaction so
//! that the queries it issues observe the same snapshot.

use crate::types::{AuditFinding, EnhancedResult, Insight, Payload, RecursionOutcome};
use orill_common::db::{AnalyzerResultRecord, AuditFindingRecord, IlluminationRun};
use orill_common::{time, Error, Result};
use serde::Serialize;
use serde_json::Value;
use sqlx::{Pool, Sqlite, SqliteConnection};
use std::collections::{BTreeMap, HashMap};

/// Insight keys checked, in order, for the stored `detail` column
const DETAIL_KEYS: [&str; 3] = ["insight", "action", "recommendation"];

/// Per-analyzer acuity over all recorded runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzerAcuity {
    pub analyzer_name: String,
    pub count: i64,
    /// Rounded to 3 decimal places
    pub avg_acuity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub analyzer_name: String,
    pub acuity: f64,
    pub summary: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindingSummary {
    pub layer: String,
    pub status: String,
    pub details: Option<String>,
}

/// One recorded run with its nested results and findings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub id: i64,
    pub created_at: String,
    pub source: String,
    pub guardrail_status: String,
    pub recursive_question: Option<String>,
    pub input_payload: Value,
    pub insights: Vec<ResultSummary>,
    pub guardrails: Vec<FindingSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Analytics read model served over HTTP and the CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub analyzers: Vec<AnalyzerAcuity>,
    pub guardrails: Vec<StatusCount>,
    pub recent_runs: Vec<RunSummary>,
}

/// Run Recorder
#[derive(Debug, Clone)]
pub struct RunRecorder {
    db: Pool<Sqlite>,
}

impl RunRecorder {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.db
    }

    /// Persist one run atomically
    ///
    /// **Algorithm:**
    /// 1. Begin transaction
    /// 2. Insert run header, capturing the generated id
    /// 3. Insert one row per enhanced result, then one per finding
    /// 4. Commit
    ///
    /// Any failure drops the transaction uncommitted, so no header is left without its
    /// children. Returns the new run id.
    pub async fn record(
        &self,
        source: &str,
        payload: &Payload,
        results: &[EnhancedResult],
        findings: &[AuditFinding],
        outcome: &RecursionOutcome,
    ) -> Result<i64> {
        let input_payload = serde_json::to_string(payload)?;
        let created_at = time::to_iso8601(&time::now());

        tracing::debug!(
            source,
            result_count = results.len(),
            finding_count = findings.len(),
            "Recording illumination run"
        );

        let mut tx = self.db.begin().await?;

        let run_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO illumination_runs (
                created_at, source, guardrail_status, recursive_question, input_payload
            )
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&created_at)
        .bind(source)
        .bind(outcome.status.as_str())
        .bind(outcome.question.as_deref())
        .bind(&input_payload)
        .fetch_one(&mut *tx)
        .await?;

        for result in results {
            let insight = result.insight();
            sqlx::query(
                r#"
                INSERT INTO analyzer_results (
                    run_id, analyzer_name, acuity, summary, detail, payload
                )
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(run_id)
            .bind(result.analyzer_name())
            .bind(result.acuity())
            .bind(result.summary())
            .bind(detail_text(insight))
            .bind(serde_json::to_string(insight)?)
            .execute(&mut *tx)
            .await?;

            tracing::debug!(
                run_id,
                analyzer = result.analyzer_name(),
                acuity = result.acuity(),
                "Recorded analyzer result"
            );
        }

        for finding in findings {
            sqlx::query(
                "INSERT INTO audit_findings (run_id, layer, status, details) VALUES (?, ?, ?, ?)",
            )
            .bind(run_id)
            .bind(&finding.layer)
            .bind(finding.status.as_str())
            .bind(&finding.details)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            run_id,
            source,
            guardrail_status = %outcome.status,
            results = results.len(),
            findings = findings.len(),
            "Illumination run recorded"
        );

        Ok(run_id)
    }

    /// Average acuity and result count per analyzer across all runs
    ///
    /// Highest average first; equal averages fall back to analyzer name.
    pub async fn analyzer_acuity_summary(&self) -> Result<Vec<AnalyzerAcuity>> {
        let mut tx = self.db.begin().await?;
        let rows = fetch_acuity_summary(&mut tx).await?;
        tx.commit().await?;
        Ok(rows)
    }

    /// Finding count per status across all runs
    pub async fn audit_status_distribution(&self) -> Result<BTreeMap<String, i64>> {
        let mut tx = self.db.begin().await?;
        let counts = fetch_status_counts(&mut tx).await?;
        tx.commit().await?;
        Ok(counts
            .into_iter()
            .map(|StatusCount { status, count }| (status, count))
            .collect())
    }

    /// Newest runs first, at most `limit`
    ///
    /// # Errors
    /// `Error::InvalidInput` when `limit <= 0`.
    pub async fn recent_runs(&self, limit: i64) -> Result<Vec<RunSummary>> {
        validate_limit(limit)?;

        let mut tx = self.db.begin().await?;
        let runs = fetch_recent_runs(&mut tx, limit).await?;
        tx.commit().await?;
        Ok(runs)
    }

    /// All three aggregates from one snapshot
    pub async fn analytics_summary(&self, limit: i64) -> Result<AnalyticsSummary> {
        validate_limit(limit)?;

        let mut tx = self.db.begin().await?;
        let analyzers = fetch_acuity_summary(&mut tx).await?;
        let guardrails = fetch_status_counts(&mut tx).await?;
        let recent_runs = fetch_recent_runs(&mut tx, limit).await?;
        tx.commit().await?;

        Ok(AnalyticsSummary {
            analyzers,
            guardrails,
            recent_runs,
        })
    }
}

fn validate_limit(limit: i64) -> Result<()> {
    if limit <= 0 {
        return Err(Error::InvalidInput(format!(
            "limit must be a positive integer, got {}",
            limit
        )));
    }
    Ok(())
}

/// First string among the detail keys
fn detail_text(insight: &Insight) -> Option<&str> {
    DETAIL_KEYS
        .iter()
        .find_map(|key| insight.get(*key).and_then(Value::as_str))
}

fn round_3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

async fn fetch_acuity_summary(conn: &mut SqliteConnection) -> Result<Vec<AnalyzerAcuity>> {
    let rows: Vec<(String, i64, f64)> = sqlx::query_as(
        r#"
        SELECT analyzer_name, COUNT(*), AVG(acuity)
        FROM analyzer_results
        GROUP BY analyzer_name
        ORDER BY AVG(acuity) DESC, analyzer_name ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(analyzer_name, count, avg)| AnalyzerAcuity {
            analyzer_name,
            count,
            avg_acuity: round_3(avg),
        })
        .collect())
}

async fn fetch_status_counts(conn: &mut SqliteConnection) -> Result<Vec<StatusCount>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM audit_findings GROUP BY status ORDER BY status",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect())
}

async fn fetch_recent_runs(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<RunSummary>> {
    let runs: Vec<IlluminationRun> = sqlx::query_as(
        r#"
        SELECT id, created_at, source, guardrail_status, recursive_question, input_payload
        FROM illumination_runs
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    if runs.is_empty() {
        return Ok(Vec::new());
    }

    let results: Vec<AnalyzerResultRecord> = sqlx::query_as(
        r#"
        SELECT id, run_id, analyzer_name, acuity, summary, detail, payload
        FROM analyzer_results
        WHERE run_id IN (
            SELECT id FROM illumination_runs ORDER BY created_at DESC, id DESC LIMIT ?
        )
        ORDER BY run_id, id
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    let findings: Vec<AuditFindingRecord> = sqlx::query_as(
        r#"
        SELECT id, run_id, layer, status, details
        FROM audit_findings
        WHERE run_id IN (
            SELECT id FROM illumination_runs ORDER BY created_at DESC, id DESC LIMIT ?
        )
        ORDER BY run_id, id
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;

    let mut results_by_run: HashMap<i64, Vec<ResultSummary>> = HashMap::new();
    for record in results {
        results_by_run
            .entry(record.run_id)
            .or_default()
            .push(ResultSummary {
                analyzer_name: record.analyzer_name,
                acuity: record.acuity,
                summary: record.summary,
                detail: record.detail,
            });
    }

    let mut findings_by_run: HashMap<i64, Vec<FindingSummary>> = HashMap::new();
    for record in findings {
        findings_by_run
            .entry(record.run_id)
            .or_default()
            .push(FindingSummary {
                layer: record.layer,
                status: record.status,
                details: record.details,
            });
    }

    Ok(runs
        .into_iter()
        .map(|run| RunSummary {
            insights: results_by_run.remove(&run.id).unwrap_or_default(),
            guardrails: findings_by_run.remove(&run.id).unwrap_or_default(),
            input_payload: serde_json::from_str(&run.input_payload)
                .unwrap_or(Value::String(run.input_payload)),
            id: run.id,
            created_at: run.created_at,
            source: run.source,
            guardrail_status: run.guardrail_status,
            recursive_question: run.recursive_question,
        })
        .collect())
}
