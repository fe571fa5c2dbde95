//! Database initialization
//!
//! Creates the database file on first run and brings the three illumination tables into
//! existence. Every statement is idempotent, so calling `init_database` against an
//! existing file is safe.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Busy timeout applied to every connection (ms)
const BUSY_TIMEOUT_MS: u64 = 5000;

/// Open (creating if needed) the database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Pragmas go on the connect options so every pooled connection gets them.
    // WAL lets readers see the last committed snapshot while a run is being written.
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create tables and indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_illumination_runs_table(pool).await?;
    create_analyzer_results_table(pool).await?;
    create_audit_findings_table(pool).await?;
    Ok(())
}

async fn create_illumination_runs_table(pool: &SqlitePool) -> Result<()> {
    // AUTOINCREMENT: ids are never reused, even after the newest row is removed
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS illumination_runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            created_at TEXT NOT NULL,
            source TEXT NOT NULL DEFAULT 'api',
            guardrail_status TEXT NOT NULL DEFAULT 'unknown',
            recursive_question TEXT,
            input_payload TEXT NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_illumination_runs_created_at ON illumination_runs(created_at)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_illumination_runs_status ON illumination_runs(guardrail_status)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_analyzer_results_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analyzer_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id INTEGER NOT NULL REFERENCES illumination_runs(id),
            analyzer_name TEXT NOT NULL,
            acuity REAL NOT NULL DEFAULT 0.0,
            summary TEXT,
            detail TEXT,
            payload TEXT NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_analyzer_results_run ON analyzer_results(run_id)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_analyzer_results_name ON analyzer_results(analyzer_name)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_audit_findings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_findings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id INTEGER NOT NULL REFERENCES illumination_runs(id),
            layer TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pass',
            details TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_findings_run ON audit_findings(run_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_findings_status ON audit_findings(status)")
        .execute(pool)
        .await?;

    Ok(())
}
