//! orill-il - illumination pipeline service
//!
//! Serves the HTTP API by default; `cycle` and `analytics` run a single operation
//! against the same database and print JSON to stdout.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use orill_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use orill_common::db::init_database;
use orill_il::api::buildinfo::BuildInfo;
use orill_il::cli::{load_payload, Args, Command};
use orill_il::pipeline::{IlluminationCycle, SOURCE_WORKFLOW};
use orill_il::services::RunRecorder;
use orill_il::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Logs go to stderr so `cycle` and `analytics` output stays pipeable
    let default_filter = format!(
        "orill_il={level},orill_common={level},tower_http={level}",
        level = config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Log build identification immediately after tracing init
    let build = BuildInfo::current();
    info!(
        "Starting orill-il v{} [{}] built {} ({})",
        build.version, build.git_hash, build.build_timestamp, build.build_profile
    );

    let root_folder = RootFolderResolver::new()
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let cycle = IlluminationCycle::from_config(&config, RunRecorder::new(pool))
        .context("Failed to configure illumination cycle")?;

    match args.command() {
        Command::Serve { port, bind } => {
            let port = port.unwrap_or(config.port);
            let bind = bind.unwrap_or_else(|| config.bind_address.clone());
            serve(cycle, &bind, port, config.recent_runs_limit).await
        }
        Command::Cycle {
            payload,
            payload_file,
        } => {
            let payload = load_payload(payload.as_deref(), payload_file.as_deref())?;
            let report = cycle.run_cycle(SOURCE_WORKFLOW, &payload).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Analytics { limit } => {
            let limit = limit.unwrap_or(config.recent_runs_limit);
            let summary = cycle.recorder().analytics_summary(limit).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

async fn serve(cycle: IlluminationCycle, bind: &str, port: u16, recent_runs_limit: i64) -> Result<()> {
    let app = build_router(AppState::new(cycle, recent_runs_limit));

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("orill-il listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
