//! Command-line surface for orill-il
//!
//! `serve` runs the HTTP service (the default), `cycle` runs one illumination cycle with
//! source "workflow", `analytics` prints the aggregate read model.

use clap::{Parser, Subcommand};
use orill_common::{Error, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::types::Payload;

/// Command-line arguments for orill-il
#[derive(Parser, Debug)]
#[command(name = "orill-il")]
#[command(about = "Illumination pipeline service")]
#[command(version)]
pub struct Args {
    /// Root folder holding the database
    #[arg(long, global = true)]
    pub root_folder: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP service
    Serve {
        /// Port to listen on (overrides configuration)
        #[arg(short, long, env = "ORILL_PORT")]
        port: Option<u16>,

        /// Address to bind (overrides configuration)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run one illumination cycle and print the report
    Cycle {
        /// Inline JSON object
        #[arg(short, long)]
        payload: Option<String>,

        /// Path to a JSON object file
        #[arg(short = 'f', long, value_name = "PATH")]
        payload_file: Option<PathBuf>,
    },

    /// Print analyzer acuity, audit distribution and recent runs
    Analytics {
        /// Number of recent runs (overrides configuration)
        #[arg(long)]
        limit: Option<i64>,
    },
}

impl Args {
    /// Subcommand to run; `serve` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            port: None,
            bind: None,
        })
    }
}

/// Resolve the `cycle` payload from at most one of the two sources
///
/// Neither source yields an empty payload.
pub fn load_payload(inline: Option<&str>, file: Option<&Path>) -> Result<Payload> {
    let raw = match (inline, file) {
        (Some(_), Some(_)) => {
            return Err(Error::InvalidInput(
                "Use either --payload or --payload-file, not both".to_string(),
            ));
        }
        (Some(text), None) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidInput(format!(
                "Cannot read payload file {}: {}",
                path.display(),
                e
            ))
        })?,
        (None, None) => return Ok(Payload::new()),
    };

    parse_payload(&raw)
}

fn parse_payload(raw: &str) -> Result<Payload> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::InvalidInput(format!("Payload is not valid JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidInput(
            "Payload must be a JSON object".to_string(),
        )),
    }
}
