//! # Oracle Illuminating Common Library
//!
//! Shared code for the orill services including:
//! - Error taxonomy (`Error`, `Result`)
//! - Configuration loading and root folder resolution
//! - Database initialization and persisted record shapes
//! - Timestamp helpers

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
