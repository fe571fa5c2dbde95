//! Services
//!
//! Storage-facing components. Pipeline stages stay free of I/O; everything that touches
//! the database lives here.

pub mod run_recorder;

pub use run_recorder::{
    AnalyticsSummary, AnalyzerAcuity, FindingSummary, ResultSummary, RunRecorder, RunSummary,
    StatusCount,
};
