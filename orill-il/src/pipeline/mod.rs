//! Illumination pipeline
//!
//! Stages in control-flow order. Only [`cycle`] touches storage, through the run
//! recorder; every other stage is pure.

pub mod audit;
pub mod cycle;
pub mod enhancement;
pub mod orchestrator;
pub mod recursion;

pub use audit::{aggregate_acuity, AcuityAggregate, AuditLayer, REVIEW_THRESHOLD};
pub use cycle::{IlluminationCycle, SOURCE_API, SOURCE_WORKFLOW};
pub use enhancement::{EnhancementPass, ACUITY_BOOST, ACUITY_CEILING};
pub use orchestrator::Orchestrator;
pub use recursion::{RecursionSynthesizer, FALLBACK_QUESTION};
