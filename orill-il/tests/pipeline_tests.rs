//! End-to-end illumination cycle tests
//!
//! Tests cover:
//! - Registry construction (empty, duplicate, strict/lenient resolution)
//! - Boost, audit and recursion outcomes for known acuities
//! - Registration-order output with the reference analyzers
//! - Analyzer faults abort the cycle without recording

mod helpers;

use helpers::{approx_eq, fixed, object, temp_recorder, FaultyAnalyzer};
use orill_common::config::TomlConfig;
use orill_common::Error;
use orill_il::pipeline::{AuditLayer, IlluminationCycle, SOURCE_API, SOURCE_WORKFLOW};
use orill_il::types::{GuardrailStatus, Payload};
use serde_json::json;
use std::sync::Arc;

// =============================================================================
// Construction
// =============================================================================

#[tokio::test]
async fn test_zero_analyzers_is_config_error() {
    let (recorder, _dir) = temp_recorder().await;

    let result = IlluminationCycle::new(Vec::new(), AuditLayer::default(), recorder);

    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_duplicate_analyzer_names_is_config_error() {
    let (recorder, _dir) = temp_recorder().await;

    let result = IlluminationCycle::new(
        vec![fixed("same", 0.1), fixed("same", 0.2)],
        AuditLayer::default(),
        recorder,
    );

    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_from_config_defaults() {
    let (recorder, _dir) = temp_recorder().await;

    let cycle = IlluminationCycle::from_config(&TomlConfig::default(), recorder).unwrap();

    assert_eq!(
        cycle.analyzer_names(),
        vec!["dataset", "interpret", "adapt", "vulnerability"]
    );
    assert_eq!(cycle.guardrail_layers(), &["CDIL", "IAL", "SELF_AUDIT"]);
}

#[tokio::test]
async fn test_from_config_lenient_skips_unknown() {
    let (recorder, _dir) = temp_recorder().await;
    let config = TomlConfig {
        analyzers: vec!["oracle-x".to_string(), "adapt".to_string()],
        ..TomlConfig::default()
    };

    let cycle = IlluminationCycle::from_config(&config, recorder).unwrap();

    assert_eq!(cycle.analyzer_names(), vec!["adapt"]);
}

#[tokio::test]
async fn test_from_config_strict_rejects_unknown() {
    let (recorder, _dir) = temp_recorder().await;
    let config = TomlConfig {
        analyzers: vec!["oracle-x".to_string(), "adapt".to_string()],
        strict: true,
        ..TomlConfig::default()
    };

    let result = IlluminationCycle::from_config(&config, recorder);

    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_from_config_only_unknown_names_is_config_error() {
    let (recorder, _dir) = temp_recorder().await;
    let config = TomlConfig {
        analyzers: vec!["oracle-x".to_string()],
        ..TomlConfig::default()
    };

    let result = IlluminationCycle::from_config(&config, recorder);

    assert!(matches!(result, Err(Error::Config(_))));
}

// =============================================================================
// Cycle outcomes
// =============================================================================

#[tokio::test]
async fn test_single_analyzer_passes() {
    let (recorder, _dir) = temp_recorder().await;
    let cycle =
        IlluminationCycle::new(vec![fixed("solo", 0.3)], AuditLayer::default(), recorder).unwrap();
    let payload = object(json!({"summary": "x", "metrics": {}}));

    let report = cycle.run_cycle(SOURCE_API, &payload).await.unwrap();

    assert_eq!(report.insights.len(), 1);
    assert!(approx_eq(report.insights[0].acuity(), 0.35));
    assert!(!report.insights[0].follow_up_question().is_empty());

    assert_eq!(report.guardrails.len(), 3);
    assert!(report
        .guardrails
        .iter()
        .all(|f| f.status == GuardrailStatus::Pass));
    assert_eq!(report.recursive.status, GuardrailStatus::Pass);
    assert_eq!(
        report.recursive.question.as_deref(),
        Some("What evidence would increase confidence in the solo view perspective?")
    );
}

#[tokio::test]
async fn test_low_acuity_goes_to_review() {
    let (recorder, _dir) = temp_recorder().await;
    let cycle = IlluminationCycle::new(
        vec![fixed("first", 0.1), fixed("second", 0.05)],
        AuditLayer::default(),
        recorder,
    )
    .unwrap();

    let report = cycle.run_cycle(SOURCE_API, &Payload::new()).await.unwrap();

    assert!(approx_eq(report.insights[0].acuity(), 0.15));
    assert!(approx_eq(report.insights[1].acuity(), 0.10));
    assert!(report
        .guardrails
        .iter()
        .all(|f| f.status == GuardrailStatus::Review));
    assert_eq!(report.recursive.status, GuardrailStatus::Review);
    // Highest acuity leads the question even when the run is under review
    assert_eq!(
        report.recursive.question.as_deref(),
        Some("What evidence would increase confidence in the first view perspective?")
    );
}

#[tokio::test]
async fn test_boost_capped_at_one() {
    let (recorder, _dir) = temp_recorder().await;
    let cycle =
        IlluminationCycle::new(vec![fixed("sure", 0.98)], AuditLayer::default(), recorder).unwrap();

    let report = cycle.run_cycle(SOURCE_API, &Payload::new()).await.unwrap();

    assert_eq!(report.insights[0].acuity(), 1.0);
}

#[tokio::test]
async fn test_reference_analyzers_in_registration_order() {
    let (recorder, _dir) = temp_recorder().await;
    let cycle = IlluminationCycle::from_config(&TomlConfig::default(), recorder).unwrap();

    let report = cycle.run_cycle(SOURCE_WORKFLOW, &Payload::new()).await.unwrap();

    let names: Vec<&str> = report.insights.iter().map(|r| r.analyzer_name()).collect();
    assert_eq!(names, vec!["dataset", "interpret", "adapt", "vulnerability"]);

    // Raw defaults 0.35 / 0.45 / 0.455 / 0.45, each boosted by 0.05
    assert!(approx_eq(report.insights[0].acuity(), 0.40));
    assert!(approx_eq(report.insights[1].acuity(), 0.50));
    assert!(approx_eq(report.insights[2].acuity(), 0.505));
    assert!(approx_eq(report.insights[3].acuity(), 0.50));

    assert_eq!(report.recursive.status, GuardrailStatus::Pass);
    assert_eq!(
        report.recursive.question.as_deref(),
        Some("What evidence would increase confidence in the iterate protocols perspective?")
    );
    assert_eq!(
        report.insights[0].follow_up_question(),
        "What new data could clarify the dataset perspective finding?"
    );
}

#[tokio::test]
async fn test_cycle_is_recorded() {
    let (recorder, _dir) = temp_recorder().await;
    let cycle = IlluminationCycle::new(
        vec![fixed("a", 0.6), fixed("b", 0.4)],
        AuditLayer::new(vec!["CDIL".to_string()]),
        recorder,
    )
    .unwrap();
    let payload = object(json!({"hypothesis": "demand shift"}));

    let report = cycle.run_cycle(SOURCE_WORKFLOW, &payload).await.unwrap();
    let runs = cycle.recorder().recent_runs(5).await.unwrap();

    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    assert_eq!(run.id, report.run_id);
    assert_eq!(run.source, "workflow");
    assert_eq!(run.guardrail_status, "pass");
    assert_eq!(run.recursive_question, report.recursive.question);
    assert_eq!(run.input_payload, json!({"hypothesis": "demand shift"}));
    assert_eq!(run.insights.len(), 2);
    assert_eq!(run.insights[0].analyzer_name, "a");
    assert_eq!(run.insights[0].summary.as_deref(), Some("a view"));
    assert_eq!(run.insights[0].detail.as_deref(), Some("fixed"));
    assert_eq!(run.guardrails.len(), 1);
}

#[tokio::test]
async fn test_no_layers_means_vacuous_pass() {
    let (recorder, _dir) = temp_recorder().await;
    let cycle =
        IlluminationCycle::new(vec![fixed("low", 0.0)], AuditLayer::new(Vec::new()), recorder)
            .unwrap();

    let report = cycle.run_cycle(SOURCE_API, &Payload::new()).await.unwrap();

    assert!(report.guardrails.is_empty());
    assert_eq!(report.recursive.status, GuardrailStatus::Pass);
}

// =============================================================================
// Faults
// =============================================================================

#[tokio::test]
async fn test_analyzer_fault_aborts_without_recording() {
    let (recorder, _dir) = temp_recorder().await;
    let cycle = IlluminationCycle::new(
        vec![fixed("ok", 0.5), Arc::new(FaultyAnalyzer)],
        AuditLayer::default(),
        recorder,
    )
    .unwrap();

    let result = cycle.run_cycle(SOURCE_API, &Payload::new()).await;

    match result {
        Err(Error::AnalyzerFault { analyzer, .. }) => assert_eq!(analyzer, "faulty"),
        other => panic!("expected analyzer fault, got {:?}", other.map(|r| r.run_id)),
    }
    assert!(cycle.recorder().recent_runs(10).await.unwrap().is_empty());
}
