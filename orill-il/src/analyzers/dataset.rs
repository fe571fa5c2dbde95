//! Dataset analyzer
//!
//! Reads `summary`, `metrics` and `timeseries` from the payload. The series may mix bare
//! numbers and `{"value": n}` objects; anything else is ignored.

use super::{array_at, into_insight, round_to, Analyzer};
use crate::types::{Insight, Payload};
use serde_json::{json, Value};

pub const NAME: &str = "dataset";

/// Outlier threshold in population standard deviations
const ANOMALY_SIGMA: f64 = 2.0;

const BASE_ACUITY: f64 = 0.3;
const MAX_ACUITY: f64 = 0.8;

pub struct DatasetAnalyzer;

impl Analyzer for DatasetAnalyzer {
    fn name(&self) -> &str {
        NAME
    }

    fn analyze(&self, payload: &Payload) -> Insight {
        let summary = match payload.get("summary") {
            Some(Value::Null) | None => json!("dataset perspective"),
            Some(value) => value.clone(),
        };

        let (metrics, coverage) = match payload.get("metrics") {
            Some(Value::Object(map)) => (Value::Object(map.clone()), map.len()),
            Some(Value::Array(items)) => (Value::Array(items.clone()), items.len()),
            _ => (json!({}), 0),
        };

        let series = extract_numeric_series(array_at(payload, "timeseries"));
        let samples = series.len();
        let anomalies = detect_anomalies(&series, ANOMALY_SIGMA);
        let trend = trend_direction(&series);
        let avg = mean(&series);

        let mut acuity = BASE_ACUITY;
        if coverage > 0 {
            acuity += (coverage as f64 * 0.05).min(0.2);
        }
        if samples >= 5 {
            acuity += (samples as f64 * 0.02).min(0.2);
        }
        if anomalies.is_empty() {
            acuity += 0.05;
        }

        into_insight(json!({
            "summary": summary,
            "trend": trend,
            "statistics": {
                "samples": samples,
                "mean": avg,
                "anomalies": anomalies,
            },
            "metrics": metrics,
            "acuity": round_to(acuity.min(MAX_ACUITY), 3),
        }))
    }
}

fn extract_numeric_series(raw: &[Value]) -> Vec<f64> {
    raw.iter()
        .filter_map(|item| match item {
            Value::Number(n) => n.as_f64(),
            Value::Object(map) => map.get("value").and_then(Value::as_f64),
            _ => None,
        })
        .filter(|v| v.is_finite())
        .collect()
}

fn mean(series: &[f64]) -> Option<f64> {
    if series.is_empty() {
        None
    } else {
        Some(series.iter().sum::<f64>() / series.len() as f64)
    }
}

/// Population standard deviation
fn pstdev(series: &[f64], avg: f64) -> f64 {
    let variance =
        series.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / series.len() as f64;
    variance.sqrt()
}

fn trend_direction(series: &[f64]) -> &'static str {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return "insufficient-data";
    };
    if series.len() < 2 {
        return "insufficient-data";
    }

    let delta = last - first;
    let threshold = (first.abs() * 0.05).max(1e-3);
    if delta > threshold {
        "upward"
    } else if delta < -threshold {
        "downward"
    } else {
        "stable"
    }
}

fn detect_anomalies(series: &[f64], sigma: f64) -> Vec<usize> {
    if series.len() < 3 {
        return Vec::new();
    }
    let Some(avg) = mean(series) else {
        return Vec::new();
    };
    let deviation = pstdev(series, avg);
    if deviation == 0.0 {
        return Vec::new();
    }

    series
        .iter()
        .enumerate()
        .filter(|(_, value)| (*value - avg).abs() > sigma * deviation)
        .map(|(idx, _)| idx)
        .collect()
}
