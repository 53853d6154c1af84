//! Validation of raw workout records into the performance model.
//!
//! Malformed sets or sessions are dropped with a warning; the rest of the
//! exercise is still analysed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{ExercisePerformance, WorkoutSet};

/// Anything above this is a logging mistake, not a set.
const MAX_REPS: f64 = 1000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub exercise_name: String,
    pub date: String,
    #[serde(default)]
    pub workout_type: Option<String>,
    #[serde(default)]
    pub sets: Vec<SetRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRecord {
    #[serde(default)]
    pub weight: Value,
    #[serde(default)]
    pub reps: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

pub fn ingest(records: &[PerformanceRecord]) -> Vec<ExercisePerformance> {
    records
        .iter()
        .filter_map(|record| match to_performance(record) {
            Ok(performance) => Some(performance),
            Err(e) => {
                warn!(
                    error = %e,
                    exercise = %record.exercise_name,
                    date = %record.date,
                    "ingest.performance_skipped"
                );
                None
            }
        })
        .collect()
}

fn to_performance(record: &PerformanceRecord) -> EngineResult<ExercisePerformance> {
    if record.exercise_name.trim().is_empty() {
        return Err(EngineError::MalformedRecord("missing exercise name".to_string()));
    }

    let date = parse_date(&record.date)?;

    let sets = record
        .sets
        .iter()
        .enumerate()
        .filter_map(|(index, set)| match to_set(set) {
            Ok(set) => Some(set),
            Err(e) => {
                warn!(
                    error = %e,
                    exercise = %record.exercise_name,
                    set_index = index + 1,
                    "ingest.set_skipped"
                );
                None
            }
        })
        .collect();

    Ok(ExercisePerformance::new(
        record.exercise_name.clone(),
        date,
        record.workout_type.clone().unwrap_or_default(),
        sets,
    ))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the date.
pub fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| EngineError::MalformedRecord(format!("unparseable date '{}'", value)))
}

fn to_set(record: &SetRecord) -> EngineResult<WorkoutSet> {
    let weight = numeric(&record.weight)
        .filter(|weight| weight.is_finite() && *weight >= 0.0)
        .ok_or_else(|| EngineError::MalformedRecord(format!("invalid weight {}", record.weight)))?;

    let reps = numeric(&record.reps)
        .filter(|reps| *reps >= 0.0 && reps.fract() == 0.0 && *reps <= MAX_REPS)
        .map(|reps| reps as u32)
        .ok_or_else(|| EngineError::MalformedRecord(format!("invalid reps {}", record.reps)))?;

    let rpe = match &record.rpe {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            numeric(value)
                .filter(|rpe| (1.0..=10.0).contains(rpe))
                .map(|rpe| rpe.round() as u8)
                .ok_or_else(|| EngineError::MalformedRecord(format!("invalid rpe {}", value)))?,
        ),
    };

    Ok(WorkoutSet {
        weight,
        reps,
        rpe,
        completed: record.completed.unwrap_or(reps > 0),
    })
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Group by exact exercise name, each history sorted ascending by date.
pub fn group_by_exercise(
    performances: Vec<ExercisePerformance>,
) -> BTreeMap<String, Vec<ExercisePerformance>> {
    let mut grouped: BTreeMap<String, Vec<ExercisePerformance>> = BTreeMap::new();
    for performance in performances {
        grouped
            .entry(performance.exercise_name.clone())
            .or_default()
            .push(performance);
    }

    for history in grouped.values_mut() {
        history.sort_by_key(|performance| performance.date);
    }

    grouped
}
