use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::decision::{ActionType, ProgressionDecision};

/// Persisted form of a decision; the exercise name is the map key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionRecord {
    pub current_weight: f64,
    pub recommended_weight: f64,
    pub current_reps: String,
    pub recommended_reps: String,
    pub reason: String,
    pub confidence: f64,
    pub action_type: ActionType,
}

impl From<&ProgressionDecision> for ProgressionRecord {
    fn from(decision: &ProgressionDecision) -> Self {
        Self {
            current_weight: decision.current_weight,
            recommended_weight: decision.recommended_weight,
            current_reps: decision.current_reps.clone(),
            recommended_reps: decision.recommended_reps.clone(),
            reason: decision.reason.clone(),
            confidence: decision.confidence,
            action_type: decision.action_type,
        }
    }
}

impl ProgressionRecord {
    pub fn into_decision(self, exercise_name: &str) -> ProgressionDecision {
        ProgressionDecision {
            exercise_name: exercise_name.to_string(),
            current_weight: self.current_weight,
            recommended_weight: self.recommended_weight,
            current_reps: self.current_reps,
            recommended_reps: self.recommended_reps,
            reason: self.reason,
            confidence: self.confidence,
            action_type: self.action_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub progressions: BTreeMap<String, ProgressionRecord>,
}

impl HistoryEntry {
    pub fn new(date: NaiveDate, decisions: &BTreeMap<String, ProgressionDecision>) -> Self {
        Self {
            date,
            progressions: decisions
                .iter()
                .map(|(name, decision)| (name.clone(), ProgressionRecord::from(decision)))
                .collect(),
        }
    }

    pub fn decisions(&self) -> BTreeMap<String, ProgressionDecision> {
        self.progressions
            .iter()
            .map(|(name, record)| (name.clone(), record.clone().into_decision(name)))
            .collect()
    }
}
