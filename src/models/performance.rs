use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One performed attempt at an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpe: Option<u8>,
    pub completed: bool,
}

impl WorkoutSet {
    pub fn new(weight: f64, reps: u32, completed: bool) -> Self {
        Self {
            weight,
            reps,
            rpe: None,
            completed,
        }
    }

    /// Failed attempts and bodyweight entries stay on record but are left
    /// out of trend statistics.
    pub fn counts_toward_stats(&self) -> bool {
        self.reps > 0 && self.weight > 0.0
    }

    pub fn load(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// All sets of one exercise within one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePerformance {
    pub exercise_name: String,
    pub sets: Vec<WorkoutSet>,
    pub date: NaiveDate,
    #[serde(default)]
    pub workout_type: String,
}

impl ExercisePerformance {
    pub fn new(
        exercise_name: impl Into<String>,
        date: NaiveDate,
        workout_type: impl Into<String>,
        sets: Vec<WorkoutSet>,
    ) -> Self {
        Self {
            exercise_name: exercise_name.into(),
            sets,
            date,
            workout_type: workout_type.into(),
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.sets
            .iter()
            .filter(|set| set.completed)
            .map(WorkoutSet::load)
            .sum()
    }

    pub fn completed_sets(&self) -> impl Iterator<Item = &WorkoutSet> {
        self.sets.iter().filter(|set| set.completed)
    }

    /// Mean weight over sets that count toward statistics.
    pub fn mean_weight(&self) -> Option<f64> {
        let weights: Vec<f64> = self
            .sets
            .iter()
            .filter(|set| set.counts_toward_stats())
            .map(|set| set.weight)
            .collect();

        if weights.is_empty() {
            None
        } else {
            Some(weights.iter().sum::<f64>() / weights.len() as f64)
        }
    }

    /// Heaviest completed set, used as the session's working weight.
    pub fn working_weight(&self) -> f64 {
        self.completed_sets()
            .map(|set| set.weight)
            .fold(0.0, f64::max)
    }
}
