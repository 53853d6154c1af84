use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ExercisePerformance, WorkoutSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub index: u32,
    pub title: String,
    pub notes: Option<String>,
    pub exercise_template_id: String,
    pub superset_id: Option<u32>,
    pub rest_seconds: Option<u32>,
    pub sets: Vec<ExerciseSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub index: u32,
    #[serde(rename = "type")]
    pub set_type: String, // "warmup", "normal", "failure", "dropset"
    pub weight_kg: Option<f32>,
    pub reps: Option<u32>,
    pub distance_meters: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub rpe: Option<f32>,
    pub custom_metric: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseSetForUpdate {
    #[serde(rename = "type")]
    pub set_type: String,
    pub weight_kg: Option<f32>,
    pub reps: Option<u32>,
    pub distance_meters: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub custom_metric: Option<f32>,
    // rpe is rejected by the update endpoint
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseForUpdate {
    #[serde(skip_serializing)]
    pub title: String,
    pub exercise_template_id: String,
    pub superset_id: Option<u32>,
    pub rest_seconds: Option<u32>,
    pub notes: Option<String>,
    pub sets: Vec<ExerciseSetForUpdate>,
}

impl Exercise {
    pub fn to_update_format(&self) -> ExerciseForUpdate {
        ExerciseForUpdate {
            title: self.title.clone(),
            exercise_template_id: self.exercise_template_id.clone(),
            superset_id: self.superset_id,
            rest_seconds: self.rest_seconds,
            notes: self.notes.clone(),
            sets: self.sets.iter().map(|set| set.to_update_format()).collect(),
        }
    }

    pub fn working_sets(&self) -> impl Iterator<Item = &ExerciseSet> {
        self.sets.iter().filter(|set| set.is_working())
    }

    /// Logged working sets as one session of this exercise. Sets without a
    /// rep count were not performed; a missing weight is bodyweight.
    pub fn to_performance(&self, date: NaiveDate, workout_type: &str) -> ExercisePerformance {
        let sets = self
            .working_sets()
            .map(|set| {
                let reps = set.reps.unwrap_or(0);
                WorkoutSet {
                    weight: f64::from(set.weight_kg.unwrap_or(0.0).max(0.0)),
                    reps,
                    rpe: set
                        .rpe
                        .filter(|rpe| (1.0..=10.0).contains(rpe))
                        .map(|rpe| rpe.round() as u8),
                    completed: reps > 0,
                }
            })
            .collect();

        ExercisePerformance::new(self.title.clone(), date, workout_type, sets)
    }
}

impl ExerciseSet {
    pub fn is_working(&self) -> bool {
        !self.set_type.eq_ignore_ascii_case("warmup")
    }

    pub fn to_update_format(&self) -> ExerciseSetForUpdate {
        ExerciseSetForUpdate {
            set_type: self.set_type.clone(),
            weight_kg: self.weight_kg,
            reps: self.reps,
            distance_meters: self.distance_meters,
            duration_seconds: self.duration_seconds,
            custom_metric: self.custom_metric,
        }
    }
}

impl ExerciseSetForUpdate {
    pub fn is_working(&self) -> bool {
        !self.set_type.eq_ignore_ascii_case("warmup")
    }
}
