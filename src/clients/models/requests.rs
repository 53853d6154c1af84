use serde::Serialize;

use crate::clients::models::common::ExerciseForUpdate;

#[derive(Debug, Serialize)]
pub struct RoutineUpdate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub exercises: Vec<ExerciseForUpdate>,
}

#[derive(Debug, Serialize)]
pub struct UpdateRoutineRequest {
    pub routine: RoutineUpdate,
}
