use serde::{Deserialize, Serialize};

use crate::clients::models::common::Exercise;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutResponse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub routine_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub updated_at: String,
    pub created_at: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutResponse {
    pub fn routine_id(&self) -> Option<&str> {
        self.routine_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != "null")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineResponse {
    pub id: String,
    pub title: String,
    pub folder_id: Option<serde_json::Value>,
    pub updated_at: String,
    pub created_at: String,
    pub exercises: Vec<Exercise>,
}

// Single routine envelope used by GET /v1/routines/{id}
#[derive(Debug, Deserialize)]
pub struct RoutineApiResponse {
    pub routine: RoutineResponse,
}

// Update routine envelope returned by PUT /v1/routines/{id} (array)
#[derive(Debug, Deserialize)]
pub struct RoutineUpdateApiResponse {
    pub routine: Vec<RoutineResponse>,
}

// Workouts list response from GET /v1/workouts
#[derive(Debug, Deserialize)]
pub struct WorkoutsListResponse {
    pub page: i32,
    pub page_count: i32,
    pub workouts: Vec<WorkoutResponse>,
}
