use axum::Json;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::api::{AppState, authenticate_request};
use crate::clients::hevy::HevyClient;
use crate::clients::models::requests::RoutineUpdate;
use crate::clients::models::responses::WorkoutResponse;
use crate::config::HevyConfig;
use crate::models::ExercisePerformance;
use crate::services::{ingest, routine_update};

const RECENT_WORKOUTS_PAGE_SIZE: i32 = 10;

#[derive(Deserialize)]
pub struct WebhookPayload {
    pub payload: WorkoutIdPayload,
}

#[derive(Deserialize)]
pub struct WorkoutIdPayload {
    #[serde(rename = "workoutId")]
    pub workout_id: String,
}

pub async fn handle_workout_completion(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<WebhookPayload>,
) -> impl IntoResponse {
    let (Some(hevy), Some(_)) = (state.config.hevy.as_ref(), state.hevy_client.as_ref()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if let Err(response) = authenticate_request(&headers, &hevy.webhook_token) {
        return response.into_response();
    }

    let workout_id = payload.payload.workout_id.clone();
    let state_for_task = state.clone();

    tracing::info!(%workout_id, "webhook.received");

    // Hevy retries deliveries not acknowledged within 5 seconds.
    tokio::spawn(async move {
        process_single_workout(&state_for_task, workout_id).await;
    });

    StatusCode::OK.into_response()
}

pub async fn process_single_workout(state: &AppState, workout_id: String) {
    let (Some(hevy), Some(client)) = (state.config.hevy.as_ref(), state.hevy_client.as_ref())
    else {
        return;
    };

    if !claim_workout(&state.processed_workout_ids, &workout_id) {
        tracing::debug!(%workout_id, "workout.already_processed");
        return;
    }

    tracing::info!(%workout_id, "workout.processing");

    if let Err(e) = sync_workout(state, hevy, client, &workout_id).await {
        tracing::error!(error = %e, %workout_id, "failed to process workout");
        release_workout(&state.processed_workout_ids, &workout_id);
    }
}

async fn sync_workout(
    state: &AppState,
    hevy: &HevyConfig,
    client: &HevyClient,
    workout_id: &str,
) -> anyhow::Result<()> {
    let workout = client.get_workout(workout_id).await?;
    tracing::info!(workout_title = %workout.title, "workout.retrieved");

    let Some(routine_id) = workout.routine_id().map(str::to_string) else {
        tracing::info!("workout.no_routine_associated");
        return Ok(());
    };

    let routine = client.get_routine(&routine_id).await?;
    let recent = client.get_workouts(1, RECENT_WORKOUTS_PAGE_SIZE).await?.workouts;

    let mut workouts: Vec<WorkoutResponse> = recent
        .into_iter()
        .filter(|w| w.routine_id() == Some(routine_id.as_str()) && w.id != workout.id)
        .collect();
    workouts.push(workout.clone());

    let performances = workouts_to_performances(&workouts);
    let targets = routine_update::routine_targets(&routine);
    let date = ingest::parse_date(&workout.start_time).ok();

    let analysis = state
        .progression_service
        .analyze_and_record(
            &hevy.client_id,
            &workout.title,
            state.config.default_strategy,
            performances,
            targets,
            date,
        )
        .await?;

    tracing::info!(
        workout_id = %workout.id,
        routine_id = %routine_id,
        exercise_count = analysis.progressions.len(),
        "progressive_overload.processed"
    );

    if analysis.progressions.is_empty() {
        tracing::warn!(routine_id = %routine_id, "progressive_overload.no_decisions");
        return Ok(());
    }

    let exercises = routine_update::apply_decisions(&routine, &analysis.progressions);
    client
        .update_routine(
            &routine_id,
            RoutineUpdate {
                title: routine.title.clone(),
                notes: None,
                exercises,
            },
        )
        .await?;

    tracing::info!(
        routine_id = %routine_id,
        decision_count = analysis.progressions.len(),
        "routine.update_success"
    );
    Ok(())
}

fn workouts_to_performances(workouts: &[WorkoutResponse]) -> Vec<ExercisePerformance> {
    workouts
        .iter()
        .filter_map(|workout| match ingest::parse_date(&workout.start_time) {
            Ok(date) => Some((workout, date)),
            Err(e) => {
                tracing::warn!(error = %e, workout_id = %workout.id, "ingest.workout_skipped");
                None
            }
        })
        .flat_map(|(workout, date)| {
            workout
                .exercises
                .iter()
                .map(move |exercise| exercise.to_performance(date, &workout.title))
        })
        .collect()
}

/// Marks the workout as taken; false when another delivery already has it.
fn claim_workout(processed: &Mutex<HashSet<String>>, workout_id: &str) -> bool {
    match processed.lock() {
        Ok(mut processed) => processed.insert(workout_id.to_string()),
        Err(_) => false,
    }
}

/// Lets a later delivery retry a workout whose processing failed.
fn release_workout(processed: &Mutex<HashSet<String>>, workout_id: &str) {
    if let Ok(mut processed) = processed.lock() {
        processed.remove(workout_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::models::common::tests::{exercise, set};

    fn workout(id: &str, start_time: &str, reps: u32) -> WorkoutResponse {
        WorkoutResponse {
            id: id.to_string(),
            title: "Day 1 - Week 2".to_string(),
            routine_id: Some("routine-1".to_string()),
            description: None,
            start_time: start_time.to_string(),
            end_time: start_time.to_string(),
            updated_at: start_time.to_string(),
            created_at: start_time.to_string(),
            exercises: vec![exercise(
                "Squat (Barbell)",
                None,
                vec![
                    set(0, "warmup", Some(60.0), Some(10)),
                    set(1, "normal", Some(100.0), Some(reps)),
                ],
            )],
        }
    }

    #[test]
    fn test_workouts_to_performances() {
        let workouts = vec![
            workout("w1", "2024-10-01T18:00:00+00:00", 8),
            workout("w2", "not a time", 9),
            workout("w3", "2024-10-04T18:00:00+00:00", 10),
        ];

        let performances = workouts_to_performances(&workouts);
        assert_eq!(performances.len(), 2);
        assert_eq!(performances[1].sets, vec![crate::models::WorkoutSet::new(100.0, 10, true)]);
        assert_eq!(performances[0].workout_type, "Day 1 - Week 2");
    }

    #[test]
    fn test_workout_is_claimed_once_until_released() {
        let processed = Mutex::new(HashSet::new());

        assert!(claim_workout(&processed, "w1"));
        assert!(!claim_workout(&processed, "w1"));
        assert!(claim_workout(&processed, "w2"));

        release_workout(&processed, "w1");
        assert!(claim_workout(&processed, "w1"));
    }

    #[test]
    fn test_routine_id_filters_placeholder_values() {
        let mut w = workout("w1", "2024-10-01T18:00:00+00:00", 8);
        assert_eq!(w.routine_id(), Some("routine-1"));
        w.routine_id = Some("null".to_string());
        assert_eq!(w.routine_id(), None);
        w.routine_id = None;
        assert_eq!(w.routine_id(), None);
    }
}
