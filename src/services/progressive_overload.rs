use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{ExercisePerformance, ProgressionDecision};
use crate::services::ingest::{self, PerformanceRecord};
use crate::services::progression::ProgressionStrategy;
use crate::services::report;
use crate::services::trend::TrendSummary;
use crate::store::history::HistoryStore;

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub strategy: ProgressionStrategy,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Last known rep target per exercise, as a bare count or goals string.
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
    pub performances: Vec<PerformanceRecord>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub client_id: String,
    pub date: NaiveDate,
    pub strategy: ProgressionStrategy,
    pub progressions: BTreeMap<String, ProgressionDecision>,
    pub trends: BTreeMap<String, TrendSummary>,
    pub report: String,
}

#[derive(Debug, Default)]
pub struct ExerciseAnalyses {
    pub decisions: BTreeMap<String, ProgressionDecision>,
    pub trends: BTreeMap<String, TrendSummary>,
}

#[derive(Clone)]
pub struct ProgressionService {
    history: Arc<HistoryStore>,
}

impl ProgressionService {
    pub fn new(history: Arc<HistoryStore>) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub async fn process_request(
        &self,
        client_id: &str,
        request: AnalysisRequest,
    ) -> EngineResult<AnalysisResponse> {
        let performances = ingest::ingest(&request.performances);

        debug!(
            client_id,
            records = request.performances.len(),
            accepted = performances.len(),
            "analysis.ingested"
        );

        self.analyze_and_record(
            client_id,
            request.client_name.as_deref().unwrap_or(client_id),
            request.strategy,
            performances,
            request.targets,
            request.date,
        )
        .await
    }

    /// Analyse every exercise, append the decisions to the client's history
    /// and render the report.
    pub async fn analyze_and_record(
        &self,
        client_id: &str,
        client_name: &str,
        strategy: ProgressionStrategy,
        performances: Vec<ExercisePerformance>,
        mut targets: BTreeMap<String, String>,
        date: Option<NaiveDate>,
    ) -> EngineResult<AnalysisResponse> {
        let date = date
            .or_else(|| performances.iter().map(|p| p.date).max())
            .unwrap_or_else(|| chrono::Utc::now().date_naive());

        match self.history.latest(client_id).await {
            Ok(entry) => {
                for (exercise, record) in entry.progressions {
                    targets.entry(exercise).or_insert(record.recommended_reps);
                }
            }
            Err(EngineError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let analyses = analyze_exercises(strategy, performances, &targets).await;

        if analyses.decisions.is_empty() {
            warn!(client_id, "analysis.no_valid_performances");
        } else {
            self.history
                .append(client_id, date, &analyses.decisions)
                .await?;
        }

        let report = report::render_with_trends(client_name, &analyses.decisions, &analyses.trends);

        info!(
            client_id,
            %strategy,
            %date,
            exercises = analyses.decisions.len(),
            "analysis.completed"
        );

        Ok(AnalysisResponse {
            client_id: client_id.to_string(),
            date,
            strategy,
            progressions: analyses.decisions,
            trends: analyses.trends,
            report,
        })
    }
}

/// Run `strategy` over each exercise in parallel. Exercises without enough
/// data get a neutral hold instead of an error.
pub async fn analyze_exercises(
    strategy: ProgressionStrategy,
    performances: Vec<ExercisePerformance>,
    targets: &BTreeMap<String, String>,
) -> ExerciseAnalyses {
    let mut tasks = JoinSet::new();

    for (exercise_name, history) in ingest::group_by_exercise(performances) {
        let target = targets.get(&exercise_name).cloned();
        tasks.spawn_blocking(move || {
            let trend = TrendSummary::from_history(&history);
            let decision = strategy
                .decide(&exercise_name, &history, target.as_deref())
                .unwrap_or_else(|e| hold_on_error(&exercise_name, &history, target, e));
            (exercise_name, decision, trend)
        });
    }

    let mut analyses = ExerciseAnalyses::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((exercise_name, decision, trend)) => {
                analyses.trends.insert(exercise_name.clone(), trend);
                analyses.decisions.insert(exercise_name, decision);
            }
            Err(e) => error!(error = %e, "analysis.exercise_task_failed"),
        }
    }

    analyses
}

fn hold_on_error(
    exercise_name: &str,
    history: &[ExercisePerformance],
    target: Option<String>,
    error: EngineError,
) -> ProgressionDecision {
    debug!(exercise = exercise_name, error = %error, "analysis.neutral_hold");

    let weight = history
        .last()
        .map(ExercisePerformance::working_weight)
        .unwrap_or_default();
    ProgressionDecision::hold(
        exercise_name,
        weight,
        target.unwrap_or_default(),
        error.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionType, WorkoutSet};
    use serde_json::json;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn session(name: &str, d: u32, sets: &[(f64, u32)]) -> ExercisePerformance {
        ExercisePerformance::new(
            name,
            day(d),
            "Upper",
            sets.iter()
                .map(|&(weight, reps)| WorkoutSet::new(weight, reps, true))
                .collect(),
        )
    }

    async fn service() -> (tempfile::TempDir, ProgressionService) {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::open(dir.path().join("history.json"))
            .await
            .unwrap();
        (dir, ProgressionService::new(Arc::new(store)))
    }

    #[tokio::test]
    async fn test_analyze_exercises_covers_every_exercise() {
        let performances = vec![
            session("Bench Press", 1, &[(80.0, 8), (80.0, 8)]),
            session("Bench Press", 4, &[(80.0, 10), (80.0, 10)]),
            session("Lat Pulldown", 4, &[(50.0, 5), (50.0, 4)]),
            session("Face Pull", 4, &[]),
        ];
        let targets = BTreeMap::from([
            ("Bench Press".to_string(), "10".to_string()),
            ("Lat Pulldown".to_string(), "8".to_string()),
        ]);

        let analyses =
            analyze_exercises(ProgressionStrategy::WholeExercise, performances, &targets).await;

        assert_eq!(analyses.decisions.len(), 3);
        assert_eq!(
            analyses.decisions["Bench Press"].action_type,
            ActionType::IncreaseReps
        );
        assert_eq!(analyses.decisions["Bench Press"].recommended_reps, "12");
        assert_eq!(
            analyses.decisions["Lat Pulldown"].action_type,
            ActionType::Maintain
        );
        assert_eq!(analyses.trends["Bench Press"].sessions, 2);

        let face_pull = &analyses.decisions["Face Pull"];
        assert_eq!(face_pull.action_type, ActionType::Maintain);
        assert_eq!(face_pull.confidence, 0.5);
        assert!(face_pull.reason.starts_with("insufficient data"));
    }

    #[tokio::test]
    async fn test_process_request_records_history_and_reuses_targets() {
        let (_dir, service) = service().await;

        let first: AnalysisRequest = serde_json::from_value(json!({
            "client_name": "Alice",
            "strategy": "whole_exercise",
            "targets": {"Squat": "8"},
            "performances": [
                {"exercise_name": "Squat", "date": "2024-08-01",
                 "sets": [{"weight": 100, "reps": 8}, {"weight": 100, "reps": 8}]}
            ]
        }))
        .unwrap();

        let response = service.process_request("alice", first).await.unwrap();
        assert_eq!(response.date, day(1));
        assert_eq!(response.progressions["Squat"].recommended_reps, "10");
        assert!(response.report.starts_with("Progression report for Alice"));

        let second: AnalysisRequest = serde_json::from_value(json!({
            "strategy": "whole_exercise",
            "performances": [
                {"exercise_name": "Squat", "date": "2024-08-05",
                 "sets": [{"weight": 100, "reps": 10}, {"weight": 100, "reps": 10}]}
            ]
        }))
        .unwrap();

        let response = service.process_request("alice", second).await.unwrap();
        let squat = &response.progressions["Squat"];
        assert_eq!(squat.current_reps, "10");
        assert_eq!(squat.recommended_reps, "12");
        assert_eq!(squat.confidence, 0.9);

        let latest = service.history().latest("alice").await.unwrap();
        assert_eq!(latest.date, day(5));
        assert_eq!(service.history().entries("alice").await.len(), 2);
    }

    #[tokio::test]
    async fn test_set_by_set_is_default_strategy() {
        let (_dir, service) = service().await;

        let request: AnalysisRequest = serde_json::from_value(json!({
            "date": "2024-08-09",
            "performances": [
                {"exercise_name": "Dumbbell Row", "date": "2024-08-08",
                 "sets": [{"weight": 30, "reps": 15}, {"weight": 30, "reps": 12}]}
            ]
        }))
        .unwrap();

        let response = service.process_request("bob", request).await.unwrap();
        assert_eq!(response.strategy, ProgressionStrategy::SetBySet);
        assert_eq!(response.date, day(9));
        assert_eq!(
            response.progressions["Dumbbell Row"].recommended_reps,
            "S1: 32.5kg*6 | S2: 30kg*15"
        );
    }

    #[tokio::test]
    async fn test_request_without_valid_performances_records_nothing() {
        let (_dir, service) = service().await;

        let request: AnalysisRequest = serde_json::from_value(json!({
            "client_name": "Carol",
            "performances": [{"exercise_name": "Squat", "date": "someday", "sets": []}]
        }))
        .unwrap();

        let response = service.process_request("carol", request).await.unwrap();
        assert!(response.progressions.is_empty());
        assert!(response.report.contains("No exercises analysed."));
        assert!(service.history().entries("carol").await.is_empty());
    }
}
