use crate::clients::models::requests::{RoutineUpdate, UpdateRoutineRequest};
use crate::clients::models::responses::{
    RoutineApiResponse, RoutineResponse, RoutineUpdateApiResponse, WorkoutResponse,
    WorkoutsListResponse,
};
use crate::config::HevyConfig;
use anyhow::Result;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

const WORKOUTS_ENDPOINT: &str = "/v1/workouts/";
const ROUTINES_ENDPOINT: &str = "/v1/routines/";

/// Hevy REST client: the workout-data source and the place decisions are
/// written back to.
#[derive(Clone)]
pub struct HevyClient {
    http: Client,
    base: Url,
    api_key: String,
}

impl HevyClient {
    pub fn new(config: &HevyConfig) -> Result<Self> {
        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base: Url::parse(&config.api_url)?,
            api_key: config.api_key.clone(),
        })
    }

    pub async fn get_workout(&self, workout_id: &str) -> Result<WorkoutResponse> {
        let url = self
            .base
            .join(&format!("{}{}", WORKOUTS_ENDPOINT, workout_id))?;

        self.send(self.http.get(url), "workout").await
    }

    pub async fn get_workouts(&self, page: i32, page_size: i32) -> Result<WorkoutsListResponse> {
        let mut url = self.base.join("/v1/workouts")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("pageSize", &page_size.to_string());

        self.send(self.http.get(url), "workouts list").await
    }

    pub async fn get_routine(&self, routine_id: &str) -> Result<RoutineResponse> {
        let url = self
            .base
            .join(&format!("{}{}", ROUTINES_ENDPOINT, routine_id))?;

        let api_response: RoutineApiResponse = self.send(self.http.get(url), "routine").await?;
        Ok(api_response.routine)
    }

    pub async fn update_routine(
        &self,
        routine_id: &str,
        request: RoutineUpdate,
    ) -> Result<RoutineResponse> {
        let url = self
            .base
            .join(&format!("{}{}", ROUTINES_ENDPOINT, routine_id))?;

        let api_request = UpdateRoutineRequest { routine: request };
        let json_body = serde_json::to_string(&api_request)?;

        tracing::debug!(
            routine_id = %routine_id,
            request_body = %json_body,
            "hevy.update_routine.request"
        );

        let request = self
            .http
            .put(url)
            .header("Content-Type", "application/json")
            .body(json_body);

        let api_response: RoutineUpdateApiResponse = self.send(request, "routine update").await?;
        api_response
            .routine
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("API returned empty routine array"))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request.header("api-key", &self.api_key).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                body
            ));
        }

        tracing::debug!(%status, what, bytes = body.len(), "hevy.response");

        serde_json::from_str(&body)
            .map_err(|e| anyhow::anyhow!("Failed to parse {} response: {}", what, e))
    }
}
