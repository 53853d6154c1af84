use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::api::AppState;
use crate::clients::hevy::HevyClient;
use crate::config::Config;
use crate::services::progressive_overload::ProgressionService;
use crate::store::history::HistoryStore;

mod api;
mod clients;
mod config;
mod error;
mod models;
mod services;
mod store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let history = HistoryStore::open(&config.history_path).await?;
    let progression_service = ProgressionService::new(Arc::new(history));

    let hevy_client = config.hevy.as_ref().map(HevyClient::new).transpose()?;
    if hevy_client.is_none() {
        tracing::info!("hevy.disabled");
    }

    let state = AppState {
        config: config.clone(),
        progression_service,
        hevy_client,
        processed_workout_ids: Arc::new(Mutex::new(HashSet::new())),
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(
        port = %config.port,
        strategy = %config.default_strategy,
        history = %config.history_path.display(),
        "server.listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
