use anyhow::Context;
use std::env;
use std::path::PathBuf;

use crate::services::progression::ProgressionStrategy;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: String,
    pub api_token: String,
    pub history_path: PathBuf,
    pub default_strategy: ProgressionStrategy,
    pub hevy: Option<HevyConfig>,
}

/// Present only when `HEVY_API_KEY` is set.
#[derive(Debug, Clone)]
pub struct HevyConfig {
    pub api_key: String,
    pub api_url: String,
    pub client_id: String,
    pub webhook_token: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key).with_context(|| format!("missing environment variable {}", key))
        };

        let port = required("PORT")?;
        let api_token = required("API_TOKEN")?;
        let history_path = lookup("HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("progression_history.json"));
        let default_strategy = match lookup("DEFAULT_STRATEGY") {
            Some(value) => value.parse().map_err(anyhow::Error::msg)?,
            None => ProgressionStrategy::default(),
        };

        let hevy = match lookup("HEVY_API_KEY") {
            Some(api_key) => Some(HevyConfig {
                api_key,
                api_url: lookup("HEVY_API_URL")
                    .unwrap_or_else(|| "https://api.hevyapp.com".to_string()),
                client_id: lookup("HEVY_CLIENT_ID").unwrap_or_else(|| "hevy".to_string()),
                webhook_token: required("WEBHOOK_TOKEN")?,
            }),
            None => None,
        };

        Ok(Self {
            port,
            api_token,
            history_path,
            default_strategy,
            hevy,
        })
    }
}
