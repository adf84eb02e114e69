// Direct client for the Sleeper v1 REST API. No authentication.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use huddle_core::config::Config;

use crate::error::Result;
use crate::http;
use crate::source::{LeagueEndpoint, LeagueSource};

pub struct SleeperClient {
    http: reqwest::Client,
    base_url: String,
}

impl SleeperClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http::build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.sleeper.base_url.clone(),
            Duration::from_secs(config.client.request_timeout_secs),
        )
    }

    pub fn url_for(&self, endpoint: &LeagueEndpoint) -> String {
        http::join(&self.base_url, &endpoint.sleeper_path())
    }
}

#[async_trait]
impl LeagueSource for SleeperClient {
    async fn fetch(&self, endpoint: &LeagueEndpoint) -> Result<Value> {
        let url = self.url_for(endpoint);
        http::get_json(self.http.get(&url), &url).await
    }
}
