// Client for a running huddle-server. Speaks the same seams as the direct
// clients so the app does not care which one it was given.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use huddle_core::config::Config;
use huddle_football::stats::{GameLog, PlayerStatReport};

use crate::error::{ApiError, Result};
use crate::http;
use crate::source::{LeagueEndpoint, LeagueSource, PlayerLookup, StatsSource};
use crate::wire::{GameLogsEnvelope, StatsEnvelope};

pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http::build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.client.proxy_url.clone(),
            Duration::from_secs(config.client.request_timeout_secs),
        )
    }

    /// URL for a per-player stats route, e.g. `player/stats`.
    pub fn player_url(&self, route: &str, player_id: &str) -> String {
        http::join(&self.base_url, &format!("/{route}/{player_id}"))
    }

    async fn player_route(&self, route: &str, lookup: &PlayerLookup, season: u16) -> Result<Value> {
        let url = self.player_url(route, &lookup.player_id);
        let mut query = vec![("season", season.to_string())];
        if let Some(name) = &lookup.name {
            query.push(("name", name.clone()));
        }
        if let Some(team) = &lookup.team {
            query.push(("team", team.clone()));
        }
        http::get_json(self.http.get(&url).query(&query), &url).await
    }
}

#[async_trait]
impl LeagueSource for ProxyClient {
    async fn fetch(&self, endpoint: &LeagueEndpoint) -> Result<Value> {
        let url = http::join(&self.base_url, &endpoint.proxy_path());
        http::get_json(self.http.get(&url), &url).await
    }
}

#[async_trait]
impl StatsSource for ProxyClient {
    async fn season_stats(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport> {
        let value = self.player_route("player/stats", lookup, season).await?;
        let envelope: StatsEnvelope =
            serde_json::from_value(value).map_err(|source| ApiError::Decode {
                url: self.player_url("player/stats", &lookup.player_id),
                source,
            })?;
        Ok(PlayerStatReport {
            season: envelope.season,
            matched: envelope.matched,
            season_line: envelope.season_stats,
            game_logs: Vec::new(),
        })
    }

    async fn game_logs(&self, lookup: &PlayerLookup, season: u16) -> Result<Vec<GameLog>> {
        let value = self.player_route("player/gamelogs", lookup, season).await?;
        let envelope: GameLogsEnvelope =
            serde_json::from_value(value).map_err(|source| ApiError::Decode {
                url: self.player_url("player/gamelogs", &lookup.player_id),
                source,
            })?;
        Ok(envelope.game_logs)
    }
}
