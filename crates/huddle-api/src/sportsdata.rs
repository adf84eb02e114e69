// SportsData.io NFL stats client and the name/team matching that ties its
// players to league-host players.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use huddle_core::config::Config;
use huddle_football::stats::{GameLog, MatchedPlayer, PlayerStatReport, StatLine};

use crate::error::{ApiError, Result};
use crate::http;
use crate::source::{PlayerLookup, StatsSource};
use crate::wire::{self, SdPlayer};

const API_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Pick the stats-provider player for `name` (and optionally `team`).
///
/// Candidates are the first `limit` players whose "First Last" contains
/// `name`, case-insensitively. With more than one candidate and a known team,
/// the first candidate whose team contains or is contained in it wins;
/// otherwise the first candidate.
pub fn match_player<'a>(
    players: &'a [SdPlayer],
    name: &str,
    team: Option<&str>,
    limit: usize,
) -> Option<&'a SdPlayer> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let candidates: Vec<&SdPlayer> = players
        .iter()
        .filter(|p| p.player_id.is_some())
        .filter(|p| p.full_name().to_lowercase().contains(&needle))
        .take(limit)
        .collect();

    if candidates.len() > 1 {
        if let Some(team) = team.map(str::to_uppercase) {
            let by_team = candidates.iter().find(|p| {
                p.team.as_deref().is_some_and(|t| {
                    let t = t.to_uppercase();
                    t.contains(&team) || team.contains(&t)
                })
            });
            if let Some(found) = by_team {
                return Some(*found);
            }
        }
    }
    candidates.first().copied()
}

// ---------------------------------------------------------------------------
// SportsDataClient
// ---------------------------------------------------------------------------

pub struct SportsDataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    search_limit: usize,
}

impl SportsDataClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        search_limit: usize,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            http: http::build_client(timeout)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            search_limit,
        })
    }

    async fn get(&self, path: &str) -> Result<serde_json::Value> {
        let url = http::join(&self.base_url, path);
        let request = self.http.get(&url).header(API_KEY_HEADER, &self.api_key);
        http::get_json(request, &url).await
    }

    async fn all_players(&self) -> Result<Vec<SdPlayer>> {
        let value = self.get("/Players").await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(|source| ApiError::Decode {
            url: "/Players".to_string(),
            source,
        })
    }

    /// Match a league-host player against the provider's player list.
    pub async fn find_player(&self, lookup: &PlayerLookup) -> Result<Option<MatchedPlayer>> {
        let Some(name) = lookup.name.as_deref() else {
            debug!(player_id = %lookup.player_id, "no name to match on");
            return Ok(None);
        };
        let players = self.all_players().await?;
        let matched = match_player(&players, name, lookup.team.as_deref(), self.search_limit)
            .and_then(SdPlayer::to_matched);
        match &matched {
            Some(m) => info!(
                player_id = %lookup.player_id,
                stats_id = m.stats_player_id,
                "matched {name} to {}",
                m.name
            ),
            None => info!(player_id = %lookup.player_id, "no stats match for {name}"),
        }
        Ok(matched)
    }

    pub async fn season_line_by_id(&self, stats_id: i64, season: u16) -> Result<Option<StatLine>> {
        let path = format!("/PlayerSeasonStatsByPlayerID/{season}/{stats_id}");
        let value = self.get(&path).await?;
        wire::season_line(value).map_err(|source| ApiError::Decode { url: path, source })
    }

    pub async fn game_logs_by_id(&self, stats_id: i64, season: u16) -> Result<Vec<GameLog>> {
        let path = format!("/PlayerGameStatsByPlayerID/{season}/{stats_id}");
        let value = self.get(&path).await?;
        wire::game_logs(value).map_err(|source| ApiError::Decode { url: path, source })
    }
}

#[async_trait]
impl StatsSource for SportsDataClient {
    async fn season_stats(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport> {
        let matched = self.find_player(lookup).await?;
        let season_line = match &matched {
            Some(m) => self.season_line_by_id(m.stats_player_id, season).await?,
            None => None,
        };
        Ok(PlayerStatReport {
            season,
            matched,
            season_line,
            game_logs: Vec::new(),
        })
    }

    async fn game_logs(&self, lookup: &PlayerLookup, season: u16) -> Result<Vec<GameLog>> {
        match self.find_player(lookup).await? {
            Some(m) => self.game_logs_by_id(m.stats_player_id, season).await,
            None => Ok(Vec::new()),
        }
    }

    /// Matches once and reuses the id for both fetches. A failed game-log
    /// fetch keeps the season line.
    async fn report(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport> {
        let Some(matched) = self.find_player(lookup).await? else {
            return Ok(PlayerStatReport {
                season,
                ..PlayerStatReport::default()
            });
        };
        let season_line = self.season_line_by_id(matched.stats_player_id, season).await?;
        let game_logs = match self.game_logs_by_id(matched.stats_player_id, season).await {
            Ok(logs) => logs,
            Err(e) => {
                warn!("game logs unavailable for {}: {e}", matched.name);
                Vec::new()
            }
        };
        Ok(PlayerStatReport {
            season,
            matched: Some(matched),
            season_line,
            game_logs,
        })
    }
}

// ---------------------------------------------------------------------------
// StatsClient wrapper
// ---------------------------------------------------------------------------

/// Either a configured SportsData client or nothing at all.
pub enum StatsClient {
    Active(SportsDataClient),
    /// No API key; every lookup comes back empty.
    Disabled,
}

impl StatsClient {
    /// `Active` when an API key is configured, otherwise `Disabled`.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.credentials.sportsdata_api_key {
            Some(key) if !key.trim().is_empty() => Ok(StatsClient::Active(SportsDataClient::new(
                config.stats.base_url.clone(),
                key.trim(),
                config.stats.search_limit,
                Duration::from_secs(config.client.request_timeout_secs),
            )?)),
            _ => {
                info!("no SportsData API key configured, stats disabled");
                Ok(StatsClient::Disabled)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, StatsClient::Active(_))
    }
}

#[async_trait]
impl StatsSource for StatsClient {
    async fn season_stats(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport> {
        match self {
            StatsClient::Active(client) => client.season_stats(lookup, season).await,
            StatsClient::Disabled => Ok(PlayerStatReport {
                season,
                ..PlayerStatReport::default()
            }),
        }
    }

    async fn game_logs(&self, lookup: &PlayerLookup, season: u16) -> Result<Vec<GameLog>> {
        match self {
            StatsClient::Active(client) => client.game_logs(lookup, season).await,
            StatsClient::Disabled => Ok(Vec::new()),
        }
    }

    async fn report(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport> {
        match self {
            StatsClient::Active(client) => client.report(lookup, season).await,
            StatsClient::Disabled => self.season_stats(lookup, season).await,
        }
    }
}
