// The two upstream seams the app and the proxy server are written against.
//
// `LeagueSource` is implemented over raw JSON so the proxy can forward
// bodies untouched; the typed accessors decode and normalize on top of it.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use huddle_football::league::{League, LeagueUser, MatchupEntry, NflState};
use huddle_football::player::{PlayerDirectory, PlayerInfo};
use huddle_football::roster::Roster;
use huddle_football::stats::{GameLog, PlayerStatReport};

use crate::error::{ApiError, Result};
use crate::wire::{
    self, SleeperLeague, SleeperMatchup, SleeperNflState, SleeperRoster, SleeperUser,
};

// ---------------------------------------------------------------------------
// League data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeagueEndpoint {
    League(String),
    Users(String),
    Rosters(String),
    Matchups { league_id: String, week: u32 },
    Players,
    NflState,
}

impl LeagueEndpoint {
    /// Path under the Sleeper v1 base URL.
    pub fn sleeper_path(&self) -> String {
        match self {
            LeagueEndpoint::League(id) => format!("/league/{id}"),
            LeagueEndpoint::Users(id) => format!("/league/{id}/users"),
            LeagueEndpoint::Rosters(id) => format!("/league/{id}/rosters"),
            LeagueEndpoint::Matchups { league_id, week } => {
                format!("/league/{league_id}/matchups/{week}")
            }
            LeagueEndpoint::Players => "/players/nfl".to_string(),
            LeagueEndpoint::NflState => "/state/nfl".to_string(),
        }
    }

    /// Path under the proxy's `/api` base URL.
    pub fn proxy_path(&self) -> String {
        match self {
            LeagueEndpoint::Players => "/players".to_string(),
            other => other.sleeper_path(),
        }
    }

    /// What the endpoint returns, for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            LeagueEndpoint::League(_) => "league",
            LeagueEndpoint::Users(_) => "users",
            LeagueEndpoint::Rosters(_) => "rosters",
            LeagueEndpoint::Matchups { .. } => "matchups",
            LeagueEndpoint::Players => "players",
            LeagueEndpoint::NflState => "NFL state",
        }
    }
}

impl fmt::Display for LeagueEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sleeper_path())
    }
}

fn decode<T: DeserializeOwned>(endpoint: &LeagueEndpoint, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        url: endpoint.to_string(),
        source,
    })
}

/// Normalize a raw users body. A `null` body is an empty league.
pub fn parse_users(endpoint: &LeagueEndpoint, value: Value) -> Result<Vec<LeagueUser>> {
    let raw: Option<Vec<SleeperUser>> = decode(endpoint, value)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(SleeperUser::normalize)
        .collect())
}

/// Normalize a raw rosters body, sorted by roster id.
pub fn parse_rosters(endpoint: &LeagueEndpoint, value: Value) -> Result<Vec<Roster>> {
    let raw: Option<Vec<SleeperRoster>> = decode(endpoint, value)?;
    let mut rosters: Vec<Roster> = raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(SleeperRoster::normalize)
        .collect();
    rosters.sort_by_key(|r| r.roster_id);
    Ok(rosters)
}

pub fn parse_players(endpoint: &LeagueEndpoint, value: Value) -> Result<PlayerDirectory> {
    let raw: Option<HashMap<String, Value>> = decode(endpoint, value)?;
    Ok(wire::player_directory(raw.unwrap_or_default()))
}

/// Read-only access to a fantasy league host.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    /// Raw JSON body for `endpoint`.
    async fn fetch(&self, endpoint: &LeagueEndpoint) -> Result<Value>;

    async fn league(&self, league_id: &str) -> Result<League> {
        let endpoint = LeagueEndpoint::League(league_id.to_string());
        let raw: SleeperLeague = decode(&endpoint, self.fetch(&endpoint).await?)?;
        Ok(raw.normalize(league_id))
    }

    async fn users(&self, league_id: &str) -> Result<Vec<LeagueUser>> {
        let endpoint = LeagueEndpoint::Users(league_id.to_string());
        parse_users(&endpoint, self.fetch(&endpoint).await?)
    }

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>> {
        let endpoint = LeagueEndpoint::Rosters(league_id.to_string());
        parse_rosters(&endpoint, self.fetch(&endpoint).await?)
    }

    async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<MatchupEntry>> {
        let endpoint = LeagueEndpoint::Matchups {
            league_id: league_id.to_string(),
            week,
        };
        let raw: Option<Vec<SleeperMatchup>> = decode(&endpoint, self.fetch(&endpoint).await?)?;
        Ok(raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(SleeperMatchup::normalize)
            .collect())
    }

    async fn players(&self) -> Result<PlayerDirectory> {
        let endpoint = LeagueEndpoint::Players;
        parse_players(&endpoint, self.fetch(&endpoint).await?)
    }

    async fn nfl_state(&self) -> Result<NflState> {
        let endpoint = LeagueEndpoint::NflState;
        let raw: SleeperNflState = decode(&endpoint, self.fetch(&endpoint).await?)?;
        Ok(raw.into())
    }
}

// ---------------------------------------------------------------------------
// Player statistics
// ---------------------------------------------------------------------------

/// What a stats provider needs to find one league-host player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PlayerLookup {
    pub player_id: String,
    /// Name to search for. Without one no stats can be matched.
    pub name: Option<String>,
    pub team: Option<String>,
}

impl PlayerLookup {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            ..Self::default()
        }
    }

    pub fn from_player(player: &PlayerInfo) -> Self {
        Self {
            player_id: player.player_id.clone(),
            name: player.lookup_name(),
            team: player.team.clone(),
        }
    }
}

/// Season stats and game logs keyed by league-host players.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Match the player and fetch the season aggregate. `game_logs` is left
    /// empty.
    async fn season_stats(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport>;

    async fn game_logs(&self, lookup: &PlayerLookup, season: u16) -> Result<Vec<GameLog>>;

    /// Season stats plus game logs. A game-log failure keeps the season
    /// line and leaves the log empty.
    async fn report(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport> {
        let mut report = self.season_stats(lookup, season).await?;
        if report.matched.is_some() {
            report.game_logs = match self.game_logs(lookup, season).await {
                Ok(logs) => logs,
                Err(e) => {
                    warn!("game logs unavailable for {}: {e}", lookup.player_id);
                    Vec::new()
                }
            };
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_football::stats::{MatchedPlayer, StatLine};
    use serde_json::json;

    struct Canned(HashMap<String, Value>);

    #[async_trait]
    impl LeagueSource for Canned {
        async fn fetch(&self, endpoint: &LeagueEndpoint) -> Result<Value> {
            Ok(self.0.get(&endpoint.sleeper_path()).cloned().unwrap_or(Value::Null))
        }
    }

    fn canned(entries: &[(&str, Value)]) -> Canned {
        Canned(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn endpoint_paths() {
        let week = LeagueEndpoint::Matchups {
            league_id: "L1".into(),
            week: 5,
        };
        assert_eq!(week.sleeper_path(), "/league/L1/matchups/5");
        assert_eq!(week.proxy_path(), "/league/L1/matchups/5");
        assert_eq!(LeagueEndpoint::Players.sleeper_path(), "/players/nfl");
        assert_eq!(LeagueEndpoint::Players.proxy_path(), "/players");
        assert_eq!(LeagueEndpoint::NflState.proxy_path(), "/state/nfl");
        assert_eq!(LeagueEndpoint::Users("L1".into()).label(), "users");
    }

    #[tokio::test]
    async fn typed_accessors_normalize() {
        let source = canned(&[
            ("/league/L1", json!({ "name": "Dynasty", "season": "2024", "total_rosters": 10 })),
            ("/league/L1/rosters", json!([{ "roster_id": 2 }, { "roster_id": 1 }])),
            ("/state/nfl", json!({ "season": "2024", "week": 6 })),
        ]);

        let league = source.league("L1").await.unwrap();
        assert_eq!(league.league_id, "L1");
        assert_eq!(league.total_rosters, 10);

        let ids: Vec<u32> = source.rosters("L1").await.unwrap().iter().map(|r| r.roster_id).collect();
        assert_eq!(ids, vec![1, 2]);

        let state = source.nfl_state().await.unwrap();
        assert_eq!(state.week, 6);
        assert_eq!(state.display_week, 6);

        assert!(source.users("L1").await.unwrap().is_empty());
        assert!(source.matchups("L1", 3).await.unwrap().is_empty());
        assert!(source.players().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wrong_shape_is_a_decode_error() {
        let source = canned(&[("/league/L1/users", json!({ "not": "a list" }))]);
        let err = source.users("L1").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref url, .. } if url == "/league/L1/users"));
    }

    #[test]
    fn lookup_takes_name_and_team_from_player() {
        let player = PlayerInfo {
            player_id: "6794".into(),
            first_name: Some("Justin".into()),
            last_name: Some("Jefferson".into()),
            team: Some("MIN".into()),
            ..PlayerInfo::default()
        };
        let lookup = PlayerLookup::from_player(&player);
        assert_eq!(lookup.name.as_deref(), Some("Justin Jefferson"));
        assert_eq!(lookup.team.as_deref(), Some("MIN"));
        assert_eq!(PlayerLookup::new("1").name, None);
    }

    /// Season stats always match; game logs always fail.
    struct FlakyLogs;

    #[async_trait]
    impl StatsSource for FlakyLogs {
        async fn season_stats(&self, lookup: &PlayerLookup, season: u16) -> Result<PlayerStatReport> {
            let mut line = StatLine::default();
            line.rushing.yards = 850.0;
            Ok(PlayerStatReport {
                season,
                matched: Some(MatchedPlayer {
                    stats_player_id: 11,
                    name: lookup.name.clone().unwrap_or_default(),
                    team: lookup.team.clone(),
                    position: Some("RB".into()),
                }),
                season_line: Some(line),
                game_logs: Vec::new(),
            })
        }

        async fn game_logs(&self, lookup: &PlayerLookup, _season: u16) -> Result<Vec<GameLog>> {
            Err(ApiError::UnexpectedStatus {
                url: format!("/player/gamelogs/{}", lookup.player_id),
                status: reqwest::StatusCode::BAD_GATEWAY,
            })
        }
    }

    #[tokio::test]
    async fn report_keeps_season_line_when_game_logs_fail() {
        let lookup = PlayerLookup {
            player_id: "r1".into(),
            name: Some("Ray Alpha".into()),
            team: Some("SF".into()),
        };
        let report = FlakyLogs.report(&lookup, 2024).await.unwrap();
        assert!(report.matched.is_some());
        assert_eq!(report.season_line.map(|l| l.rushing.yards), Some(850.0));
        assert!(report.game_logs.is_empty());
    }
}
