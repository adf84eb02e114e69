// Warp filters for every `/api` route.
//
// League routes forward the upstream JSON body untouched. The suggestions
// route combines league, users and rosters with the league-wide trade
// suggestions. Player routes match a league-host player to the stats
// provider and reply with the same envelopes `ProxyClient` decodes.

use std::convert::Infallible;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use warp::{Filter, Rejection, Reply};

use huddle_api::source::{parse_players, parse_rosters, parse_users};
use huddle_api::wire::{GameLogsEnvelope, StatsEnvelope};
use huddle_api::{LeagueEndpoint, LeagueSource, PlayerLookup, StatsSource};
use huddle_football::league::TeamDirectory;
use huddle_football::player::PlayerInfo;
use huddle_football::season::current_season_today;
use huddle_football::suggestions::{suggest_trades, TradeSuggestion};

use crate::error::{recover, ServerError};

/// Upstreams and defaults shared by every handler.
pub struct ServerState {
    pub league: Arc<dyn LeagueSource>,
    pub stats: Arc<dyn StatsSource>,
    /// Season for player routes that do not name one. `None` follows the
    /// NFL calendar.
    pub season: Option<u16>,
}

impl ServerState {
    fn season_or_default(&self, requested: Option<u16>) -> u16 {
        requested
            .or(self.season)
            .unwrap_or_else(current_season_today)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(rename = "includePlayers")]
    pub include_players: Option<String>,
}

impl SuggestionsQuery {
    fn wants_players(&self) -> bool {
        self.include_players.as_deref() == Some("1")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerQuery {
    pub season: Option<u16>,
    pub name: Option<String>,
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsBody {
    pub league: Value,
    pub users: Value,
    pub rosters: Value,
    pub suggestions: Vec<TradeSuggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players: Option<Value>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn forward(
    endpoint: LeagueEndpoint,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    debug!(%endpoint, "forwarding");
    let body = state
        .league
        .fetch(&endpoint)
        .await
        .map_err(|source| warp::reject::custom(ServerError::upstream(endpoint.label(), source)))?;
    Ok(warp::reply::json(&body))
}

/// League, users and rosters plus the suggestions derived from them. The
/// player directory is always fetched for position lookups; it is only
/// echoed back when asked for.
pub async fn build_suggestions(
    state: &ServerState,
    league_id: &str,
    include_players: bool,
) -> Result<SuggestionsBody, ServerError> {
    let league_ep = LeagueEndpoint::League(league_id.to_string());
    let users_ep = LeagueEndpoint::Users(league_id.to_string());
    let rosters_ep = LeagueEndpoint::Rosters(league_id.to_string());
    let players_ep = LeagueEndpoint::Players;

    let (league, users, rosters, mut players) = tokio::try_join!(
        state.league.fetch(&league_ep),
        state.league.fetch(&users_ep),
        state.league.fetch(&rosters_ep),
        state.league.fetch(&players_ep),
    )
    .map_err(ServerError::Suggestions)?;

    let typed_users = parse_users(&users_ep, users.clone()).map_err(ServerError::Suggestions)?;
    let typed_rosters =
        parse_rosters(&rosters_ep, rosters.clone()).map_err(ServerError::Suggestions)?;
    let raw_players = if include_players {
        players.clone()
    } else {
        std::mem::take(&mut players)
    };
    let directory = parse_players(&players_ep, raw_players).map_err(ServerError::Suggestions)?;

    let teams = TeamDirectory::build(&typed_users, &typed_rosters);
    let suggestions = suggest_trades(&typed_rosters, &teams, &directory);
    info!(
        league_id,
        rosters = typed_rosters.len(),
        suggestions = suggestions.len(),
        "built suggestions"
    );

    Ok(SuggestionsBody {
        league,
        users,
        rosters,
        suggestions,
        players: include_players.then_some(players),
    })
}

async fn suggestions(
    league_id: String,
    query: SuggestionsQuery,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    let body = build_suggestions(&state, &league_id, query.wants_players())
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&body))
}

/// Who to look up: the name and team from the query when given, else the
/// league host's directory entry for `player_id`.
pub async fn resolve_lookup(
    state: &ServerState,
    player_id: String,
    query: &PlayerQuery,
) -> Result<(PlayerLookup, Option<PlayerInfo>), ServerError> {
    if let Some(name) = query.name.as_deref().filter(|n| !n.trim().is_empty()) {
        let lookup = PlayerLookup {
            player_id,
            name: Some(name.trim().to_string()),
            team: query.team.clone().filter(|t| !t.is_empty()),
        };
        return Ok((lookup, None));
    }

    let directory = state
        .league
        .players()
        .await
        .map_err(|source| ServerError::upstream(LeagueEndpoint::Players.label(), source))?;
    match directory.get(&player_id) {
        Some(player) => Ok((PlayerLookup::from_player(player), Some(player.clone()))),
        None => {
            debug!(player_id = %player_id, "player not in directory");
            Ok((PlayerLookup::new(player_id), None))
        }
    }
}

async fn player_stats(
    player_id: String,
    query: PlayerQuery,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    let season = state.season_or_default(query.season);
    let (lookup, sleeper_player) = resolve_lookup(&state, player_id, &query)
        .await
        .map_err(warp::reject::custom)?;
    let report = state
        .stats
        .season_stats(&lookup, season)
        .await
        .map_err(|source| warp::reject::custom(ServerError::upstream("player stats", source)))?;

    Ok(warp::reply::json(&StatsEnvelope {
        sleeper_player,
        matched: report.matched,
        season_stats: report.season_line,
        season,
    }))
}

async fn player_game_logs(
    player_id: String,
    query: PlayerQuery,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    let season = state.season_or_default(query.season);
    let (lookup, _) = resolve_lookup(&state, player_id, &query)
        .await
        .map_err(warp::reject::custom)?;
    let game_logs = state
        .stats
        .game_logs(&lookup, season)
        .await
        .map_err(|source| warp::reject::custom(ServerError::upstream("game logs", source)))?;

    Ok(warp::reply::json(&GameLogsEnvelope { game_logs }))
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

fn with_state(
    state: Arc<ServerState>,
) -> impl Filter<Extract = (Arc<ServerState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Every route, with CORS open to any origin and rejections rendered as
/// JSON.
pub fn create_routes(
    state: Arc<ServerState>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let health = warp::path!("api" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "ok": true })));

    let league = warp::path!("api" / "league" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|id: String, state: Arc<ServerState>| {
            forward(LeagueEndpoint::League(id), state)
        });

    let users = warp::path!("api" / "league" / String / "users")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|id: String, state: Arc<ServerState>| {
            forward(LeagueEndpoint::Users(id), state)
        });

    let rosters = warp::path!("api" / "league" / String / "rosters")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|id: String, state: Arc<ServerState>| {
            forward(LeagueEndpoint::Rosters(id), state)
        });

    let matchups = warp::path!("api" / "league" / String / "matchups" / u32)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|league_id: String, week: u32, state: Arc<ServerState>| {
            forward(LeagueEndpoint::Matchups { league_id, week }, state)
        });

    let league_suggestions = warp::path!("api" / "league" / String / "suggestions")
        .and(warp::get())
        .and(warp::query::<SuggestionsQuery>())
        .and(with_state(state.clone()))
        .and_then(suggestions);

    let players = warp::path!("api" / "players")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|state: Arc<ServerState>| forward(LeagueEndpoint::Players, state));

    let nfl_state = warp::path!("api" / "state" / "nfl")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(|state: Arc<ServerState>| forward(LeagueEndpoint::NflState, state));

    let stats = warp::path!("api" / "player" / "stats" / String)
        .and(warp::get())
        .and(warp::query::<PlayerQuery>())
        .and(with_state(state.clone()))
        .and_then(player_stats);

    let game_logs = warp::path!("api" / "player" / "gamelogs" / String)
        .and(warp::get())
        .and(warp::query::<PlayerQuery>())
        .and(with_state(state))
        .and_then(player_game_logs);

    health
        .or(league)
        .or(users)
        .or(rosters)
        .or(matchups)
        .or(league_suggestions)
        .or(players)
        .or(nfl_state)
        .or(stats)
        .or(game_logs)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec![
                    "accept",
                    "authorization",
                    "content-type",
                    "origin",
                    "x-requested-with",
                ])
                .allow_methods(vec!["GET", "OPTIONS"]),
        )
        .recover(recover)
}
