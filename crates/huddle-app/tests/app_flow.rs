// End-to-end tests for the application event loop.
//
// A canned league host and stats provider stand in for the real upstreams;
// the tests drive the loop through its command channel and watch the
// snapshots it publishes.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use huddle_api::{ApiError, LeagueEndpoint, LeagueSource, PlayerLookup, StatsSource};
use huddle_app::app::{self, AppState, Sources};
use huddle_app::protocol::*;
use huddle_core::config::*;
use huddle_core::db::Database;
use huddle_core::session::SessionStore;
use huddle_football::position::Position;
use huddle_football::season::current_season_today;
use huddle_football::stats::{GameLog, MatchedPlayer, PlayerStatReport, StatLine};
use huddle_football::trade::Verdict;

// ===========================================================================
// Test helpers
// ===========================================================================

struct FakeLeague {
    bodies: HashMap<String, Value>,
}

#[async_trait]
impl LeagueSource for FakeLeague {
    async fn fetch(&self, endpoint: &LeagueEndpoint) -> Result<Value, ApiError> {
        let path = endpoint.sleeper_path();
        self.bodies
            .get(&path)
            .cloned()
            .ok_or(ApiError::UnexpectedStatus {
                url: path,
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

/// Hands out a rushing line per player; ids in `failing` error instead.
#[derive(Default)]
struct FakeStats {
    calls: AtomicUsize,
    failing: HashSet<String>,
}

#[async_trait]
impl StatsSource for FakeStats {
    async fn season_stats(
        &self,
        lookup: &PlayerLookup,
        season: u16,
    ) -> Result<PlayerStatReport, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&lookup.player_id) {
            return Err(ApiError::UnexpectedStatus {
                url: format!("/stats/{}", lookup.player_id),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        let mut line = StatLine::default();
        line.rushing.yards = 800.0;
        line.rushing.touchdowns = 6.0;
        Ok(PlayerStatReport {
            season,
            matched: Some(MatchedPlayer {
                stats_player_id: 1,
                name: lookup.name.clone().unwrap_or_default(),
                team: lookup.team.clone(),
                position: None,
            }),
            season_line: Some(line),
            game_logs: Vec::new(),
        })
    }

    async fn game_logs(&self, _lookup: &PlayerLookup, _season: u16) -> Result<Vec<GameLog>, ApiError> {
        Ok(vec![GameLog {
            week: 1,
            opponent: Some("DAL".into()),
            home_or_away: Some("HOME".into()),
            is_game_over: true,
            line: StatLine::default(),
        }])
    }
}

fn player(name: &str, position: &str, team: &str, rank: u32) -> Value {
    let (first, last) = name.split_once(' ').unwrap_or((name, ""));
    json!({
        "first_name": first,
        "last_name": last,
        "position": position,
        "team": team,
        "rank_ecr": rank,
    })
}

/// Two-team league. Alice (roster 1) is thin everywhere; Bob (roster 2)
/// carries four quarterbacks.
fn fake_league() -> FakeLeague {
    let mut bodies = HashMap::new();
    bodies.insert(
        "/league/L1".to_string(),
        json!({ "league_id": "L1", "name": "Sunday Huddle", "season": "2024", "status": "in_season", "total_rosters": 2 }),
    );
    bodies.insert(
        "/league/L1/users".to_string(),
        json!([
            { "user_id": "u1", "display_name": "alice", "metadata": { "team_name": "Alice's Aces" } },
            { "user_id": "u2", "display_name": "bob" },
        ]),
    );
    bodies.insert(
        "/league/L1/rosters".to_string(),
        json!([
            {
                "roster_id": 1, "owner_id": "u1",
                "players": ["q1", "r1", "w1"], "starters": ["q1", "r1", "0"],
                "settings": { "wins": 1, "losses": 0, "fpts": 120, "fpts_decimal": 50 }
            },
            {
                "roster_id": 2, "owner_id": "u2",
                "players": ["q2", "q3", "q4", "q5", "r2"], "starters": ["q2"],
                "settings": { "wins": 0, "losses": 1, "fpts": 98, "fpts_decimal": 10 }
            },
        ]),
    );
    bodies.insert(
        "/players/nfl".to_string(),
        json!({
            "q1": player("Quinn Alpha", "QB", "KC", 10),
            "r1": player("Ray Alpha", "RB", "SF", 20),
            "w1": player("Wes Alpha", "WR", "MIN", 30),
            "q2": player("Quinn Bravo", "QB", "BUF", 5),
            "q3": player("Quincy Bravo", "QB", "BAL", 40),
            "q4": player("Quade Bravo", "QB", "CIN", 60),
            "q5": player("Quentin Bravo", "QB", "DAL", 90),
            "r2": player("Rex Bravo", "RB", "ATL", 15),
        }),
    );
    bodies.insert(
        "/state/nfl".to_string(),
        json!({ "season": "2024", "season_type": "regular", "week": 2, "display_week": 2 }),
    );
    bodies.insert(
        "/league/L1/matchups/1".to_string(),
        json!([
            { "roster_id": 1, "matchup_id": 1, "points": 120.5 },
            { "roster_id": 2, "matchup_id": 1, "points": 98.1 },
        ]),
    );
    bodies.insert(
        "/league/L1/matchups/2".to_string(),
        json!([
            { "roster_id": 1, "matchup_id": 1, "points": 0 },
            { "roster_id": 2, "matchup_id": 1, "points": 0 },
        ]),
    );
    FakeLeague { bodies }
}

fn inline_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 4000,
        },
        sleeper: SleeperConfig {
            base_url: "http://sleeper.invalid/v1".into(),
        },
        stats: StatsConfig {
            base_url: "http://stats.invalid/v3/nfl".into(),
            season: Some(2024),
            search_limit: 20,
        },
        client: ClientConfig {
            mode: ClientMode::Direct,
            proxy_url: "http://localhost:4000/api".into(),
            request_timeout_secs: 5,
        },
        session: SessionConfig { db_path: None },
        schedule: ScheduleConfig { min_weeks: 3 },
        credentials: CredentialsConfig::default(),
    }
}

struct Harness {
    cmd_tx: mpsc::Sender<UserCommand>,
    ui_rx: mpsc::Receiver<UiUpdate>,
    stats: Arc<FakeStats>,
    handle: JoinHandle<anyhow::Result<()>>,
}

/// Start the loop with alice signed in. `league` pre-selects a league.
fn start(league: Option<&str>, stats: FakeStats) -> Harness {
    start_with(inline_config(), fake_league(), league, stats)
}

fn start_with(
    config: Config,
    upstream: FakeLeague,
    league: Option<&str>,
    stats: FakeStats,
) -> Harness {
    let mut session = SessionStore::load(Database::open(":memory:").unwrap()).unwrap();
    session.login("alice", "hunter2").unwrap();
    if let Some(id) = league {
        session.set_league_id(id).unwrap();
    }

    let stats = Arc::new(stats);
    let sources = Sources {
        league: Arc::new(upstream),
        stats: stats.clone(),
    };
    let (fetch_tx, fetch_rx) = mpsc::channel(64);
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let state = AppState::new(config, session, sources, fetch_tx);
    let handle = tokio::spawn(app::run(cmd_rx, fetch_rx, ui_tx, state));

    Harness {
        cmd_tx,
        ui_rx,
        stats,
        handle,
    }
}

impl Harness {
    async fn send(&self, cmd: UserCommand) {
        self.cmd_tx.send(cmd).await.unwrap();
    }

    /// Read updates until a snapshot satisfies `done`.
    async fn snapshot_where(&mut self, done: impl Fn(&AppSnapshot) -> bool) -> AppSnapshot {
        let wait = async {
            loop {
                match self.ui_rx.recv().await {
                    Some(UiUpdate::Snapshot(snapshot)) if done(&snapshot) => return *snapshot,
                    Some(_) => continue,
                    None => panic!("ui channel closed"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for snapshot")
    }

    /// Read updates until a notice arrives.
    async fn next_notice(&mut self) -> Notice {
        let wait = async {
            loop {
                match self.ui_rx.recv().await {
                    Some(UiUpdate::Notice(notice)) => return notice,
                    Some(_) => continue,
                    None => panic!("ui channel closed"),
                }
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("timed out waiting for notice")
    }

    async fn loaded(&mut self) -> AppSnapshot {
        self.snapshot_where(|s| {
            s.league_status == LoadStatus::Ready && s.schedule_status == LoadStatus::Ready
        })
        .await
    }

    async fn quit(self) {
        self.cmd_tx.send(UserCommand::Quit).await.unwrap();
        let result = self.handle.await.unwrap();
        assert!(result.is_ok());
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn restored_league_loads_on_startup() {
    let mut h = start(Some("L1"), FakeStats::default());

    let snapshot = h.loaded().await;
    assert_eq!(snapshot.league.as_ref().map(|l| l.name.as_str()), Some("Sunday Huddle"));
    assert_eq!(snapshot.current_week, Some(2));
    assert_eq!(snapshot.season, 2024);
    assert_eq!(snapshot.teams.len(), 2);
    assert_eq!(snapshot.teams[0].label, "Alice's Aces");
    assert_eq!(snapshot.teams[1].label, "bob's Team");
    assert_eq!(snapshot.teams[1].player_count, 5);

    assert_eq!(snapshot.standings[0].roster_id, 1);
    assert!((snapshot.standings[0].points_for - 120.5).abs() < 1e-9);

    assert!(snapshot
        .suggestions
        .iter()
        .any(|s| s.from_team == "bob" && s.to_team == "alice" && s.position == Position::QB));

    // No roster picked yet, so no personal views.
    assert!(snapshot.my_roster.is_none());
    assert!(snapshot.schedule.is_empty());

    h.quit().await;
}

#[tokio::test]
async fn season_follows_nfl_state_only_while_games_are_played() {
    let mut config = inline_config();
    config.stats.season = None;

    let mut h = start_with(config.clone(), fake_league(), Some("L1"), FakeStats::default());
    assert_eq!(h.loaded().await.season, 2024);
    h.quit().await;

    // Off-season: the state already names next year, which has no stats.
    let mut upstream = fake_league();
    upstream.bodies.insert(
        "/state/nfl".to_string(),
        json!({ "season": "2099", "season_type": "off", "week": 0, "display_week": 0 }),
    );
    let mut h = start_with(config, upstream, Some("L1"), FakeStats::default());
    let snapshot = h.loaded().await;
    assert_eq!(snapshot.season, current_season_today());
    h.quit().await;
}

#[tokio::test]
async fn selecting_a_roster_builds_roster_and_schedule_views() {
    let mut h = start(Some("L1"), FakeStats::default());
    h.loaded().await;

    h.send(UserCommand::SelectMyRoster(1)).await;
    let snapshot = h.snapshot_where(|s| s.my_roster.is_some()).await;

    let roster = snapshot.my_roster.as_ref().unwrap();
    let starters: Vec<&str> = roster.starters.iter().map(|p| p.player_id.as_str()).collect();
    assert_eq!(starters, vec!["q1", "r1"]);
    let bench: Vec<&str> = roster.bench.iter().map(|p| p.player_id.as_str()).collect();
    assert_eq!(bench, vec!["w1"]);
    assert!(roster.needs.profile.deficit.contains(&Position::QB));

    // Three weeks: two fetched, one never published and shown as a bye.
    assert_eq!(snapshot.schedule.len(), 3);
    assert_eq!(snapshot.schedule[0].opponent.label(), "bob");
    assert_eq!(snapshot.schedule[2].opponent.label(), "BYE");

    assert!(snapshot.teams[0].is_mine);
    assert_eq!(snapshot.session.as_ref().and_then(|s| s.my_roster_id), Some(1));

    h.quit().await;
}

#[tokio::test]
async fn unknown_roster_is_rejected() {
    let mut h = start(Some("L1"), FakeStats::default());
    h.loaded().await;

    h.send(UserCommand::SelectMyRoster(9)).await;
    let notice = h.next_notice().await;
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.text.contains("9"));

    h.quit().await;
}

#[tokio::test]
async fn trade_proposal_is_valued_once_stats_arrive() {
    let mut h = start(Some("L1"), FakeStats::default());
    h.loaded().await;
    h.send(UserCommand::SelectMyRoster(1)).await;

    h.send(UserCommand::ProposeAdd {
        side: TradeSide::Outgoing,
        player_id: "r1".into(),
    })
    .await;
    h.send(UserCommand::ProposeAdd {
        side: TradeSide::Incoming,
        player_id: "q2".into(),
    })
    .await;

    let snapshot = h
        .snapshot_where(|s| {
            s.trade.incoming.len() == 1
                && s.trade.stats_pending == 0
                && s.trade
                    .analysis
                    .as_ref()
                    .is_some_and(|a| a.outgoing.iter().chain(&a.incoming).all(|p| p.has_stats))
        })
        .await;

    let analysis = snapshot.trade.analysis.as_ref().unwrap();
    assert_eq!(analysis.outgoing[0].player_id, "r1");
    assert_eq!(analysis.incoming[0].player_id, "q2");
    assert!((analysis.net_value - (analysis.target_value - analysis.my_value)).abs() < 1e-9);
    assert_eq!(analysis.verdict, Verdict::from_net(analysis.net_value));
    assert_eq!(snapshot.trade.incoming[0].owner.as_deref(), Some("bob's Team"));
    assert_eq!(h.stats.calls.load(Ordering::SeqCst), 2);

    h.quit().await;
}

#[tokio::test]
async fn proposal_sides_are_checked_against_my_roster() {
    let mut h = start(Some("L1"), FakeStats::default());
    h.loaded().await;

    // No roster selected yet.
    h.send(UserCommand::ProposeAdd {
        side: TradeSide::Incoming,
        player_id: "q2".into(),
    })
    .await;
    assert_eq!(h.next_notice().await.level, NoticeLevel::Error);

    h.send(UserCommand::SelectMyRoster(1)).await;
    assert_eq!(h.next_notice().await.level, NoticeLevel::Info);

    h.send(UserCommand::ProposeAdd {
        side: TradeSide::Incoming,
        player_id: "r1".into(),
    })
    .await;
    let notice = h.next_notice().await;
    assert!(notice.text.contains("already on your roster"), "{}", notice.text);

    h.send(UserCommand::ProposeAdd {
        side: TradeSide::Outgoing,
        player_id: "q2".into(),
    })
    .await;
    let notice = h.next_notice().await;
    assert!(notice.text.contains("not on your roster"), "{}", notice.text);

    // Third incoming player is over the cap.
    for id in ["q2", "q3", "q4"] {
        h.send(UserCommand::ProposeAdd {
            side: TradeSide::Incoming,
            player_id: id.into(),
        })
        .await;
    }
    let notice = h.next_notice().await;
    assert_eq!(notice.level, NoticeLevel::Error);

    let snapshot = h.snapshot_where(|s| s.trade.incoming.len() == 2).await;
    let ids: Vec<&str> = snapshot.trade.incoming.iter().map(|p| p.player_id.as_str()).collect();
    assert_eq!(ids, vec!["q2", "q3"]);

    h.quit().await;
}

#[tokio::test]
async fn search_excludes_my_roster() {
    let mut h = start(Some("L1"), FakeStats::default());
    h.loaded().await;
    h.send(UserCommand::SelectMyRoster(1)).await;
    h.send(UserCommand::SearchPlayers("quin".into())).await;

    let snapshot = h
        .snapshot_where(|s| s.trade.search_query == "quin" && s.my_roster.is_some())
        .await;
    let ids: Vec<&str> = snapshot
        .trade
        .search_results
        .iter()
        .map(|p| p.player_id.as_str())
        .collect();
    assert!(ids.contains(&"q2"));
    assert!(ids.contains(&"q3"));
    assert!(!ids.contains(&"q5"));
    assert!(!ids.contains(&"q1"));
    assert!(snapshot.trade.search_results.iter().all(|p| p.owner.as_deref() == Some("bob's Team")));

    h.quit().await;
}

#[tokio::test]
async fn player_sheet_fetches_once_per_season() {
    let mut h = start(Some("L1"), FakeStats::default());
    h.loaded().await;

    h.send(UserCommand::OpenPlayer("r2".into())).await;
    let snapshot = h
        .snapshot_where(|s| {
            s.player_sheet
                .as_ref()
                .is_some_and(|sheet| sheet.status == LoadStatus::Ready)
        })
        .await;
    let sheet = snapshot.player_sheet.as_ref().unwrap();
    assert_eq!(sheet.season, 2024);
    assert_eq!(sheet.owner.as_deref(), Some("bob's Team"));
    let report = sheet.report.as_ref().unwrap();
    assert_eq!(report.game_logs.len(), 1);

    // Reopening hits the cache.
    h.send(UserCommand::ClosePlayer).await;
    h.send(UserCommand::OpenPlayer("r2".into())).await;
    h.snapshot_where(|s| {
        s.player_sheet
            .as_ref()
            .is_some_and(|sheet| sheet.status == LoadStatus::Ready)
    })
    .await;
    assert_eq!(h.stats.calls.load(Ordering::SeqCst), 1);

    // Another season is another fetch.
    h.send(UserCommand::SetSheetSeason(2023)).await;
    h.snapshot_where(|s| {
        s.player_sheet
            .as_ref()
            .is_some_and(|sheet| sheet.season == 2023 && sheet.status == LoadStatus::Ready)
    })
    .await;
    assert_eq!(h.stats.calls.load(Ordering::SeqCst), 2);

    h.quit().await;
}

#[tokio::test]
async fn failed_stats_surface_on_the_sheet() {
    let stats = FakeStats {
        failing: HashSet::from(["r2".to_string()]),
        ..FakeStats::default()
    };
    let mut h = start(Some("L1"), stats);
    h.loaded().await;

    h.send(UserCommand::OpenPlayer("r2".into())).await;
    let snapshot = h
        .snapshot_where(|s| {
            s.player_sheet
                .as_ref()
                .is_some_and(|sheet| matches!(sheet.status, LoadStatus::Failed(_)))
        })
        .await;
    assert!(snapshot.player_sheet.unwrap().report.is_none());

    h.quit().await;
}

#[tokio::test]
async fn unknown_league_fails_and_switching_recovers() {
    let mut h = start(None, FakeStats::default());

    h.send(UserCommand::SetLeague("NOPE".into())).await;
    let notice = h.next_notice().await;
    assert_eq!(notice.level, NoticeLevel::Error);
    let snapshot = h
        .snapshot_where(|s| matches!(s.league_status, LoadStatus::Failed(_)))
        .await;
    assert!(snapshot.league.is_none());

    h.send(UserCommand::SetLeague("L1".into())).await;
    let snapshot = h.loaded().await;
    assert_eq!(
        snapshot.session.as_ref().and_then(|s| s.league_id.as_deref()),
        Some("L1")
    );

    h.quit().await;
}

#[tokio::test]
async fn logout_clears_league_views() {
    let mut h = start(Some("L1"), FakeStats::default());
    h.loaded().await;

    h.send(UserCommand::Logout).await;
    let snapshot = h.snapshot_where(|s| s.session.is_none()).await;
    assert!(snapshot.league.is_none());
    assert!(snapshot.teams.is_empty());
    assert_eq!(snapshot.league_status, LoadStatus::Idle);

    h.quit().await;
}

#[tokio::test]
async fn closing_the_command_channel_stops_the_loop() {
    let h = start(None, FakeStats::default());
    drop(h.cmd_tx);
    let result = h.handle.await.unwrap();
    assert!(result.is_ok());
}
