// Application state and orchestration logic.
//
// A single task owns all mutable state. User commands arrive from the TUI;
// results from spawned fetch tasks come back on a second channel. After
// every change the loop rebuilds an `AppSnapshot` and pushes it to the UI.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use huddle_api::{ApiError, LeagueSource, PlayerLookup, StatsSource};
use huddle_core::config::Config;
use huddle_core::session::SessionStore;
use huddle_football::league::{
    self, League, LeagueUser, MatchupEntry, NflState, TeamDirectory,
};
use huddle_football::needs::estimate_needs;
use huddle_football::player::{PlayerDirectory, PlayerInfo};
use huddle_football::roster::Roster;
use huddle_football::season::current_season_today;
use huddle_football::stats::PlayerStatReport;
use huddle_football::suggestions::{suggest_trades, TradeSuggestion};
use huddle_football::trade::{evaluate_trade, TradeProposal};

use crate::protocol::{
    AppSnapshot, LoadStatus, Notice, PlayerRow, PlayerSheetView, RosterView, TeamRow, TradeSide,
    TradeView, UiUpdate, UserCommand,
};
use crate::stats_cache::{Lookup, StatsCache, StatsKey};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Most results shown by the trade-target search.
pub const SEARCH_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// The upstreams the app reads from. Either both direct clients or both
/// halves of the proxy client.
#[derive(Clone)]
pub struct Sources {
    pub league: Arc<dyn LeagueSource>,
    pub stats: Arc<dyn StatsSource>,
}

/// Everything fetched for one league in the first load phase.
#[derive(Debug, Clone)]
pub struct LeagueData {
    pub league: League,
    pub users: Vec<LeagueUser>,
    pub rosters: Vec<Roster>,
    pub players: PlayerDirectory,
    pub nfl_state: Option<NflState>,
}

/// Results delivered by spawned fetch tasks.
#[derive(Debug)]
pub enum FetchEvent {
    League {
        generation: u64,
        result: Result<Box<LeagueData>, String>,
    },
    Schedule {
        generation: u64,
        weeks: BTreeMap<u32, Vec<MatchupEntry>>,
    },
    Stats {
        epoch: u64,
        key: StatsKey,
        result: Result<PlayerStatReport, String>,
    },
}

#[derive(Debug, Clone)]
struct SheetState {
    player_id: String,
    season: u16,
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// League fetching
// ---------------------------------------------------------------------------

/// First load phase: league, users, rosters and the player directory in
/// parallel. The NFL state is optional; without it the schedule starts from
/// week one and the season follows the calendar.
pub async fn fetch_league(
    source: &dyn LeagueSource,
    league_id: &str,
) -> Result<LeagueData, ApiError> {
    let (league, users, rosters, players) = tokio::try_join!(
        source.league(league_id),
        source.users(league_id),
        source.rosters(league_id),
        source.players(),
    )?;
    let nfl_state = match source.nfl_state().await {
        Ok(state) => Some(state),
        Err(e) => {
            warn!("NFL state unavailable: {e}");
            None
        }
    };
    Ok(LeagueData {
        league,
        users,
        rosters,
        players,
        nfl_state,
    })
}

/// Second load phase: one matchups request per week. A failed week comes
/// back empty and shows as a bye.
pub async fn fetch_schedule(
    source: Arc<dyn LeagueSource>,
    league_id: String,
    weeks: Vec<u32>,
) -> BTreeMap<u32, Vec<MatchupEntry>> {
    let fetches = weeks.into_iter().map(|week| {
        let source = Arc::clone(&source);
        let league_id = league_id.clone();
        async move {
            match source.matchups(&league_id, week).await {
                Ok(entries) => (week, entries),
                Err(e) => {
                    warn!("matchups for week {week} unavailable: {e}");
                    (week, Vec::new())
                }
            }
        }
    });
    join_all(fetches).await.into_iter().collect()
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub session: SessionStore,
    sources: Sources,
    fetch_tx: mpsc::Sender<FetchEvent>,
    /// Incremented for every league load. League and schedule results from
    /// older generations are discarded.
    pub league_generation: u64,
    pub league_status: LoadStatus,
    pub data: Option<LeagueData>,
    pub teams: TeamDirectory,
    pub suggestions: Vec<TradeSuggestion>,
    pub schedule_status: LoadStatus,
    pub schedule_weeks: BTreeMap<u32, Vec<MatchupEntry>>,
    pub stats: StatsCache,
    /// Incremented whenever the stats cache is cleared so late results for
    /// a previous league or user are dropped.
    pub stats_epoch: u64,
    pub proposal: TradeProposal,
    pub search_query: String,
    sheet: Option<SheetState>,
}

impl AppState {
    pub fn new(
        config: Config,
        session: SessionStore,
        sources: Sources,
        fetch_tx: mpsc::Sender<FetchEvent>,
    ) -> Self {
        AppState {
            config,
            session,
            sources,
            fetch_tx,
            league_generation: 0,
            league_status: LoadStatus::Idle,
            data: None,
            teams: TeamDirectory::default(),
            suggestions: Vec::new(),
            schedule_status: LoadStatus::Idle,
            schedule_weeks: BTreeMap::new(),
            stats: StatsCache::new(),
            stats_epoch: 0,
            proposal: TradeProposal::default(),
            search_query: String::new(),
            sheet: None,
        }
    }

    /// Season used for stat lookups: the configured one, else the league
    /// host's NFL state while games are being played, else the calendar.
    pub fn season(&self) -> u16 {
        self.config
            .stats
            .season
            .or_else(|| {
                self.data
                    .as_ref()
                    .and_then(|d| d.nfl_state.as_ref())
                    .and_then(NflState::active_season)
            })
            .unwrap_or_else(current_season_today)
    }

    pub fn my_roster(&self) -> Option<&Roster> {
        let id = self.session.current()?.my_roster_id?;
        self.data.as_ref()?.rosters.iter().find(|r| r.roster_id == id)
    }

    /// Drop everything tied to the current league.
    fn reset_league(&mut self) {
        self.league_generation += 1;
        self.league_status = LoadStatus::Idle;
        self.data = None;
        self.teams = TeamDirectory::default();
        self.suggestions.clear();
        self.schedule_status = LoadStatus::Idle;
        self.schedule_weeks.clear();
        self.stats.clear();
        self.stats_epoch += 1;
        self.proposal.clear();
        self.search_query.clear();
        self.sheet = None;
    }

    /// Start loading the session's league, superseding any load in flight.
    /// Returns false when no league is selected.
    pub fn start_league_load(&mut self) -> bool {
        let Some(league_id) = self.session.current().and_then(|s| s.league_id.clone()) else {
            return false;
        };
        self.reset_league();
        self.league_status = LoadStatus::Loading;

        let generation = self.league_generation;
        let source = Arc::clone(&self.sources.league);
        let tx = self.fetch_tx.clone();
        info!("Loading league {league_id} (generation {generation})");
        tokio::spawn(async move {
            let result = fetch_league(source.as_ref(), &league_id)
                .await
                .map(Box::new)
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchEvent::League { generation, result }).await;
        });
        true
    }

    fn start_schedule_load(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        let current_week = data.nfl_state.as_ref().map(|s| s.week).unwrap_or(0);
        let weeks: Vec<u32> =
            league::schedule_weeks(current_week, self.config.schedule.min_weeks).collect();
        let league_id = data.league.league_id.clone();
        self.schedule_status = LoadStatus::Loading;

        let generation = self.league_generation;
        let source = Arc::clone(&self.sources.league);
        let tx = self.fetch_tx.clone();
        debug!("Loading {} schedule weeks for {league_id}", weeks.len());
        tokio::spawn(async move {
            let weeks = fetch_schedule(source, league_id, weeks).await;
            let _ = tx.send(FetchEvent::Schedule { generation, weeks }).await;
        });
    }

    /// Make sure stats for `player_id` are cached or on their way. At most
    /// one fetch per key is ever outstanding.
    pub fn ensure_stats(&mut self, player_id: &str, season: u16) {
        let key = StatsKey::new(player_id, season);
        if !matches!(self.stats.lookup(&key), Lookup::Miss) {
            return;
        }

        let lookup = self
            .data
            .as_ref()
            .and_then(|d| d.players.get(player_id))
            .map(PlayerLookup::from_player)
            .unwrap_or_else(|| PlayerLookup::new(player_id));
        let epoch = self.stats_epoch;
        let source = Arc::clone(&self.sources.stats);
        let tx = self.fetch_tx.clone();
        debug!("Fetching stats for {player_id} ({season})");
        tokio::spawn(async move {
            let result = source
                .report(&lookup, season)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(FetchEvent::Stats { epoch, key, result }).await;
        });
    }

    // -----------------------------------------------------------------------
    // Event handling
    // -----------------------------------------------------------------------

    /// Apply a fetch result. Returns a notice for the UI when there is
    /// something to say.
    pub fn apply_fetch_event(&mut self, event: FetchEvent) -> Option<Notice> {
        match event {
            FetchEvent::League { generation, result } => {
                if generation != self.league_generation {
                    debug!(
                        "Discarding stale league load (gen {generation}, current {})",
                        self.league_generation
                    );
                    return None;
                }
                match result {
                    Ok(data) => {
                        let data = *data;
                        info!(
                            "League {} loaded: {} rosters, {} players",
                            data.league.name,
                            data.rosters.len(),
                            data.players.len()
                        );
                        self.teams = TeamDirectory::build(&data.users, &data.rosters);
                        self.suggestions = suggest_trades(&data.rosters, &self.teams, &data.players);
                        self.data = Some(data);
                        self.league_status = LoadStatus::Ready;
                        self.start_schedule_load();
                        None
                    }
                    Err(message) => {
                        warn!("League load failed: {message}");
                        self.league_status = LoadStatus::Failed(message.clone());
                        Some(Notice::error(format!("Failed to load league: {message}")))
                    }
                }
            }
            FetchEvent::Schedule { generation, weeks } => {
                if generation != self.league_generation {
                    debug!("Discarding stale schedule (gen {generation})");
                    return None;
                }
                self.schedule_weeks = weeks;
                self.schedule_status = LoadStatus::Ready;
                None
            }
            FetchEvent::Stats { epoch, key, result } => {
                if epoch != self.stats_epoch {
                    debug!("Discarding stats for {} from epoch {epoch}", key.player_id);
                    return None;
                }
                match result {
                    Ok(report) => {
                        self.stats.complete(key, report);
                        None
                    }
                    Err(message) => {
                        warn!("Stats for {} unavailable: {message}", key.player_id);
                        self.stats.fail(&key);
                        if let Some(sheet) = self
                            .sheet
                            .as_mut()
                            .filter(|s| s.player_id == key.player_id && s.season == key.season)
                        {
                            sheet.error = Some(message);
                        }
                        None
                    }
                }
            }
        }
    }

    /// Apply a user command. `Quit` is handled by the loop and ignored here.
    pub fn apply_command(&mut self, cmd: UserCommand) -> Option<Notice> {
        match cmd {
            UserCommand::Login { username, password } => {
                let signed_in = match self.session.login(&username, &password) {
                    Ok(session) => session.username.clone(),
                    Err(e) => return Some(Notice::error(e.to_string())),
                };
                info!("Signed in as {signed_in}");
                if self.data.is_none() && !self.league_status.is_loading() {
                    self.start_league_load();
                }
                Some(Notice::info(format!("Signed in as {signed_in}")))
            }
            UserCommand::Logout => {
                if let Err(e) = self.session.logout() {
                    return Some(Notice::error(e.to_string()));
                }
                self.reset_league();
                Some(Notice::info("Signed out"))
            }
            UserCommand::SetLeague(league_id) => {
                if let Err(e) = self.session.set_league_id(&league_id) {
                    return Some(Notice::error(e.to_string()));
                }
                self.start_league_load();
                None
            }
            UserCommand::ReloadLeague => {
                if self.start_league_load() {
                    None
                } else {
                    Some(Notice::error("No league selected"))
                }
            }
            UserCommand::SelectMyRoster(roster_id) => {
                let exists = self
                    .data
                    .as_ref()
                    .is_some_and(|d| d.rosters.iter().any(|r| r.roster_id == roster_id));
                if !exists {
                    return Some(Notice::error(format!("No roster {roster_id} in this league")));
                }
                if let Err(e) = self.session.set_my_roster(Some(roster_id)) {
                    return Some(Notice::error(e.to_string()));
                }
                self.proposal.clear();
                Some(Notice::info(format!("Your team: {}", self.teams.label(roster_id))))
            }
            UserCommand::ProposeAdd { side, player_id } => self
                .propose_add(side, &player_id)
                .err()
                .map(Notice::error),
            UserCommand::ProposeRemove { side, player_id } => {
                match side {
                    TradeSide::Outgoing => self.proposal.remove_outgoing(&player_id),
                    TradeSide::Incoming => self.proposal.remove_incoming(&player_id),
                };
                None
            }
            UserCommand::ClearProposal => {
                self.proposal.clear();
                None
            }
            UserCommand::SearchPlayers(query) => {
                self.search_query = query;
                None
            }
            UserCommand::OpenPlayer(player_id) => {
                let season = self.season();
                self.ensure_stats(&player_id, season);
                self.sheet = Some(SheetState {
                    player_id,
                    season,
                    error: None,
                });
                None
            }
            UserCommand::SetSheetSeason(season) => {
                let sheet = self.sheet.as_mut()?;
                sheet.season = season;
                sheet.error = None;
                let player_id = sheet.player_id.clone();
                self.ensure_stats(&player_id, season);
                None
            }
            UserCommand::ClosePlayer => {
                self.sheet = None;
                None
            }
            UserCommand::Quit => None,
        }
    }

    fn propose_add(&mut self, side: TradeSide, player_id: &str) -> Result<(), String> {
        let on_my_roster = match self.my_roster() {
            Some(roster) => roster.contains(player_id),
            None => return Err("Select your team first".to_string()),
        };
        let added = match side {
            TradeSide::Outgoing if !on_my_roster => {
                return Err(format!("{} is not on your roster", self.player_name(player_id)));
            }
            TradeSide::Incoming if on_my_roster => {
                return Err(format!("{} is already on your roster", self.player_name(player_id)));
            }
            TradeSide::Outgoing => self.proposal.add_outgoing(player_id),
            TradeSide::Incoming => self.proposal.add_incoming(player_id),
        };
        added.map_err(|e| e.to_string())?;

        let season = self.season();
        self.ensure_stats(player_id, season);
        Ok(())
    }

    fn player_name(&self, player_id: &str) -> String {
        match &self.data {
            Some(data) => data.players.display_name(player_id),
            None => player_id.to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Snapshot
    // -----------------------------------------------------------------------

    /// Capture everything the UI renders.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let season = self.season();
        let session = self.session.current().cloned();
        let mut snapshot = AppSnapshot {
            session,
            league_status: self.league_status.clone(),
            schedule_status: self.schedule_status.clone(),
            season,
            ..AppSnapshot::default()
        };
        snapshot.trade.search_query = self.search_query.clone();

        let Some(data) = &self.data else {
            return snapshot;
        };
        let directory = &data.players;
        let my_roster = self.my_roster();
        let my_roster_id = my_roster.map(|r| r.roster_id);

        let owners: HashMap<&str, u32> = data
            .rosters
            .iter()
            .flat_map(|r| r.players.iter().map(move |id| (id.as_str(), r.roster_id)))
            .collect();
        let owner_of = |id: &str| owners.get(id).map(|rid| self.teams.label(*rid));

        snapshot.league = Some(data.league.clone());
        snapshot.current_week = data.nfl_state.as_ref().map(|s| s.week);
        snapshot.teams = self
            .teams
            .teams()
            .map(|t| TeamRow {
                roster_id: t.roster_id,
                label: t.label(),
                username: t.username.clone(),
                owner_name: t.owner_name(),
                player_count: data
                    .rosters
                    .iter()
                    .find(|r| r.roster_id == t.roster_id)
                    .map(|r| r.players.len())
                    .unwrap_or(0),
                is_mine: Some(t.roster_id) == my_roster_id,
            })
            .collect();
        snapshot.standings = league::standings(&data.rosters, &self.teams);
        snapshot.suggestions = self.suggestions.clone();

        if let Some(roster) = my_roster {
            snapshot.my_roster = Some(RosterView {
                roster_id: roster.roster_id,
                label: self.teams.label(roster.roster_id),
                starters: rows(directory, roster.active_starters()),
                bench: rows(directory, roster.bench()),
                reserve: rows(directory, roster.reserve.iter().map(String::as_str)),
                taxi: rows(directory, roster.taxi.iter().map(String::as_str)),
                needs: estimate_needs(roster.players.iter().map(String::as_str), directory),
            });
            if self.schedule_status == LoadStatus::Ready {
                snapshot.schedule =
                    league::schedule(&self.schedule_weeks, roster.roster_id, &self.teams);
            }
        }

        snapshot.trade = self.build_trade_view(data, my_roster, season, &owner_of);

        snapshot.player_sheet = self.sheet.as_ref().map(|sheet| {
            let key = StatsKey::new(sheet.player_id.as_str(), sheet.season);
            let report = self.stats.get(&key).cloned();
            let status = if report.is_some() {
                LoadStatus::Ready
            } else if let Some(message) = &sheet.error {
                LoadStatus::Failed(message.clone())
            } else if self.stats.is_pending(&key) {
                LoadStatus::Loading
            } else {
                LoadStatus::Idle
            };
            PlayerSheetView {
                player: directory.get(&sheet.player_id).cloned().unwrap_or_else(|| PlayerInfo {
                    player_id: sheet.player_id.clone(),
                    ..PlayerInfo::default()
                }),
                owner: owner_of(&sheet.player_id),
                season: sheet.season,
                status,
                report,
            }
        });

        snapshot
    }

    fn build_trade_view(
        &self,
        data: &LeagueData,
        my_roster: Option<&Roster>,
        season: u16,
        owner_of: &dyn Fn(&str) -> Option<String>,
    ) -> TradeView {
        let directory = &data.players;
        let mut view = TradeView {
            search_query: self.search_query.clone(),
            ..TradeView::default()
        };
        let Some(roster) = my_roster else {
            return view;
        };

        // Ranked players first, then ids the directory does not know.
        view.my_players = directory
            .ranked(roster.players.iter().map(String::as_str))
            .into_iter()
            .map(|p| row(directory, &p.player_id))
            .collect();
        view.my_players.extend(
            roster
                .players
                .iter()
                .filter(|id| directory.get(id).is_none())
                .map(|id| row(directory, id)),
        );

        view.outgoing = self
            .proposal
            .outgoing()
            .iter()
            .map(|id| row(directory, id))
            .collect();
        view.incoming = self
            .proposal
            .incoming()
            .iter()
            .map(|id| PlayerRow {
                owner: owner_of(id),
                ..row(directory, id)
            })
            .collect();

        if !self.search_query.trim().is_empty() {
            let candidates = data
                .rosters
                .iter()
                .filter(|r| r.roster_id != roster.roster_id)
                .flat_map(|r| r.players.iter().map(String::as_str));
            view.search_results = directory
                .search(&self.search_query, candidates, SEARCH_LIMIT)
                .into_iter()
                .map(|p| PlayerRow {
                    owner: owner_of(&p.player_id),
                    ..row(directory, &p.player_id)
                })
                .collect();
        }

        let lines = self.stats.season_lines(season);
        view.analysis = evaluate_trade(&self.proposal, &roster.players, directory, &lines);
        view.stats_pending = self
            .proposal
            .player_ids()
            .filter(|id| self.stats.is_pending(&StatsKey::new(*id, season)))
            .count();
        view
    }
}

fn row(directory: &PlayerDirectory, player_id: &str) -> PlayerRow {
    let player = directory.get(player_id);
    PlayerRow {
        player_id: player_id.to_string(),
        name: directory.display_name(player_id),
        position: directory.position_of(player_id),
        team: player.and_then(|p| p.team.clone()),
        rank: player.and_then(PlayerInfo::known_rank),
        injury_status: player.and_then(|p| p.injury_status.clone()),
        owner: None,
    }
}

fn rows<'a, I>(directory: &PlayerDirectory, ids: I) -> Vec<PlayerRow>
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter().map(|id| row(directory, id)).collect()
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Fetch results from spawned tasks
///
/// Pushes a fresh snapshot through `ui_tx` after every change.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut fetch_rx: mpsc::Receiver<FetchEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    // A restored session picks up where it left off.
    if state.session.current().is_some_and(|s| s.league_id.is_some()) {
        state.start_league_load();
    }
    send_snapshot(&state, &ui_tx).await;

    let mut fetch_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        let notice = state.apply_command(cmd);
                        publish(&state, notice, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = fetch_rx.recv(), if fetch_open => {
                match event {
                    Some(event) => {
                        let notice = state.apply_fetch_event(event);
                        publish(&state, notice, &ui_tx).await;
                    }
                    None => {
                        info!("Fetch channel closed");
                        fetch_open = false;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn publish(state: &AppState, notice: Option<Notice>, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(notice) = notice {
        let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
    }
    send_snapshot(state, ui_tx).await;
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}
