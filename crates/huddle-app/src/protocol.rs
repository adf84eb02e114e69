// Messages between the event loop and the terminal UI.

use huddle_core::session::Session;
use huddle_football::league::{League, ScheduleRow, StandingRow};
use huddle_football::needs::RosterNeeds;
use huddle_football::player::PlayerInfo;
use huddle_football::position::Position;
use huddle_football::stats::PlayerStatReport;
use huddle_football::suggestions::TradeSuggestion;
use huddle_football::trade::TradeAnalysis;

// ---------------------------------------------------------------------------
// UI -> app
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeSide {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Login { username: String, password: String },
    Logout,
    SetLeague(String),
    /// Re-fetch the current league.
    ReloadLeague,
    SelectMyRoster(u32),
    ProposeAdd { side: TradeSide, player_id: String },
    ProposeRemove { side: TradeSide, player_id: String },
    ClearProposal,
    SearchPlayers(String),
    OpenPlayer(String),
    SetSheetSeason(u16),
    ClosePlayer,
    Quit,
}

// ---------------------------------------------------------------------------
// App -> UI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Snapshot(Box<AppSnapshot>),
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }
}

/// One player as listed anywhere in the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRow {
    pub player_id: String,
    pub name: String,
    pub position: Position,
    pub team: Option<String>,
    /// `None` when unranked.
    pub rank: Option<f64>,
    pub injury_status: Option<String>,
    /// Label of the fantasy team holding the player, where relevant.
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRow {
    pub roster_id: u32,
    pub label: String,
    pub username: Option<String>,
    /// Name used for the team in trade suggestions.
    pub owner_name: String,
    pub player_count: usize,
    pub is_mine: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RosterView {
    pub roster_id: u32,
    pub label: String,
    pub starters: Vec<PlayerRow>,
    pub bench: Vec<PlayerRow>,
    pub reserve: Vec<PlayerRow>,
    pub taxi: Vec<PlayerRow>,
    pub needs: RosterNeeds,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeView {
    /// My roster, best rank first: the outgoing picker.
    pub my_players: Vec<PlayerRow>,
    pub outgoing: Vec<PlayerRow>,
    pub incoming: Vec<PlayerRow>,
    pub search_query: String,
    pub search_results: Vec<PlayerRow>,
    pub analysis: Option<TradeAnalysis>,
    /// Proposal players whose stats are still loading.
    pub stats_pending: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSheetView {
    pub player: PlayerInfo,
    pub owner: Option<String>,
    pub season: u16,
    pub status: LoadStatus,
    pub report: Option<PlayerStatReport>,
}

/// Everything the UI renders, rebuilt after each change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSnapshot {
    pub session: Option<Session>,
    pub league_status: LoadStatus,
    pub league: Option<League>,
    pub current_week: Option<u32>,
    pub season: u16,
    pub teams: Vec<TeamRow>,
    pub my_roster: Option<RosterView>,
    pub standings: Vec<StandingRow>,
    pub schedule_status: LoadStatus,
    pub schedule: Vec<ScheduleRow>,
    pub suggestions: Vec<TradeSuggestion>,
    pub trade: TradeView,
    pub player_sheet: Option<PlayerSheetView>,
}
