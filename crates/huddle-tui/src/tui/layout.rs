// Screen layout: panel arrangement and sizing.
//
// Every screen shares the frame:
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Body (screen specific)                            |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The dashboard body:
//
// +------------------+-------------------------------+
// | Teams (35%)      | My Roster (65%)               |
// +------------------+-------------------------------+
// | Standings / Schedule / Suggestions (45%)          |
// +--------------------------------------------------+
//
// The trade calculator body:
//
// +------------------+------------------+------------+
// | My Players (30%) | Search (35%)     | Proposal   |
// |                  |                  | (35%)      |
// +------------------+------------------+------------+
// | Analysis (40%)                                    |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas shared by every screen.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: user, league, week, load state.
    pub status_bar: Rect,
    pub body: Rect,
    /// Bottom row: keyboard shortcut hints or the latest notice.
    pub help_bar: Rect,
}

#[derive(Debug, Clone)]
pub struct DashboardLayout {
    pub teams: Rect,
    pub roster: Rect,
    pub tabs: Rect,
}

#[derive(Debug, Clone)]
pub struct TradeLayout {
    pub my_players: Rect,
    pub search: Rect,
    pub proposal: Rect,
    pub analysis: Rect,
}

#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub overview: Rect,
    pub season: Rect,
    pub game_log: Rect,
}

/// Split the terminal into status bar, body and help bar.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(10),   // body
            Constraint::Length(1), // help bar
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        body: vertical[1],
        help_bar: vertical[2],
    }
}

pub fn dashboard_layout(body: Rect) -> DashboardLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    DashboardLayout {
        teams: top[0],
        roster: top[1],
        tabs: rows[1],
    }
}

pub fn trade_layout(body: Rect) -> TradeLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(body);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(rows[0]);

    TradeLayout {
        my_players: top[0],
        search: top[1],
        proposal: top[2],
        analysis: rows[1],
    }
}

pub fn sheet_layout(body: Rect) -> SheetLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Min(4),
        ])
        .split(body);

    SheetLayout {
        overview: rows[0],
        season: rows[1],
        game_log: rows[2],
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
