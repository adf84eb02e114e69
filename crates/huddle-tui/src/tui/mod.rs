// TUI: screens, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the latest `AppSnapshot` plus purely
// local state (which screen is up, cursors, text being typed). The app
// event loop pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use huddle_app::protocol::{AppSnapshot, Notice, PlayerRow, UiUpdate, UserCommand};

use layout::{build_layout, dashboard_layout};
use widgets::{
    help_bar, login, player_sheet, quit_confirm, roster, schedule, standings, status_bar,
    suggestions, teams, trade,
};

// ---------------------------------------------------------------------------
// Local UI enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
    Trade,
    PlayerSheet,
}

/// Lower-right tabs on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Standings,
    Schedule,
    Suggestions,
}

/// Which dashboard list the cursor keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardFocus {
    Teams,
    Roster,
}

/// Which trade-calculator list the cursor keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeFocus {
    MyPlayers,
    Results,
    Outgoing,
    Incoming,
}

impl TradeFocus {
    pub fn next(self) -> Self {
        match self {
            TradeFocus::MyPlayers => TradeFocus::Results,
            TradeFocus::Results => TradeFocus::Outgoing,
            TradeFocus::Outgoing => TradeFocus::Incoming,
            TradeFocus::Incoming => TradeFocus::MyPlayers,
        }
    }

    /// Key into `ViewState::cursors`.
    pub fn key(self) -> &'static str {
        match self {
            TradeFocus::MyPlayers => "trade_mine",
            TradeFocus::Results => "trade_results",
            TradeFocus::Outgoing => "trade_outgoing",
            TradeFocus::Incoming => "trade_incoming",
        }
    }
}

/// Single-line text prompts outside the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget {
    LeagueId,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub field: LoginField,
}

impl Default for LoginForm {
    fn default() -> Self {
        LoginForm {
            username: String::new(),
            password: String::new(),
            field: LoginField::Username,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the last snapshot from the app plus navigation.
pub struct ViewState {
    pub snapshot: AppSnapshot,
    /// Last notice from the app; cleared on the next key press.
    pub notice: Option<Notice>,
    pub screen: Screen,
    /// Screen to go back to when the player sheet closes.
    pub sheet_return: Screen,
    pub dashboard_tab: DashboardTab,
    pub dashboard_focus: DashboardFocus,
    pub trade_focus: TradeFocus,
    /// Per-list cursor positions (keyed by list name).
    pub cursors: HashMap<String, usize>,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Active text prompt, if any.
    pub input: Option<TextTarget>,
    pub input_text: String,
    pub login: LoginForm,
    pub confirm_quit: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: AppSnapshot::default(),
            notice: None,
            screen: Screen::Login,
            sheet_return: Screen::Dashboard,
            dashboard_tab: DashboardTab::Standings,
            dashboard_focus: DashboardFocus::Teams,
            trade_focus: TradeFocus::MyPlayers,
            cursors: HashMap::new(),
            scroll_offset: HashMap::new(),
            input: None,
            input_text: String::new(),
            login: LoginForm::default(),
            confirm_quit: false,
        }
    }
}

impl ViewState {
    /// Replace the snapshot and follow sign-in changes: signing out returns
    /// to the login screen, a session (restored or new) leaves it.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        match (&snapshot.session, self.screen) {
            (None, Screen::Login) => {}
            (None, _) => {
                self.screen = Screen::Login;
                self.input = None;
                self.input_text.clear();
                self.cursors.clear();
                self.login = LoginForm::default();
            }
            (Some(_), Screen::Login) => {
                self.screen = Screen::Dashboard;
                self.login.password.clear();
            }
            (Some(_), _) => {}
        }
        self.snapshot = snapshot;
    }

    pub fn cursor(&self, key: &str) -> usize {
        self.cursors.get(key).copied().unwrap_or(0)
    }

    /// Cursor for `key`, clamped to a list of `len` items.
    pub fn clamped_cursor(&self, key: &str, len: usize) -> usize {
        self.cursor(key).min(len.saturating_sub(1))
    }

    /// My roster in display order: starters, bench, reserve, taxi.
    pub fn roster_players(&self) -> Vec<&PlayerRow> {
        match &self.snapshot.my_roster {
            Some(view) => view
                .starters
                .iter()
                .chain(&view.bench)
                .chain(&view.reserve)
                .chain(&view.taxi)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Rows of one trade-calculator list.
    pub fn trade_list(&self, focus: TradeFocus) -> &[PlayerRow] {
        let trade = &self.snapshot.trade;
        match focus {
            TradeFocus::MyPlayers => &trade.my_players,
            TradeFocus::Results => &trade.search_results,
            TradeFocus::Outgoing => &trade.outgoing,
            TradeFocus::Incoming => &trade.incoming,
        }
    }

    /// Player under the cursor of the focused trade list.
    pub fn selected_trade_player(&self) -> Option<&PlayerRow> {
        let list = self.trade_list(self.trade_focus);
        list.get(self.clamped_cursor(self.trade_focus.key(), list.len()))
    }

    /// Player under the cursor of the dashboard roster panel.
    pub fn selected_roster_player(&self) -> Option<&PlayerRow> {
        let players = self.roster_players();
        let index = self.clamped_cursor("roster", players.len());
        players.get(index).copied()
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => state.apply_snapshot(*snapshot),
        UiUpdate::Notice(notice) => state.notice = Some(notice),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame for the current screen.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    status_bar::render(frame, layout.status_bar, state);
    match state.screen {
        Screen::Login => login::render(frame, layout.body, state),
        Screen::Dashboard => {
            let dash = dashboard_layout(layout.body);
            teams::render(frame, dash.teams, state);
            roster::render(frame, dash.roster, state);
            match state.dashboard_tab {
                DashboardTab::Standings => standings::render(frame, dash.tabs, state),
                DashboardTab::Schedule => schedule::render(frame, dash.tabs, state),
                DashboardTab::Suggestions => suggestions::render(frame, dash.tabs, state),
            }
        }
        Screen::Trade => trade::render(frame, layout.body, state),
        Screen::PlayerSheet => player_sheet::render(frame, layout.body, state),
    }
    help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Restore the terminal before the default panic output.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::default();

    // 4. Async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    // Mouse and resize events are ignored; the next tick redraws.
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
