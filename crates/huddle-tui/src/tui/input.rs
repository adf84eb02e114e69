// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app event loop, or into local ViewState changes (screen switching,
// cursor movement, typing).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use huddle_app::protocol::{TradeSide, UserCommand};

use super::{DashboardFocus, DashboardTab, LoginField, Screen, TextTarget, TradeFocus, ViewState};

/// Lines moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Windows reports both press and release; only presses count.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    view_state.notice = None;

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }
    if view_state.screen == Screen::Login {
        return handle_login(key_event, view_state);
    }
    if let Some(target) = view_state.input {
        return handle_text_input(key_event, target, view_state);
    }

    if key_event.code == KeyCode::Char('q') {
        view_state.confirm_quit = true;
        return None;
    }

    match view_state.screen {
        Screen::Login => None,
        Screen::Dashboard => handle_dashboard(key_event, view_state),
        Screen::Trade => handle_trade(key_event, view_state),
        Screen::PlayerSheet => handle_player_sheet(key_event, view_state),
    }
}

/// `y`/`q` confirm, `n`/Esc cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_login(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.login;
    let field = match form.field {
        LoginField::Username => &mut form.username,
        LoginField::Password => &mut form.password,
    };
    match key_event.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.field = match form.field {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
            None
        }
        KeyCode::Enter => match form.field {
            LoginField::Username => {
                form.field = LoginField::Password;
                None
            }
            LoginField::Password => Some(UserCommand::Login {
                username: form.username.trim().to_string(),
                password: form.password.clone(),
            }),
        },
        KeyCode::Backspace => {
            field.pop();
            None
        }
        KeyCode::Char(c) => {
            field.push(c);
            None
        }
        KeyCode::Esc => {
            view_state.confirm_quit = true;
            None
        }
        _ => None,
    }
}

/// Typing into the league-id or search prompt. The search is live: every
/// edit is sent so results follow the text.
fn handle_text_input(
    key_event: KeyEvent,
    target: TextTarget,
    view_state: &mut ViewState,
) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input = None;
            view_state.input_text.clear();
            match target {
                TextTarget::LeagueId => None,
                TextTarget::Search => Some(UserCommand::SearchPlayers(String::new())),
            }
        }
        KeyCode::Enter => {
            view_state.input = None;
            match target {
                TextTarget::LeagueId => {
                    let league_id = std::mem::take(&mut view_state.input_text);
                    let league_id = league_id.trim();
                    (!league_id.is_empty()).then(|| UserCommand::SetLeague(league_id.to_string()))
                }
                TextTarget::Search => {
                    view_state.trade_focus = TradeFocus::Results;
                    view_state.cursors.insert(TradeFocus::Results.key().into(), 0);
                    None
                }
            }
        }
        KeyCode::Backspace => {
            view_state.input_text.pop();
            search_update(target, view_state)
        }
        KeyCode::Char(c) => {
            view_state.input_text.push(c);
            search_update(target, view_state)
        }
        _ => None,
    }
}

fn search_update(target: TextTarget, view_state: &ViewState) -> Option<UserCommand> {
    match target {
        TextTarget::Search => Some(UserCommand::SearchPlayers(view_state.input_text.clone())),
        TextTarget::LeagueId => None,
    }
}

fn handle_dashboard(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('1') => view_state.dashboard_tab = DashboardTab::Standings,
        KeyCode::Char('2') => view_state.dashboard_tab = DashboardTab::Schedule,
        KeyCode::Char('3') => view_state.dashboard_tab = DashboardTab::Suggestions,
        KeyCode::Left | KeyCode::Char('h') => view_state.dashboard_focus = DashboardFocus::Teams,
        KeyCode::Right | KeyCode::Char('l') => view_state.dashboard_focus = DashboardFocus::Roster,
        KeyCode::Tab => {
            view_state.dashboard_focus = match view_state.dashboard_focus {
                DashboardFocus::Teams => DashboardFocus::Roster,
                DashboardFocus::Roster => DashboardFocus::Teams,
            }
        }
        KeyCode::Up | KeyCode::Char('k') => move_dashboard_cursor(view_state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_dashboard_cursor(view_state, 1),
        KeyCode::PageUp => scroll_tab(view_state, -(PAGE_SIZE as isize)),
        KeyCode::PageDown => scroll_tab(view_state, PAGE_SIZE as isize),
        KeyCode::Enter => {
            return match view_state.dashboard_focus {
                DashboardFocus::Teams => {
                    let teams = &view_state.snapshot.teams;
                    let index = view_state.clamped_cursor("teams", teams.len());
                    teams.get(index).map(|t| UserCommand::SelectMyRoster(t.roster_id))
                }
                DashboardFocus::Roster => open_player(
                    view_state.selected_roster_player().map(|p| p.player_id.clone()),
                    view_state,
                ),
            };
        }
        KeyCode::Char('g') => {
            view_state.input = Some(TextTarget::LeagueId);
            view_state.input_text = view_state
                .snapshot
                .session
                .as_ref()
                .and_then(|s| s.league_id.clone())
                .unwrap_or_default();
        }
        KeyCode::Char('r') => return Some(UserCommand::ReloadLeague),
        KeyCode::Char('t') => view_state.screen = Screen::Trade,
        KeyCode::Char('o') => return Some(UserCommand::Logout),
        _ => {}
    }
    None
}

fn move_dashboard_cursor(view_state: &mut ViewState, delta: isize) {
    let (key, len) = match view_state.dashboard_focus {
        DashboardFocus::Teams => ("teams", view_state.snapshot.teams.len()),
        DashboardFocus::Roster => ("roster", view_state.roster_players().len()),
    };
    move_cursor(view_state, key, len, delta);
}

fn scroll_tab(view_state: &mut ViewState, delta: isize) {
    let key = match view_state.dashboard_tab {
        DashboardTab::Standings => "standings",
        DashboardTab::Schedule => "schedule",
        DashboardTab::Suggestions => "suggestions",
    };
    scroll(view_state, key, delta);
}

fn handle_trade(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc | KeyCode::Char('d') => view_state.screen = Screen::Dashboard,
        KeyCode::Tab => view_state.trade_focus = view_state.trade_focus.next(),
        KeyCode::Char('/') => {
            view_state.input = Some(TextTarget::Search);
            view_state.input_text = view_state.snapshot.trade.search_query.clone();
        }
        KeyCode::Up | KeyCode::Char('k') => move_trade_cursor(view_state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_trade_cursor(view_state, 1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let player_id = view_state.selected_trade_player()?.player_id.clone();
            return Some(match view_state.trade_focus {
                TradeFocus::MyPlayers => UserCommand::ProposeAdd {
                    side: TradeSide::Outgoing,
                    player_id,
                },
                TradeFocus::Results => UserCommand::ProposeAdd {
                    side: TradeSide::Incoming,
                    player_id,
                },
                TradeFocus::Outgoing => UserCommand::ProposeRemove {
                    side: TradeSide::Outgoing,
                    player_id,
                },
                TradeFocus::Incoming => UserCommand::ProposeRemove {
                    side: TradeSide::Incoming,
                    player_id,
                },
            });
        }
        KeyCode::Char('i') => {
            return open_player(
                view_state.selected_trade_player().map(|p| p.player_id.clone()),
                view_state,
            );
        }
        KeyCode::Char('c') => return Some(UserCommand::ClearProposal),
        _ => {}
    }
    None
}

fn move_trade_cursor(view_state: &mut ViewState, delta: isize) {
    let focus = view_state.trade_focus;
    let len = view_state.trade_list(focus).len();
    move_cursor(view_state, focus.key(), len, delta);
}

fn handle_player_sheet(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let sheet_season = view_state.snapshot.player_sheet.as_ref().map(|s| s.season);
    match key_event.code {
        KeyCode::Esc | KeyCode::Backspace => {
            view_state.screen = view_state.sheet_return;
            view_state.scroll_offset.remove("game_log");
            Some(UserCommand::ClosePlayer)
        }
        KeyCode::Left | KeyCode::Char('[') => {
            let season = sheet_season?.checked_sub(1)?;
            view_state.scroll_offset.remove("game_log");
            Some(UserCommand::SetSheetSeason(season))
        }
        KeyCode::Right | KeyCode::Char(']') => {
            let season = sheet_season? + 1;
            // Nothing to show past the current season.
            if season > view_state.snapshot.season {
                return None;
            }
            view_state.scroll_offset.remove("game_log");
            Some(UserCommand::SetSheetSeason(season))
        }
        KeyCode::Up | KeyCode::Char('k') => {
            scroll(view_state, "game_log", -1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll(view_state, "game_log", 1);
            None
        }
        _ => None,
    }
}

fn open_player(player_id: Option<String>, view_state: &mut ViewState) -> Option<UserCommand> {
    let player_id = player_id?;
    view_state.sheet_return = view_state.screen;
    view_state.screen = Screen::PlayerSheet;
    Some(UserCommand::OpenPlayer(player_id))
}

fn move_cursor(view_state: &mut ViewState, key: &str, len: usize, delta: isize) {
    let current = view_state.clamped_cursor(key, len);
    let next = current
        .saturating_add_signed(delta)
        .min(len.saturating_sub(1));
    view_state.cursors.insert(key.to_string(), next);
}

fn scroll(view_state: &mut ViewState, key: &str, delta: isize) {
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_add_signed(delta);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
