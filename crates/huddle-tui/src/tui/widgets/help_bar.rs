// Help bar widget: the latest notice from the app, else key hints for the
// current screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use huddle_app::protocol::NoticeLevel;

use crate::tui::{Screen, TextTarget, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" {}", notice.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(
            hints(state),
            Style::default().fg(Color::White).add_modifier(Modifier::DIM),
        )),
    };
    let paragraph = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Key hints for whatever currently takes input.
pub fn hints(state: &ViewState) -> &'static str {
    match (state.input, state.screen) {
        (Some(TextTarget::LeagueId), _) => " League id: type, Enter:Load, Esc:Cancel",
        (Some(TextTarget::Search), _) => " Search: type to filter, Enter:Done, Esc:Clear",
        (None, Screen::Login) => " Tab:Next field | Enter:Sign in | Esc:Quit",
        (None, Screen::Dashboard) => {
            " ↑↓:Move | ←→:Teams/Roster | Enter:Select | 1-3:Tabs | g:League | r:Reload | t:Trade | o:Sign out | q:Quit"
        }
        (None, Screen::Trade) => {
            " Tab:Panel | ↑↓:Move | Enter:Add/Remove | /:Search | i:Player | c:Clear | Esc:Back | q:Quit"
        }
        (None, Screen::PlayerSheet) => " ←→:Season | ↑↓:Scroll log | Esc:Back | q:Quit",
    }
}
