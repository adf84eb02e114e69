// TUI widget modules, one per panel, plus styling helpers they share.

pub mod help_bar;
pub mod login;
pub mod player_sheet;
pub mod quit_confirm;
pub mod roster;
pub mod schedule;
pub mod standings;
pub mod status_bar;
pub mod suggestions;
pub mod teams;
pub mod trade;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use huddle_app::protocol::{LoadStatus, PlayerRow};

use crate::tui::DashboardTab;

/// Bordered panel; the focused one gets a cyan border.
pub fn panel(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(title)
}

/// Block for the dashboard tab area, with the tab strip as its title.
pub fn tab_block(active: DashboardTab) -> Block<'static> {
    let tabs = [
        (DashboardTab::Standings, "1:Standings"),
        (DashboardTab::Schedule, "2:Schedule"),
        (DashboardTab::Suggestions, "3:Suggestions"),
    ];
    let mut spans = Vec::new();
    for (tab, label) in tabs {
        let style = if tab == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{label}]"), style));
        spans.push(Span::raw(" "));
    }
    Block::default().borders(Borders::ALL).title(Line::from(spans))
}

pub fn header_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

pub fn cursor_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Dimmed one-line message for an empty or loading panel.
pub fn placeholder(text: impl Into<String>, block: Block<'static>) -> Paragraph<'static> {
    Paragraph::new(format!("  {}", text.into()))
        .style(Style::default().fg(Color::DarkGray))
        .block(block)
}

/// Placeholder text for a panel whose data is not ready.
pub fn status_text(status: &LoadStatus, idle: &str) -> String {
    match status {
        LoadStatus::Idle => idle.to_string(),
        LoadStatus::Loading => "Loading...".to_string(),
        LoadStatus::Ready => "Nothing to show.".to_string(),
        LoadStatus::Failed(message) => format!("Failed: {message}"),
    }
}

/// First row to draw so that `cursor` stays inside a window of `visible`
/// rows.
pub fn window_start(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return cursor;
    }
    (cursor + 1).saturating_sub(visible)
}

/// Whole ranks print bare, consensus averages keep one decimal.
pub fn format_rank(rank: Option<f64>) -> String {
    match rank {
        Some(r) if r.fract() == 0.0 => format!("{r:.0}"),
        Some(r) => format!("{r:.1}"),
        None => "-".to_string(),
    }
}

/// "Name (POS, TEAM)" with an injury tag when present.
pub fn player_label(player: &PlayerRow) -> String {
    let team = player.team.as_deref().unwrap_or("FA");
    let mut label = format!("{} ({}, {})", player.name, player.position, team);
    if let Some(injury) = player.injury_status.as_deref().filter(|s| !s.is_empty()) {
        label.push_str(&format!(" [{injury}]"));
    }
    label
}
