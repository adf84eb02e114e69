// Status bar widget: who is signed in, which league, week and season, and
// whether anything is loading.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use huddle_app::protocol::{AppSnapshot, LoadStatus};

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [load indicator] huddle | user | league | week | season
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let (dot, dot_color) = load_indicator(snapshot);

    let mut spans = vec![
        Span::styled(format!(" {dot} "), Style::default().fg(dot_color)),
        Span::styled(
            "huddle",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];
    for part in summary_parts(snapshot) {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(part, Style::default().fg(Color::White)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Green when everything is loaded, yellow while fetching, red after a
/// failed league load.
pub fn load_indicator(snapshot: &AppSnapshot) -> (&'static str, Color) {
    let stats_loading = snapshot.trade.stats_pending > 0
        || snapshot
            .player_sheet
            .as_ref()
            .is_some_and(|s| s.status.is_loading());
    match &snapshot.league_status {
        LoadStatus::Failed(_) => ("●", Color::Red),
        status if status.is_loading() || snapshot.schedule_status.is_loading() || stats_loading => {
            ("●", Color::Yellow)
        }
        LoadStatus::Ready => ("●", Color::Green),
        _ => ("○", Color::DarkGray),
    }
}

pub fn summary_parts(snapshot: &AppSnapshot) -> Vec<String> {
    let mut parts = Vec::new();
    match &snapshot.session {
        Some(session) => parts.push(session.username.clone()),
        None => {
            parts.push("signed out".to_string());
            return parts;
        }
    }
    match &snapshot.league {
        Some(league) => parts.push(league.name.clone()),
        None => parts.push("no league".to_string()),
    }
    if let Some(week) = snapshot.current_week {
        parts.push(format!("Week {week}"));
    }
    if snapshot.season > 0 {
        parts.push(format!("Season {}", snapshot.season));
    }
    parts
}
