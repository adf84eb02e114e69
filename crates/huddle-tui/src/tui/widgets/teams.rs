// Teams widget: every roster in the league; Enter picks "my team".

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Cell, Row, Table};
use ratatui::Frame;

use super::{cursor_style, header_style, panel, placeholder, status_text, window_start};
use crate::tui::{DashboardFocus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.dashboard_focus == DashboardFocus::Teams;
    let teams = &state.snapshot.teams;
    let block = panel(format!("Teams ({})", teams.len()), focused);

    if teams.is_empty() {
        let text = status_text(&state.snapshot.league_status, "Press g to choose a league");
        frame.render_widget(placeholder(text, block), area);
        return;
    }

    // Borders and header row.
    let visible = (area.height as usize).saturating_sub(3);
    let cursor = state.clamped_cursor("teams", teams.len());
    let start = window_start(cursor, visible);

    let rows: Vec<Row> = teams
        .iter()
        .enumerate()
        .skip(start)
        .take(visible.max(1))
        .map(|(i, team)| {
            let style = if focused && i == cursor {
                cursor_style()
            } else if team.is_mine {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(if team.is_mine { "★" } else { " " }),
                Cell::from(team.label.clone()),
                Cell::from(team.username.clone().unwrap_or_default()),
                Cell::from(team.player_count.to_string()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["", "Team", "Owner", "Pl"]).style(header_style());
    let widths = [
        Constraint::Length(1),
        Constraint::Min(12),
        Constraint::Length(12),
        Constraint::Length(3),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}
