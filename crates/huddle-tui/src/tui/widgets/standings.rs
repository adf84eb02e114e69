// Standings tab: wins first, then points for.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Cell, Row, Table};
use ratatui::Frame;

use super::{header_style, placeholder, status_text, tab_block};
use crate::tui::{DashboardTab, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = tab_block(DashboardTab::Standings);
    let standings = &state.snapshot.standings;
    if standings.is_empty() {
        let text = status_text(&state.snapshot.league_status, "No league loaded");
        frame.render_widget(placeholder(text, block), area);
        return;
    }

    let my_roster = state.snapshot.my_roster.as_ref().map(|r| r.roster_id);
    let offset = state.scroll_offset.get("standings").copied().unwrap_or(0);
    let visible = (area.height as usize).saturating_sub(3);
    let offset = offset.min(standings.len().saturating_sub(visible));

    let rows: Vec<Row> = standings
        .iter()
        .enumerate()
        .skip(offset)
        .map(|(i, row)| {
            let style = if Some(row.roster_id) == my_roster {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(row.team.clone()),
                Cell::from(record(row.wins, row.losses, row.ties)),
                Cell::from(format!("{:.2}", row.points_for)),
                Cell::from(format!("{:.2}", row.points_against)),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["#", "Team", "W-L-T", "PF", "PA"]).style(header_style());
    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
    ];
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

/// "W-L", with ties only when there are any.
pub fn record(wins: u32, losses: u32, ties: u32) -> String {
    if ties > 0 {
        format!("{wins}-{losses}-{ties}")
    } else {
        format!("{wins}-{losses}")
    }
}
