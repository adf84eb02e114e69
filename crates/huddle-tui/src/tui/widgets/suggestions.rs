// Suggestions tab: league-wide pairings where one team's surplus covers
// another's deficit.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Cell, Row, Table};
use ratatui::Frame;

use super::{header_style, placeholder, status_text, tab_block};
use crate::tui::{DashboardTab, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = tab_block(DashboardTab::Suggestions);
    let snapshot = &state.snapshot;
    if snapshot.suggestions.is_empty() {
        let text = match snapshot.league {
            Some(_) => "Every roster is balanced; no suggestions".to_string(),
            None => status_text(&snapshot.league_status, "No league loaded"),
        };
        frame.render_widget(placeholder(text, block), area);
        return;
    }

    // Highlight pairings that involve my team.
    let me = snapshot
        .my_roster
        .as_ref()
        .and_then(|r| snapshot.teams.iter().find(|t| t.roster_id == r.roster_id))
        .map(|t| t.owner_name.clone());

    let offset = state.scroll_offset.get("suggestions").copied().unwrap_or(0);
    let visible = (area.height as usize).saturating_sub(3);
    let offset = offset.min(snapshot.suggestions.len().saturating_sub(visible));

    let rows: Vec<Row> = snapshot
        .suggestions
        .iter()
        .skip(offset)
        .map(|s| {
            let mine = me
                .as_deref()
                .is_some_and(|name| name == s.from_team || name == s.to_team);
            let style = if mine {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(s.position.code()),
                Cell::from(format!("{} → {}", s.from_team, s.to_team)),
                Cell::from(s.note.clone()),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["Pos", "From → To", "Why"]).style(header_style());
    let widths = [
        Constraint::Length(4),
        Constraint::Length(28),
        Constraint::Min(20),
    ];
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::loaded_snapshot;
    use huddle_football::position::Position;
    use huddle_football::suggestions::TradeSuggestion;

    fn draw(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(100, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, frame.area(), state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn lists_suggestions() {
        let mut state = ViewState::default();
        let mut snapshot = loaded_snapshot();
        snapshot.suggestions = vec![TradeSuggestion {
            from_team: "bob".into(),
            to_team: "alice".into(),
            position: Position::QB,
            note: "alice needs QB; bob has surplus QB.".into(),
        }];
        state.apply_snapshot(snapshot);
        let text = draw(&state);
        assert!(text.contains("bob → alice"));
    }

    #[test]
    fn balanced_league_message() {
        let mut state = ViewState::default();
        state.apply_snapshot(loaded_snapshot());
        assert!(draw(&state).contains("balanced"));
    }
}
