// Schedule tab: my matchup for every week up to the current one.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Cell, Row, Table};
use ratatui::Frame;

use huddle_football::league::{Outcome, ScheduleRow};

use super::{header_style, placeholder, status_text, tab_block};
use crate::tui::{DashboardTab, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = tab_block(DashboardTab::Schedule);
    let snapshot = &state.snapshot;
    if snapshot.my_roster.is_none() {
        frame.render_widget(placeholder("Pick your team to see its schedule", block), area);
        return;
    }
    if snapshot.schedule.is_empty() {
        let text = status_text(&snapshot.schedule_status, "No schedule yet");
        frame.render_widget(placeholder(text, block), area);
        return;
    }

    let offset = state.scroll_offset.get("schedule").copied().unwrap_or(0);
    let visible = (area.height as usize).saturating_sub(3);
    let offset = offset.min(snapshot.schedule.len().saturating_sub(visible));

    let rows: Vec<Row> = snapshot
        .schedule
        .iter()
        .skip(offset)
        .map(|row| {
            let mut style = outcome_style(row.outcome);
            if Some(row.week) == snapshot.current_week {
                style = style.add_modifier(Modifier::BOLD);
            }
            Row::new(vec![
                Cell::from(row.week.to_string()),
                Cell::from(row.opponent.label().to_string()),
                Cell::from(score(row)),
                Cell::from(row.outcome.map(|o| o.letter()).unwrap_or("")),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["Wk", "Opponent", "Score", ""]).style(header_style());
    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(17),
        Constraint::Length(2),
    ];
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}

fn outcome_style(outcome: Option<Outcome>) -> Style {
    match outcome {
        Some(Outcome::Win) => Style::default().fg(Color::Green),
        Some(Outcome::Loss) => Style::default().fg(Color::Red),
        Some(Outcome::Tie) => Style::default().fg(Color::Yellow),
        None => Style::default(),
    }
}

/// "mine - theirs", or a dash before any points exist.
pub fn score(row: &ScheduleRow) -> String {
    match (row.my_points, row.opponent_points) {
        (Some(mine), Some(theirs)) => format!("{mine:.2} - {theirs:.2}"),
        (Some(mine), None) => format!("{mine:.2}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::loaded_snapshot;
    use huddle_football::league::Opponent;

    fn row(week: u32, opponent: Opponent, mine: Option<f64>, theirs: Option<f64>) -> ScheduleRow {
        ScheduleRow {
            week,
            opponent,
            my_points: mine,
            opponent_points: theirs,
            outcome: None,
        }
    }

    #[test]
    fn score_formats() {
        let team = Opponent::Team {
            roster_id: 2,
            label: "bob's Team".into(),
        };
        assert_eq!(score(&row(1, team.clone(), Some(101.5), Some(99.0))), "101.50 - 99.00");
        assert_eq!(score(&row(2, Opponent::Tbd, Some(80.0), None)), "80.00");
        assert_eq!(score(&row(3, Opponent::Bye, None, None)), "-");
    }

    #[test]
    fn render_with_and_without_rows() {
        let backend = ratatui::backend::TestBackend::new(60, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        terminal.draw(|frame| render(frame, frame.area(), &state)).unwrap();

        let mut snapshot = loaded_snapshot();
        snapshot.schedule = vec![row(1, Opponent::Bye, None, None)];
        state.apply_snapshot(snapshot);
        terminal.draw(|frame| render(frame, frame.area(), &state)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("BYE"));
    }
}
