// Roster widget: my team grouped into starters, bench, injured reserve and
// taxi, with the need estimate underneath.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use ratatui::Frame;

use huddle_app::protocol::{LoadStatus, PlayerRow};
use huddle_football::needs::RosterNeeds;
use huddle_football::position::Position;

use super::{cursor_style, format_rank, panel, placeholder, player_label, window_start};
use crate::tui::{DashboardFocus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.dashboard_focus == DashboardFocus::Roster;
    let Some(view) = &state.snapshot.my_roster else {
        let text = if state.snapshot.league_status == LoadStatus::Ready {
            "Pick your team in the Teams list (Enter)"
        } else {
            "No roster selected"
        };
        frame.render_widget(placeholder(text, panel("My Roster".into(), focused)), area);
        return;
    };

    let block = panel(format!("My Roster: {}", view.label), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [list_area, needs_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

    let sections: [(&str, &[PlayerRow]); 4] = [
        ("Starters", view.starters.as_slice()),
        ("Bench", view.bench.as_slice()),
        ("Injured Reserve", view.reserve.as_slice()),
        ("Taxi", view.taxi.as_slice()),
    ];
    let total: usize = sections.iter().map(|(_, rows)| rows.len()).sum();
    let cursor = state.clamped_cursor("roster", total);

    // (line, is the cursor row) for every header and player.
    let mut lines: Vec<(Line, bool)> = Vec::new();
    let mut index = 0;
    for (title, rows) in sections {
        if rows.is_empty() {
            continue;
        }
        lines.push((
            Line::from(Span::styled(
                format!("{title} ({})", rows.len()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            false,
        ));
        for player in rows {
            lines.push((player_line(player), focused && index == cursor));
            index += 1;
        }
    }

    let cursor_line = lines.iter().position(|(_, selected)| *selected).unwrap_or(0);
    let start = window_start(cursor_line, list_area.height as usize);
    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(start)
        .map(|(line, selected)| {
            let item = ListItem::new(line);
            if selected {
                item.style(cursor_style())
            } else {
                item
            }
        })
        .collect();
    frame.render_widget(List::new(items), list_area);

    frame.render_widget(Paragraph::new(needs_lines(&view.needs)), needs_area);
}

fn player_line(player: &PlayerRow) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:>4} ", format_rank(player.rank)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(player_label(player)),
    ])
}

/// Position counts against targets, then the need profile.
pub fn needs_lines(needs: &RosterNeeds) -> Vec<Line<'static>> {
    let mut counts: Vec<Span> = Vec::new();
    for position in Position::TRACKED {
        let have = needs.counts.get(position);
        let target = position.target().unwrap_or(0);
        let color = if needs.profile.deficit.contains(&position) {
            Color::Red
        } else if needs.profile.surplus.contains(&position) {
            Color::Green
        } else {
            Color::White
        };
        counts.push(Span::styled(
            format!("{position} {have}/{target}  "),
            Style::default().fg(color),
        ));
    }
    vec![Line::from(counts), Line::from(needs_summary(needs))]
}

pub fn needs_summary(needs: &RosterNeeds) -> String {
    let join = |positions: &[Position]| {
        if positions.is_empty() {
            "none".to_string()
        } else {
            positions
                .iter()
                .map(|p| p.code())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    format!(
        "Needs: {} | Surplus: {}",
        join(&needs.profile.deficit),
        join(&needs.profile.surplus)
    )
}
