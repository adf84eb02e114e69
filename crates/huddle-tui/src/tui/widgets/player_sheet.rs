// Player sheet: bio, the season stat line, and the weekly game log for one
// player and season.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use huddle_app::protocol::{LoadStatus, PlayerSheetView};
use huddle_football::player::PlayerInfo;
use huddle_football::stats::{GameLog, StatLine};

use super::{format_rank, header_style, panel, placeholder};
use crate::tui::layout::sheet_layout;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(sheet) = &state.snapshot.player_sheet else {
        frame.render_widget(placeholder("Loading...", panel("Player".into(), false)), area);
        return;
    };
    let layout = sheet_layout(area);

    let title = format!("{} ({})", sheet.player.display_name(), sheet.player.position);
    frame.render_widget(
        Paragraph::new(overview_lines(sheet)).block(panel(title, false)),
        layout.overview,
    );

    let season_block = panel(format!("{} Season", sheet.season), false);
    match season_message(sheet) {
        Some(message) => frame.render_widget(placeholder(message, season_block), layout.season),
        None => {
            let line = sheet
                .report
                .as_ref()
                .and_then(|r| r.season_line)
                .unwrap_or_default();
            frame.render_widget(
                Paragraph::new(season_lines(&line)).block(season_block),
                layout.season,
            );
        }
    }

    render_game_log(frame, layout.game_log, state, sheet);
}

/// Text shown instead of stats while the report is missing or empty.
fn season_message(sheet: &PlayerSheetView) -> Option<String> {
    match &sheet.status {
        LoadStatus::Idle | LoadStatus::Loading => return Some("Loading stats...".into()),
        LoadStatus::Failed(message) => return Some(format!("Stats unavailable: {message}")),
        LoadStatus::Ready => {}
    }
    match &sheet.report {
        Some(report) if report.matched.is_none() => {
            Some(format!("No stats found for {}", sheet.season))
        }
        Some(report) if report.season_line.is_none() => {
            Some(format!("No {} season totals", sheet.season))
        }
        Some(_) => None,
        None => Some(format!("No stats found for {}", sheet.season)),
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn field(label: &str, value: String) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!("{label}: "), header_style()),
        Span::raw(format!("{value}   ")),
    ]
}

fn overview_lines(sheet: &PlayerSheetView) -> Vec<Line<'static>> {
    let player: &PlayerInfo = &sheet.player;
    let rank = format_rank(player.known_rank());
    let team = player.team.clone().unwrap_or_else(|| "FA".to_string());
    let number = player.number.map(|n| format!("#{n}")).unwrap_or_default();

    let mut status = vec![Span::styled("Status: ", header_style())];
    status.push(Span::raw(opt(&player.status)));
    if let Some(injury) = player.injury_status.as_deref().filter(|s| !s.is_empty()) {
        status.push(Span::styled(
            format!(" ({injury})"),
            Style::default().fg(Color::Red),
        ));
    }
    status.push(Span::raw("   "));
    status.extend(field(
        "Fantasy team",
        sheet.owner.clone().unwrap_or_else(|| "Free agent".to_string()),
    ));

    vec![
        Line::from(
            [
                field("Team", format!("{team} {number}").trim_end().to_string()),
                field("Rank", rank),
                field("Age", opt(&player.age)),
                field("Exp", opt(&player.years_exp)),
            ]
            .concat(),
        ),
        Line::from(
            [
                field("Height", opt(&player.height)),
                field("Weight", opt(&player.weight)),
                field("College", opt(&player.college)),
            ]
            .concat(),
        ),
        Line::from(status),
        match sheet.report.as_ref().and_then(|r| r.matched.as_ref()) {
            Some(matched) => Line::from(Span::styled(
                format!(
                    "Stats matched: {} ({} {})",
                    matched.name,
                    matched.team.as_deref().unwrap_or("-"),
                    matched.position.as_deref().unwrap_or("-")
                ),
                Style::default().fg(Color::DarkGray),
            )),
            None => Line::default(),
        },
    ]
}

fn pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| "-".to_string())
}

fn avg(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "-".to_string())
}

/// The season totals, one line per stat family.
pub fn season_lines(line: &StatLine) -> Vec<Line<'static>> {
    let passing = &line.passing;
    let rushing = &line.rushing;
    let receiving = &line.receiving;
    vec![
        Line::from(
            [
                field("Fantasy", format!("{:.1}", line.fantasy_points)),
                field("PPR", format!("{:.1}", line.fantasy_points_ppr)),
                field("Games", format!("{:.0}", line.games_played)),
            ]
            .concat(),
        ),
        Line::from(field(
            "Passing",
            format!(
                "{:.0}/{:.0} ({}) {:.0} yds {:.0} TD {:.0} INT",
                passing.completions,
                passing.attempts,
                pct(line.completion_pct()),
                passing.yards,
                passing.touchdowns,
                passing.interceptions
            ),
        )),
        Line::from(field(
            "Rushing",
            format!(
                "{:.0} att {:.0} yds ({} ypc) {:.0} TD",
                rushing.attempts,
                rushing.yards,
                avg(line.yards_per_carry()),
                rushing.touchdowns
            ),
        )),
        Line::from(field(
            "Receiving",
            format!(
                "{:.0}/{:.0} tgt ({}) {:.0} yds {:.0} TD",
                receiving.receptions,
                receiving.targets,
                pct(line.catch_rate().map(|r| r * 100.0)),
                receiving.yards,
                receiving.touchdowns
            ),
        )),
        Line::from(field("Fumbles lost", format!("{:.0}", line.fumbles_lost))),
    ]
}

fn opponent(game: &GameLog) -> String {
    let name = game.opponent.as_deref().unwrap_or("-");
    match game.home_or_away.as_deref() {
        Some("AWAY") => format!("@{name}"),
        _ => name.to_string(),
    }
}

fn render_game_log(frame: &mut Frame, area: Rect, state: &ViewState, sheet: &PlayerSheetView) {
    let block = panel("Game Log".into(), false);
    let logs = match &sheet.report {
        Some(report) if sheet.status == LoadStatus::Ready && !report.game_logs.is_empty() => {
            &report.game_logs
        }
        _ => {
            let text = if sheet.status == LoadStatus::Ready {
                "No games logged"
            } else {
                ""
            };
            frame.render_widget(placeholder(text, block), area);
            return;
        }
    };

    let visible = (area.height as usize).saturating_sub(3);
    let offset = state
        .scroll_offset
        .get("game_log")
        .copied()
        .unwrap_or(0)
        .min(logs.len().saturating_sub(visible));

    let rows: Vec<Row> = logs
        .iter()
        .skip(offset)
        .map(|game| {
            let l = &game.line;
            let style = if game.is_game_over {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(game.week.to_string()),
                Cell::from(opponent(game)),
                Cell::from(format!("{:.0}/{:.0}", l.passing.completions, l.passing.attempts)),
                Cell::from(format!("{:.0}", l.passing.yards)),
                Cell::from(format!("{:.0}", l.rushing.yards)),
                Cell::from(format!("{:.0}/{:.0}", l.receiving.receptions, l.receiving.targets)),
                Cell::from(format!("{:.0}", l.receiving.yards)),
                Cell::from(format!(
                    "{:.0}",
                    l.passing.touchdowns + l.rushing.touchdowns + l.receiving.touchdowns
                )),
                Cell::from(format!("{:.1}", l.fantasy_points)),
                Cell::from(format!("{:.1}", l.fantasy_points_ppr)),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec![
        "Wk", "Opp", "Cmp", "PYd", "RYd", "Rec", "ReYd", "TD", "Pts", "PPR",
    ])
    .style(header_style());
    let widths = [
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(6),
        Constraint::Length(6),
    ];
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
