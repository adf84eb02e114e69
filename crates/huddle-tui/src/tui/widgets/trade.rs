// Trade calculator: pick outgoing players from my roster, search the
// league for incoming ones, and read the valuation underneath.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, Paragraph};
use ratatui::Frame;

use huddle_app::protocol::PlayerRow;
use huddle_football::trade::{PlayerValue, TradeAnalysis, Verdict};

use super::roster::needs_lines;
use super::{cursor_style, format_rank, header_style, panel, placeholder, player_label, window_start};
use crate::tui::layout::trade_layout;
use crate::tui::{TextTarget, TradeFocus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let layout = trade_layout(area);
    let trade = &state.snapshot.trade;

    if state.snapshot.my_roster.is_none() {
        frame.render_widget(
            placeholder(
                "Pick your team first",
                panel("My Players".into(), false),
            ),
            layout.my_players,
        );
    } else {
        render_list(
            frame,
            layout.my_players,
            state,
            TradeFocus::MyPlayers,
            format!("My Players ({})", trade.my_players.len()),
            "Your roster is empty",
        );
    }

    render_search(frame, layout.search, state);
    render_proposal(frame, layout.proposal, state);
    render_analysis(frame, layout.analysis, state);
}

fn player_items(
    rows: &[PlayerRow],
    cursor: Option<usize>,
    visible: usize,
    show_owner: bool,
) -> Vec<ListItem<'static>> {
    let start = cursor.map(|c| window_start(c, visible)).unwrap_or(0);
    rows.iter()
        .enumerate()
        .skip(start)
        .map(|(i, player)| {
            let mut spans = vec![
                Span::styled(
                    format!("{:>4} ", format_rank(player.rank)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(player_label(player)),
            ];
            if show_owner {
                if let Some(owner) = &player.owner {
                    spans.push(Span::styled(
                        format!("  {owner}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            let item = ListItem::new(Line::from(spans));
            if cursor == Some(i) {
                item.style(cursor_style())
            } else {
                item
            }
        })
        .collect()
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    focus: TradeFocus,
    title: String,
    empty: &str,
) {
    let focused = state.trade_focus == focus;
    let block = panel(title, focused);
    let rows = state.trade_list(focus);
    if rows.is_empty() {
        frame.render_widget(placeholder(empty, block), area);
        return;
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let cursor = focused.then(|| state.clamped_cursor(focus.key(), rows.len()));
    let show_owner = focus != TradeFocus::MyPlayers;
    frame.render_widget(
        List::new(player_items(rows, cursor, inner.height as usize, show_owner)),
        inner,
    );
}

fn render_search(frame: &mut Frame, area: Rect, state: &ViewState) {
    let trade = &state.snapshot.trade;
    let focused = state.trade_focus == TradeFocus::Results;
    let typing = state.input == Some(TextTarget::Search);
    let block = panel("Search League".into(), focused || typing);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [prompt_area, results_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

    let prompt = if typing {
        Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(state.input_text.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if trade.search_query.is_empty() {
        Line::from(Span::styled(
            "Press / to search other rosters",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled("Query: ", header_style()),
            Span::raw(trade.search_query.clone()),
        ])
    };
    frame.render_widget(Paragraph::new(prompt), prompt_area);

    let rows = &trade.search_results;
    if rows.is_empty() {
        let text = if trade.search_query.is_empty() {
            ""
        } else {
            "  No matching players"
        };
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
            results_area,
        );
        return;
    }
    let cursor = focused.then(|| state.clamped_cursor(TradeFocus::Results.key(), rows.len()));
    frame.render_widget(
        List::new(player_items(rows, cursor, results_area.height as usize, true)),
        results_area,
    );
}

fn render_proposal(frame: &mut Frame, area: Rect, state: &ViewState) {
    let trade = &state.snapshot.trade;
    let focused = matches!(state.trade_focus, TradeFocus::Outgoing | TradeFocus::Incoming);
    let block = panel("Proposal".into(), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [out_area, in_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    for (focus, rows, title, sub_area) in [
        (TradeFocus::Outgoing, &trade.outgoing, "You give", out_area),
        (TradeFocus::Incoming, &trade.incoming, "You get", in_area),
    ] {
        let active = state.trade_focus == focus;
        let title_style = if active {
            header_style().fg(Color::Cyan)
        } else {
            header_style()
        };
        let [title_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(sub_area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{title} ({})", rows.len()),
                title_style,
            ))),
            title_area,
        );
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new("  (none)").style(Style::default().fg(Color::DarkGray)),
                list_area,
            );
            continue;
        }
        let cursor = active.then(|| state.clamped_cursor(focus.key(), rows.len()));
        frame.render_widget(
            List::new(player_items(
                rows,
                cursor,
                list_area.height as usize,
                focus == TradeFocus::Incoming,
            )),
            list_area,
        );
    }
}

fn render_analysis(frame: &mut Frame, area: Rect, state: &ViewState) {
    let trade = &state.snapshot.trade;
    let block = panel("Analysis".into(), false);
    let Some(analysis) = &trade.analysis else {
        frame.render_widget(placeholder("Add at least one player to each side", block), area);
        return;
    };
    frame.render_widget(
        Paragraph::new(analysis_lines(analysis, trade.stats_pending)).block(block),
        area,
    );
}

pub fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Beneficial => Color::Green,
        Verdict::Neutral => Color::Yellow,
        Verdict::Hurts => Color::Red,
    }
}

fn value_line(side: &str, values: &[PlayerValue]) -> Line<'static> {
    let mut spans = vec![Span::styled(format!("{side}: "), header_style())];
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        let marker = if value.has_stats { "" } else { "*" };
        spans.push(Span::raw(format!(
            "{} {} {:.1}{marker}",
            value.name, value.position, value.value
        )));
    }
    Line::from(spans)
}

pub fn analysis_lines(analysis: &TradeAnalysis, stats_pending: usize) -> Vec<Line<'static>> {
    let mut verdict = vec![
        Span::styled(
            analysis.verdict.label(),
            Style::default()
                .fg(verdict_color(analysis.verdict))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "   give {:.1}  get {:.1}  net {:+.1}",
            analysis.my_value, analysis.target_value, analysis.net_value
        )),
    ];
    if stats_pending > 0 {
        verdict.push(Span::styled(
            format!("   stats loading ({stats_pending})"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut lines = vec![
        Line::from(verdict),
        value_line("Give", &analysis.outgoing),
        value_line("Get", &analysis.incoming),
    ];
    if analysis
        .outgoing
        .iter()
        .chain(&analysis.incoming)
        .any(|v| !v.has_stats)
    {
        lines.push(Line::from(Span::styled(
            "* valued on rank only",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(Span::styled("After the trade:", header_style())));
    lines.extend(needs_lines(&analysis.needs_after));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::test_support::{loaded_snapshot, row};
    use crate::tui::Screen;
    use huddle_football::needs::RosterNeeds;
    use huddle_football::position::Position;

    fn buffer_text(state: &ViewState, width: u16, height: u16) -> String {
        let backend = ratatui::backend::TestBackend::new(width, height);
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

    fn value(id: &str, name: &str, position: Position, value: f64, has_stats: bool) -> PlayerValue {
        PlayerValue {
            player_id: id.into(),
            name: name.into(),
            position,
            value,
            has_stats,
        }
    }

    fn analysis(net: f64) -> TradeAnalysis {
        TradeAnalysis {
            outgoing: vec![value("w1", "Wes Alpha", Position::WR, 90.0, true)],
            incoming: vec![value("q2", "Quinn Beta", Position::QB, 90.0 + net, false)],
            my_value: 90.0,
            target_value: 90.0 + net,
            net_value: net,
            verdict: Verdict::from_net(net),
            needs_after: RosterNeeds::default(),
        }
    }

    fn trade_state() -> ViewState {
        let mut state = ViewState::default();
        state.apply_snapshot(loaded_snapshot());
        state.screen = Screen::Trade;
        state.snapshot.trade.my_players = vec![
            row("q1", "Quinn Alpha", Position::QB),
            row("w1", "Wes Alpha", Position::WR),
        ];
        state
    }

    #[test]
    fn empty_proposal_prompts_for_players() {
        let text = buffer_text(&trade_state(), 120, 30);
        assert!(text.contains("My Players (2)"));
        assert!(text.contains("Press / to search"));
        assert!(text.contains("Add at least one player to each side"));
    }

    #[test]
    fn proposal_lists_both_sides_with_owner() {
        let mut state = trade_state();
        state.snapshot.trade.outgoing = vec![row("w1", "Wes Alpha", Position::WR)];
        let mut incoming = row("q2", "Quinn Beta", Position::QB);
        incoming.owner = Some("bob's Team".into());
        state.snapshot.trade.incoming = vec![incoming];
        state.snapshot.trade.analysis = Some(analysis(62.5));
        state.snapshot.trade.stats_pending = 1;

        let text = buffer_text(&state, 140, 34);
        assert!(text.contains("You give (1)"));
        assert!(text.contains("You get (1)"));
        assert!(text.contains("bob's Team"));
        assert!(text.contains("Good Trade"));
        assert!(text.contains("net +62.5"));
        assert!(text.contains("stats loading (1)"));
        assert!(text.contains("valued on rank only"));
    }

    #[test]
    fn search_prompt_shows_typed_text() {
        let mut state = trade_state();
        state.input = Some(TextTarget::Search);
        state.input_text = "quin".into();
        let text = buffer_text(&state, 120, 30);
        assert!(text.contains("/quin"));
    }

    #[test]
    fn search_without_results() {
        let mut state = trade_state();
        state.snapshot.trade.search_query = "zzz".into();
        let text = buffer_text(&state, 120, 30);
        assert!(text.contains("Query: zzz"));
        assert!(text.contains("No matching players"));
    }

    #[test]
    fn no_roster_selected() {
        let mut state = trade_state();
        state.snapshot.my_roster = None;
        let text = buffer_text(&state, 120, 30);
        assert!(text.contains("Pick your team first"));
    }

    #[test]
    fn verdict_colors() {
        assert_eq!(verdict_color(Verdict::Beneficial), Color::Green);
        assert_eq!(verdict_color(Verdict::Neutral), Color::Yellow);
        assert_eq!(verdict_color(Verdict::Hurts), Color::Red);
    }

    #[test]
    fn analysis_lines_mark_stat_backed_values() {
        let lines = analysis_lines(&analysis(-60.0), 0);
        let first: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(first.starts_with("Bad Trade"));
        assert!(first.contains("net -60.0"));
        assert!(!first.contains("stats loading"));
        let give: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(give, "Give: Wes Alpha WR 90.0");
        let get: String = lines[2].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(get, "Get: Quinn Beta QB 30.0*");
    }
}
