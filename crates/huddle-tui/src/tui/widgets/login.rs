// Login screen: username and password fields in a centered box.
//
// Sign-in is local only; any non-empty pair is accepted by the app.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::quit_confirm::centered_rect;
use crate::tui::{LoginField, ViewState};

const FORM_WIDTH: u16 = 44;
const FORM_HEIGHT: u16 = 8;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form_area = centered_rect(FORM_WIDTH, FORM_HEIGHT, area);
    frame.render_widget(Clear, form_area);

    let form = &state.login;
    let masked = "*".repeat(form.password.chars().count());
    let lines = vec![
        Line::from(""),
        field_line("Username", &form.username, form.field == LoginField::Username),
        Line::from(""),
        field_line("Password", &masked, form.field == LoginField::Password),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter to sign in",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Sign in to huddle "),
    );
    frame.render_widget(paragraph, form_area);
}

fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let value_style = if active {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if active { "_" } else { "" };
    Line::from(vec![
        Span::styled(
            format!("  {label:<9}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {value}{cursor} "), value_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 20);
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
    fn password_is_masked() {
        let mut state = ViewState::default();
        state.login.username = "alice".into();
        state.login.password = "hunter2".into();
        let text = rendered(&state);
        assert!(text.contains("alice"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("*******"));
    }
}
