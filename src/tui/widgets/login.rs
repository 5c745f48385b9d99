// src/tui/widgets/login.rs - Email/password form.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::pages::auth::LoginForm;
use crate::tui::theme::Theme;

use super::centered_rect;

pub fn render(f: &mut Frame, area: Rect, form: &LoginForm, focus_password: bool, notice: Option<&str>) {
    let popup = centered_rect(60, 10, area);
    f.render_widget(Clear, popup);

    let label = |focused: bool, text: &str| {
        Span::styled(
            format!("  {text:<10}"),
            if focused { Theme::highlight() } else { Theme::text_dim() },
        )
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            label(!focus_password, "Email"),
            Span::styled(form.email.clone(), Theme::text()),
        ]),
        Line::from(vec![
            label(focus_password, "Password"),
            Span::styled("*".repeat(form.password.chars().count()), Theme::text()),
        ]),
        Line::from(""),
    ];
    if form.is_loading() {
        lines.push(Line::from(Span::styled("  Logging in...", Theme::warning())));
    } else if let Some(e) = form.error() {
        lines.push(Line::from(Span::styled(format!("  {e}"), Theme::error())));
    } else if let Some(n) = notice {
        lines.push(Line::from(Span::styled(format!("  {n}"), Theme::success())));
    }
    lines.push(Line::from(Span::styled(
        "  No account? Press Ctrl-N to sign up.",
        Theme::text_dim(),
    )));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Log in ", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border_focus()),
    );
    f.render_widget(p, popup);
}
