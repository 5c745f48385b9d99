// src/tui/widgets/signup.rs - Account creation form.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::pages::auth::SignupForm;
use crate::tui::theme::Theme;

use super::centered_rect;

pub fn render(f: &mut Frame, area: Rect, form: &SignupForm, focus: usize) {
    let popup = centered_rect(60, 10, area);
    f.render_widget(Clear, popup);

    let masked = |v: &str| "*".repeat(v.chars().count());
    let fields = [
        ("Name", form.name.clone()),
        ("Email", form.email.clone()),
        ("Password", masked(&form.password)),
        ("Confirm", masked(&form.confirm_password)),
    ];

    let mut lines = vec![Line::from("")];
    for (i, (label, value)) in fields.into_iter().enumerate() {
        let style = if i == focus {
            Theme::highlight()
        } else {
            Theme::text_dim()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<10}"), style),
            Span::styled(value, Theme::text()),
        ]));
    }
    lines.push(Line::from(""));
    if form.is_loading() {
        lines.push(Line::from(Span::styled("  Creating account...", Theme::warning())));
    } else if let Some(e) = form.error() {
        lines.push(Line::from(Span::styled(format!("  {e}"), Theme::error())));
    } else {
        lines.push(Line::from(Span::styled(
            "  Password needs at least 6 characters.",
            Theme::text_dim(),
        )));
    }

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Sign up ", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border_focus()),
    );
    f.render_widget(p, popup);
}
