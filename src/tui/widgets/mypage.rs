// src/tui/widgets/mypage.rs - Profile, history table and the password dialog.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::pages::mypage::{MyPage, PasswordDialog, ProfileView};
use crate::tui::theme::Theme;

use super::centered_rect;

/// `password_focus` picks the dialog field: 0 current, 1 new, 2 confirm.
pub fn render(
    f: &mut Frame,
    area: Rect,
    page: &MyPage,
    profile: &ProfileView,
    password_focus: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(5),
        ])
        .split(area);

    let p = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("  Name          ", Theme::text_dim()),
            Span::styled(profile.name.clone(), Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Email         ", Theme::text_dim()),
            Span::styled(profile.email.clone(), Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("  Member since  ", Theme::text_dim()),
            Span::styled(profile.member_since.clone(), Theme::text()),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" My page ", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, chunks[0]);

    let status = if let Some(e) = page.error() {
        Line::from(Span::styled(format!(" {e}"), Theme::error()))
    } else if let Some(n) = page.notice() {
        Line::from(Span::styled(format!(" {n}"), Theme::success()))
    } else if page.is_history_loading() {
        Line::from(Span::styled(" Loading history...", Theme::warning()))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status), chunks[1]);

    render_history(f, chunks[2], page);

    if page.password.open {
        render_password_dialog(f, area, &page.password, password_focus);
    }
}

fn render_history(f: &mut Frame, area: Rect, page: &MyPage) {
    let block = Block::default()
        .title(" Analysis history (h to show/hide) ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if !page.is_history_open() {
        let p = Paragraph::new(Span::styled("  Hidden.", Theme::text_dim())).block(block);
        f.render_widget(p, area);
        return;
    }
    let rows = page.history_rows();
    if rows.is_empty() {
        let p = Paragraph::new(Span::styled("  No analyses yet.", Theme::text_dim())).block(block);
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(
        ["ID", "Analyzed", "File", "Summary"]
            .into_iter()
            .map(|h| Cell::from(h).style(Theme::table_header())),
    );
    let table_rows: Vec<Row> = rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.id.to_string()).style(Theme::text_dim()),
                Cell::from(r.created_at.clone()).style(Theme::text_dim()),
                Cell::from(r.file_name.clone()).style(Theme::text()),
                Cell::from(r.summary.clone()).style(Theme::text_dim()),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Length(28),
        Constraint::Min(20),
    ];
    let table = Table::new(table_rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Theme::table_selected())
        .highlight_symbol(">> ");

    let mut state = TableState::default().with_selected(Some(page.selected_index()));
    f.render_stateful_widget(table, area, &mut state);
}

fn render_password_dialog(f: &mut Frame, area: Rect, dialog: &PasswordDialog, focus: usize) {
    let popup = centered_rect(60, 9, area);
    f.render_widget(Clear, popup);

    let field = |i: usize, label: &str, value: &str| {
        let style = if i == focus {
            Theme::highlight()
        } else {
            Theme::text_dim()
        };
        Line::from(vec![
            Span::styled(format!("  {label:<18}"), style),
            Span::styled("*".repeat(value.chars().count()), Theme::text()),
        ])
    };

    let mut lines = vec![
        field(0, "Current password", &dialog.current_password),
        field(1, "New password", &dialog.new_password),
        field(2, "Confirm", &dialog.confirm_password),
        Line::from(""),
    ];
    match (&dialog.error, dialog.submitting) {
        (_, true) => lines.push(Line::from(Span::styled("  Changing...", Theme::warning()))),
        (Some(e), false) => lines.push(Line::from(Span::styled(format!("  {e}"), Theme::error()))),
        (None, false) => lines.push(Line::from(Span::styled(
            "  Tab next field  Enter submit  Esc cancel",
            Theme::key_desc(),
        ))),
    }

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(" Change password ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focus()),
    );
    f.render_widget(p, popup);
}
