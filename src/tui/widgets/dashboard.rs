// src/tui/widgets/dashboard.rs - File path input, upload status and the result.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::pages::dashboard::{DashboardPage, DashboardStatus};
use crate::pages::result_view::ResultView;
use crate::tui::theme::Theme;

use super::result;

pub fn render(f: &mut Frame, area: Rect, page: &DashboardPage, input: &str, analysis_origin: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
        ])
        .split(area);

    let input_box = Paragraph::new(Line::from(vec![
        Span::styled(" ", Theme::text()),
        Span::styled(input.to_string(), Theme::text()),
        Span::styled("_", Theme::key_hint()),
    ]))
    .block(
        Block::default()
            .title(" File to analyze (.csv .json .xlsx .xls) ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focus()),
    );
    f.render_widget(input_box, chunks[0]);
    f.render_widget(Paragraph::new(status_line(page)), chunks[1]);

    match page.result() {
        Some(r) => result::render(f, chunks[2], &ResultView::build(r, analysis_origin)),
        None => {
            let hint = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Type the path of a data file and press Enter.",
                    Theme::text_dim(),
                )),
                Line::from(Span::styled(
                    "  Statistics and charts appear here once the analysis finishes.",
                    Theme::text_dim(),
                )),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            );
            f.render_widget(hint, chunks[2]);
        }
    }
}

fn status_line(page: &DashboardPage) -> Line<'static> {
    match page.status() {
        DashboardStatus::Error => Line::from(Span::styled(
            format!(" {}", page.error().unwrap_or_default()),
            Theme::error(),
        )),
        DashboardStatus::Analyzing => Line::from(Span::styled(
            format!(
                " Analyzing {}...",
                page.selected_file().map(|f| f.name()).unwrap_or_default()
            ),
            Theme::warning(),
        )),
        DashboardStatus::FileSelected => Line::from(Span::styled(
            format!(
                " Selected {}",
                page.selected_file().map(|f| f.name()).unwrap_or_default()
            ),
            Theme::info(),
        )),
        DashboardStatus::ResultShown => Line::from(Span::styled(" Analysis complete", Theme::success())),
        DashboardStatus::Idle => Line::from(Span::styled(" No file selected", Theme::text_dim())),
    }
}
