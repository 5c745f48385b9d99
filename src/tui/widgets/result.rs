// src/tui/widgets/result.rs - Immediate analysis result: header, columns, stats, charts.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::pages::result_view::ResultView;
use crate::tui::theme::Theme;

pub fn render(f: &mut Frame, area: Rect, view: &ResultView) {
    let chart_height = (view.charts.len() as u16).saturating_mul(2) + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(chart_height.max(3)),
        ])
        .split(area);

    render_header(f, chunks[0], view);
    render_columns(f, chunks[1], view);
    render_stats(f, chunks[2], view);
    render_charts(f, chunks[3], view);
}

fn render_header(f: &mut Frame, area: Rect, view: &ResultView) {
    let mut lines = vec![Line::from(vec![
        Span::styled("  Rows ", Theme::text_dim()),
        Span::styled(view.row_count.clone(), Theme::highlight()),
        Span::styled("   Columns ", Theme::text_dim()),
        Span::styled(view.column_count.clone(), Theme::highlight()),
    ])];
    if !view.summary.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", view.summary),
            Theme::text(),
        )));
    }

    let title = match &view.detail_path {
        Some(_) => format!(" {} (saved, ^O opens details) ", view.file_name),
        None => format!(" {} ", view.file_name),
    };
    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled(title, Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_columns(f: &mut Frame, area: Rect, view: &ResultView) {
    let mut spans = vec![Span::raw(" ")];
    for chip in &view.column_chips {
        spans.push(Span::styled(format!("[{chip}]"), Theme::info()));
        spans.push(Span::raw(" "));
    }
    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(format!(" Columns ({}) ", view.column_chips.len()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_stats(f: &mut Frame, area: Rect, view: &ResultView) {
    let header = Row::new(
        ["Column", "Type", "Count", "Unique", "Missing", "Mean", "Min", "Max"]
            .into_iter()
            .map(|h| Cell::from(h).style(Theme::table_header())),
    );

    let rows: Vec<Row> = view
        .stat_rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.column.clone()).style(Theme::text()),
                Cell::from(r.data_type.clone()).style(Theme::type_tag(r.type_class)),
                Cell::from(r.count.clone()).style(Theme::text()),
                Cell::from(r.unique.clone()).style(Theme::text()),
                Cell::from(r.missing.clone()).style(Theme::missing(r.missing_emphasis)),
                Cell::from(r.mean.clone()).style(Theme::text_dim()),
                Cell::from(r.min.clone()).style(Theme::text_dim()),
                Cell::from(r.max.clone()).style(Theme::text_dim()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Statistics ")
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(table, area);
}

fn render_charts(f: &mut Frame, area: Rect, view: &ResultView) {
    let block = Block::default()
        .title(format!(" Charts ({}) ", view.charts.len()))
        .borders(Borders::ALL)
        .border_style(Theme::border());

    if view.charts.is_empty() {
        let p = Paragraph::new(Span::styled("  No charts generated.", Theme::text_dim())).block(block);
        f.render_widget(p, area);
        return;
    }

    let lines: Vec<Line> = view
        .charts
        .iter()
        .flat_map(|c| {
            [
                Line::from(vec![
                    Span::styled(format!("  {}", c.title), Theme::text()),
                    Span::styled(format!("  [{}]", c.chart_type), Theme::text_dim()),
                ]),
                Line::from(Span::styled(format!("    {}", c.image_url), Theme::info())),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}
