// src/tui/widgets/detail.rs - Stored analysis: header, tabs, tab body and lightbox.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::pages::detail::{DetailScreen, DetailTab, DetailView, PreviewTable, StatCard, TabBody};
use crate::tui::theme::Theme;

use super::centered_rect;

pub fn render(f: &mut Frame, area: Rect, screen: &DetailScreen) {
    match screen {
        DetailScreen::Loading => {
            let p = Paragraph::new(Span::styled("  Loading analysis...", Theme::warning()))
                .block(Block::default().borders(Borders::ALL).border_style(Theme::border()));
            f.render_widget(p, area);
        }
        DetailScreen::Error(msg) => {
            let p = Paragraph::new(vec![
                Line::from(Span::styled(format!("  {msg}"), Theme::error())),
                Line::from(""),
                Line::from(Span::styled("  Esc goes back.", Theme::text_dim())),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_style(Theme::border()));
            f.render_widget(p, area);
        }
        DetailScreen::Loaded(view) => render_loaded(f, area, view),
    }
}

fn render_loaded(f: &mut Frame, area: Rect, view: &DetailView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("  Analyzed ", Theme::text_dim()),
            Span::styled(view.header.created_at.clone(), Theme::text()),
            Span::styled("   Charts ", Theme::text_dim()),
            Span::styled(view.header.chart_count.to_string(), Theme::highlight()),
        ]),
        Line::from(Span::styled(format!("  {}", view.header.summary), Theme::text())),
    ])
    .block(
        Block::default()
            .title(Span::styled(format!(" {} ", view.header.file_name), Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(header, chunks[0]);

    let titles: Vec<Line> = DetailTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let style = if *tab == view.tab {
                Theme::tab_active()
            } else {
                Theme::tab_inactive()
            };
            Line::from(Span::styled(format!(" {} {} ", i + 1, tab.label()), style))
        })
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).border_style(Theme::border()))
        .select(view.tab.index())
        .highlight_style(Theme::tab_active())
        .divider(Span::styled(" | ", Theme::text_dim()));
    f.render_widget(tabs, chunks[1]);

    match &view.body {
        TabBody::Empty(msg) => {
            let p = Paragraph::new(Span::styled(format!("  {msg}"), Theme::text_dim()))
                .block(Block::default().borders(Borders::ALL).border_style(Theme::border()));
            f.render_widget(p, chunks[2]);
        }
        TabBody::Charts(tiles) => {
            let lines: Vec<Line> = tiles
                .iter()
                .enumerate()
                .flat_map(|(i, t)| {
                    let marker = if i == view.selected_chart { ">> " } else { "   " };
                    let style = if i == view.selected_chart {
                        Theme::highlight()
                    } else {
                        Theme::text()
                    };
                    [
                        Line::from(vec![
                            Span::styled(format!("{marker}{}", t.title), style),
                            Span::styled(format!("  {}", t.label), Theme::text_dim()),
                        ]),
                        Line::from(Span::styled(format!("     {}", t.image_url), Theme::info())),
                    ]
                })
                .collect();
            let p = Paragraph::new(lines).block(
                Block::default()
                    .title(" Enter opens the selected chart ")
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            );
            f.render_widget(p, chunks[2]);
        }
        TabBody::Statistics(cards) => render_stat_cards(f, chunks[2], cards),
        TabBody::Preview(table) => render_preview(f, chunks[2], table),
    }

    if let Some(url) = &view.lightbox {
        let popup = centered_rect(80, 7, area);
        f.render_widget(Clear, popup);
        let p = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {url}"), Theme::info())),
            Line::from(""),
            Line::from(Span::styled("  Open this URL to see the full-size image. Esc closes.", Theme::text_dim())),
        ])
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Chart ")
                .borders(Borders::ALL)
                .border_style(Theme::border_focus()),
        );
        f.render_widget(p, popup);
    }
}

fn render_stat_cards(f: &mut Frame, area: Rect, cards: &[StatCard]) {
    let lines: Vec<Line> = cards
        .iter()
        .flat_map(|card| {
            let mut lines = vec![Line::from(Span::styled(
                format!("  {}", card.column),
                Theme::highlight(),
            ))];
            for (label, value) in &card.fields {
                lines.push(Line::from(vec![
                    Span::styled(format!("    {label:<8} "), Theme::text_dim()),
                    Span::styled(value.clone(), Theme::text()),
                ]));
            }
            lines
        })
        .collect();
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" Statistics ({} columns) ", cards.len()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_preview(f: &mut Frame, area: Rect, table: &PreviewTable) {
    let header = Row::new(
        table
            .columns
            .iter()
            .map(|c| Cell::from(c.clone()).style(Theme::table_header())),
    );
    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|r| Row::new(r.iter().map(|v| Cell::from(v.clone()).style(Theme::text()))))
        .collect();
    let widths = vec![Constraint::Fill(1); table.columns.len()];

    let title = if table.hidden_rows > 0 {
        format!(" Preview ({} rows, {} more not shown) ", table.rows.len(), table.hidden_rows)
    } else {
        format!(" Preview ({} rows) ", table.rows.len())
    };
    let t = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(t, area);
}
