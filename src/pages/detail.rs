// src/pages/detail.rs - Stored analysis: fetch, payload parse, tabs and lightbox

use serde_json::Value;

use crate::api::analysis::resolve_chart_url;
use crate::api::payload::{AnalysisPayload, ColumnStats, StatValue};
use crate::api::types::AnalysisDetail;
use crate::api::AnalysisApi;
use crate::infra::errors::DropSeeError;
use crate::infra::session::SessionContext;
use crate::util::{format_count, format_fixed2, format_timestamp, PLACEHOLDER};

use super::messages;

pub const NO_CHARTS: &str = "No charts available.";
pub const NO_STATISTICS: &str = "No statistics available.";
pub const NO_PREVIEW: &str = "No preview data available.";

// ── Tabs ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Charts,
    Statistics,
    Preview,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Charts, DetailTab::Statistics, DetailTab::Preview];

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Charts => "Charts",
            DetailTab::Statistics => "Statistics",
            DetailTab::Preview => "Data preview",
        }
    }

    pub fn index(&self) -> usize {
        DetailTab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn from_index(i: usize) -> DetailTab {
        *DetailTab::ALL.get(i).unwrap_or(&DetailTab::Charts)
    }

    pub fn next(&self) -> DetailTab {
        DetailTab::from_index((self.index() + 1) % DetailTab::ALL.len())
    }

    pub fn prev(&self) -> DetailTab {
        DetailTab::from_index((self.index() + DetailTab::ALL.len() - 1) % DetailTab::ALL.len())
    }

    /// Accepts `charts`, `stats`/`statistics` and `preview`/`data`.
    pub fn parse(s: &str) -> Option<DetailTab> {
        match s.to_ascii_lowercase().as_str() {
            "charts" | "chart" => Some(DetailTab::Charts),
            "stats" | "statistics" => Some(DetailTab::Statistics),
            "preview" | "data" => Some(DetailTab::Preview),
            _ => None,
        }
    }
}

/// Human label for a chart type.
pub fn chart_label(chart_type: &str) -> &'static str {
    match chart_type {
        "bar" => "Bar chart",
        "pie" => "Pie chart",
        "line" => "Line chart",
        "scatter" => "Scatter plot",
        "heatmap" => "Heatmap",
        _ => "Chart",
    }
}

// ── State ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAnalysis {
    pub detail: AnalysisDetail,
    pub payload: AnalysisPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Box<LoadedAnalysis>),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct DetailPage {
    id: String,
    state: DetailState,
    tab: DetailTab,
    selected_chart: usize,
    lightbox: Option<String>,
}

impl DetailPage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: DetailState::Loading,
            tab: DetailTab::default(),
            selected_chart: 0,
            lightbox: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn lightbox(&self) -> Option<&str> {
        self.lightbox.as_deref()
    }

    pub fn selected_chart(&self) -> usize {
        self.selected_chart
    }

    fn loaded(&self) -> Option<&LoadedAnalysis> {
        match &self.state {
            DetailState::Loaded(l) => Some(l),
            _ => None,
        }
    }

    /// Fetch and parse the analysis.
    pub async fn load(&mut self, session: &SessionContext, api: &dyn AnalysisApi) {
        self.state = DetailState::Loading;
        let outcome = match session.token() {
            Some(token) => api.get_analysis(token, &self.id).await,
            None => Err(DropSeeError::NotAuthenticated),
        };
        self.apply(outcome);
    }

    /// Apply a fetch outcome. Fetch failures show the generic banner; a
    /// payload that cannot be read shows what was wrong with it.
    pub fn apply(&mut self, outcome: Result<AnalysisDetail, DropSeeError>) {
        self.state = match outcome {
            Err(e) => {
                tracing::warn!("Loading analysis {} failed: {e}", self.id);
                DetailState::Error(messages::DETAIL_LOAD_FAILED.to_string())
            }
            Ok(detail) => match AnalysisPayload::parse_optional(detail.result_data.as_deref()) {
                Ok(payload) => DetailState::Loaded(Box::new(LoadedAnalysis { detail, payload })),
                Err(e) => {
                    tracing::warn!("Analysis {} has an unreadable payload: {e}", self.id);
                    DetailState::Error(format!("{} {e}", messages::DETAIL_LOAD_FAILED))
                }
            },
        };
        self.selected_chart = 0;
        self.lightbox = None;
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    fn chart_count(&self) -> usize {
        self.loaded().map(|l| l.payload.charts.len()).unwrap_or(0)
    }

    pub fn select_next_chart(&mut self) {
        let max = self.chart_count().saturating_sub(1);
        self.selected_chart = (self.selected_chart + 1).min(max);
    }

    pub fn select_prev_chart(&mut self) {
        self.selected_chart = self.selected_chart.saturating_sub(1);
    }

    /// Open the full-size view of the selected chart.
    pub fn open_selected_chart(&mut self, analysis_origin: &str) {
        let url = self
            .loaded()
            .and_then(|l| l.payload.charts.get(self.selected_chart))
            .map(|c| resolve_chart_url(analysis_origin, &c.url))
            .filter(|u| !u.is_empty());
        self.lightbox = url;
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox = None;
    }

    /// Build what should be on screen.
    pub fn view(&self, analysis_origin: &str, preview_rows: usize) -> DetailScreen {
        match &self.state {
            DetailState::Loading => DetailScreen::Loading,
            DetailState::Error(msg) => DetailScreen::Error(msg.clone()),
            DetailState::Loaded(loaded) => DetailScreen::Loaded(Box::new(DetailView {
                header: DetailHeader::build(&loaded.detail, &loaded.payload),
                tab: self.tab,
                body: build_tab(self.tab, &loaded.payload, analysis_origin, preview_rows),
                selected_chart: self.selected_chart,
                lightbox: self.lightbox.clone(),
            })),
        }
    }
}

// ── View model ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DetailScreen {
    Loading,
    Error(String),
    Loaded(Box<DetailView>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub header: DetailHeader,
    pub tab: DetailTab,
    pub body: TabBody,
    pub selected_chart: usize,
    pub lightbox: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailHeader {
    pub file_name: String,
    pub created_at: String,
    pub summary: String,
    pub chart_count: usize,
}

impl DetailHeader {
    fn build(detail: &AnalysisDetail, payload: &AnalysisPayload) -> Self {
        Self {
            file_name: detail.file_name.clone(),
            created_at: format_timestamp(detail.created_at.as_deref()),
            summary: detail.summary.clone().unwrap_or_default(),
            chart_count: payload.charts.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabBody {
    Charts(Vec<ChartTile>),
    Statistics(Vec<StatCard>),
    Preview(PreviewTable),
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTile {
    pub title: String,
    pub chart_type: String,
    pub label: &'static str,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub column: String,
    /// (label, formatted value) for each field present.
    pub fields: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows left out because of the row cap.
    pub hidden_rows: usize,
}

fn build_tab(
    tab: DetailTab,
    payload: &AnalysisPayload,
    analysis_origin: &str,
    preview_rows: usize,
) -> TabBody {
    match tab {
        DetailTab::Charts if payload.charts.is_empty() => TabBody::Empty(NO_CHARTS),
        DetailTab::Charts => TabBody::Charts(
            payload
                .charts
                .iter()
                .map(|c| ChartTile {
                    title: c.title.clone(),
                    chart_type: c.chart_type.clone(),
                    label: chart_label(&c.chart_type),
                    image_url: resolve_chart_url(analysis_origin, &c.url),
                })
                .collect(),
        ),
        DetailTab::Statistics if payload.statistics.is_empty() => TabBody::Empty(NO_STATISTICS),
        DetailTab::Statistics => TabBody::Statistics(
            payload
                .statistics
                .iter()
                .map(|(column, stats)| StatCard {
                    column: column.clone(),
                    fields: stat_fields(stats),
                })
                .collect(),
        ),
        DetailTab::Preview if payload.preview.columns.is_empty() => TabBody::Empty(NO_PREVIEW),
        DetailTab::Preview => TabBody::Preview(build_preview(payload, preview_rows)),
    }
}

fn format_stat(value: &StatValue) -> String {
    match value {
        StatValue::Number(n) => format_fixed2(Some(*n)),
        StatValue::Text(s) => s.clone(),
    }
}

fn format_stat_count(value: &StatValue) -> String {
    match value {
        StatValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => format_count(*n as u64),
        other => format_stat(other),
    }
}

/// Only fields present in the payload are listed, in a fixed order.
fn stat_fields(stats: &ColumnStats) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(v) = &stats.count {
        fields.push(("Count", format_stat_count(v)));
    }
    let rest: [(&'static str, &Option<StatValue>); 7] = [
        ("Mean", &stats.mean),
        ("Std dev", &stats.std),
        ("Min", &stats.min),
        ("Max", &stats.max),
        ("25%", &stats.p25),
        ("Median", &stats.p50),
        ("75%", &stats.p75),
    ];
    for (label, value) in rest {
        if let Some(v) = value {
            fields.push((label, format_stat(v)));
        }
    }
    fields
}

fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => PLACEHOLDER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn build_preview(payload: &AnalysisPayload, preview_rows: usize) -> PreviewTable {
    let preview = &payload.preview;
    let rows = preview
        .rows
        .iter()
        .take(preview_rows)
        .map(|row| {
            preview
                .columns
                .iter()
                .map(|col| format_cell(row.get(col)))
                .collect()
        })
        .collect();
    PreviewTable {
        columns: preview.columns.clone(),
        rows,
        hidden_rows: preview.rows.len().saturating_sub(preview_rows),
    }
}

impl DetailView {
    /// Plain-text rendering of the header and the active tab, for the CLI.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{}\n  Analyzed {}   Charts: {}\n",
            self.header.file_name, self.header.created_at, self.header.chart_count
        );
        if !self.header.summary.is_empty() {
            out.push_str(&format!("  {}\n", self.header.summary));
        }
        out.push_str(&format!("\n[{}]\n", self.tab.label()));

        match &self.body {
            TabBody::Empty(msg) => out.push_str(&format!("  {msg}\n")),
            TabBody::Charts(tiles) => {
                for tile in tiles {
                    out.push_str(&format!("  {} ({})\n    {}\n", tile.title, tile.label, tile.image_url));
                }
            }
            TabBody::Statistics(cards) => {
                for card in cards {
                    out.push_str(&format!("  {}\n", card.column));
                    for (label, value) in &card.fields {
                        out.push_str(&format!("    {label:<8} {value}\n"));
                    }
                }
            }
            TabBody::Preview(table) => {
                out.push_str(&format!("  {}\n", table.columns.join(" | ")));
                for row in &table.rows {
                    out.push_str(&format!("  {}\n", row.join(" | ")));
                }
                if table.hidden_rows > 0 {
                    out.push_str(&format!("  ... {} more rows\n", table.hidden_rows));
                }
            }
        }
        out
    }
}
