// src/pages/result_view.rs - View model for an immediate analysis result

use crate::api::analysis::chart_url;
use crate::api::types::{AnalysisResult, ColumnStatistics};
use crate::router::analysis_path;
use crate::util::{format_count, format_fixed2};

/// Colour class for the inferred-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Numeric,
    Categorical,
}

impl TypeClass {
    pub fn of(data_type: &str) -> Self {
        if data_type.contains("int") || data_type.contains("float") {
            TypeClass::Numeric
        } else {
            TypeClass::Categorical
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    pub column: String,
    pub data_type: String,
    pub type_class: TypeClass,
    pub count: String,
    pub unique: String,
    pub missing: String,
    /// Nonzero missing values are highlighted.
    pub missing_emphasis: bool,
    pub mean: String,
    pub min: String,
    pub max: String,
}

impl StatRow {
    fn from_stat(stat: &ColumnStatistics) -> Self {
        Self {
            column: stat.column_name.clone(),
            data_type: stat.data_type.clone(),
            type_class: TypeClass::of(&stat.data_type),
            count: format_count(stat.count),
            unique: format_count(stat.unique),
            missing: stat.missing.to_string(),
            missing_emphasis: stat.missing > 0,
            mean: format_fixed2(stat.mean),
            min: format_fixed2(stat.min),
            max: format_fixed2(stat.max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartCard {
    pub title: String,
    pub chart_type: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub file_name: String,
    pub summary: String,
    pub row_count: String,
    pub column_count: String,
    pub column_chips: Vec<String>,
    pub stat_rows: Vec<StatRow>,
    pub charts: Vec<ChartCard>,
    /// Detail page of the stored analysis, when the backend stored it.
    pub detail_path: Option<String>,
}

impl ResultView {
    /// Build the view. Chart images come from `chart_url(origin, file_id, type)`.
    pub fn build(result: &AnalysisResult, analysis_origin: &str) -> Self {
        Self {
            file_name: result.file_name.clone(),
            summary: result.summary.clone(),
            row_count: format_count(result.row_count),
            column_count: result.column_count.to_string(),
            column_chips: result.columns.clone(),
            stat_rows: result.statistics.iter().map(StatRow::from_stat).collect(),
            charts: result
                .charts
                .iter()
                .map(|c| ChartCard {
                    title: c.title.clone(),
                    chart_type: c.chart_type.clone(),
                    image_url: chart_url(analysis_origin, &result.file_id, &c.chart_type),
                })
                .collect(),
            detail_path: result.analysis_id.map(|id| analysis_path(&id.to_string())),
        }
    }

    /// Plain-text rendering for the CLI.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.file_name));
        if !self.summary.is_empty() {
            out.push_str(&format!("{}\n", self.summary));
        }
        out.push_str(&format!(
            "\n  Rows: {}   Columns: {}\n",
            self.row_count, self.column_count
        ));

        if !self.column_chips.is_empty() {
            out.push_str(&format!("\nColumns ({})\n  ", self.column_chips.len()));
            let chips: Vec<String> = self.column_chips.iter().map(|c| format!("[{c}]")).collect();
            out.push_str(&chips.join(" "));
            out.push('\n');
        }

        if !self.stat_rows.is_empty() {
            out.push_str("\nStatistics\n");
            out.push_str(&format!(
                "  {:<20} {:<10} {:>8} {:>8} {:>8} {:>10} {:>10} {:>10}\n",
                "Column", "Type", "Count", "Unique", "Missing", "Mean", "Min", "Max"
            ));
            for row in &self.stat_rows {
                let missing = if row.missing_emphasis {
                    format!("!{}", row.missing)
                } else {
                    row.missing.clone()
                };
                out.push_str(&format!(
                    "  {:<20} {:<10} {:>8} {:>8} {:>8} {:>10} {:>10} {:>10}\n",
                    crate::util::truncate_str(&row.column, 20),
                    crate::util::truncate_str(&row.data_type, 10),
                    row.count,
                    row.unique,
                    missing,
                    row.mean,
                    row.min,
                    row.max
                ));
            }
        }

        if !self.charts.is_empty() {
            out.push_str(&format!("\nCharts ({})\n", self.charts.len()));
            for chart in &self.charts {
                out.push_str(&format!("  {} [{}]\n    {}\n", chart.title, chart.chart_type, chart.image_url));
            }
        }

        if let Some(path) = &self.detail_path {
            out.push_str(&format!("\nSaved as {path} (dropsee show {})\n", path.trim_start_matches("/analysis/")));
        }
        out
    }
}
