// src/cli/analyze.rs - `analyze` and `chart-url`

use std::path::Path;

use anyhow::{bail, Result};

use super::AppContext;
use crate::api::AnalysisApi;
use crate::infra::session::SessionContext;
use crate::pages::dashboard::{DashboardPage, UploadRoute};
use crate::pages::result_view::ResultView;
use crate::router::DASHBOARD_PATH;
use crate::util::format_count;

/// Upload one file and print the result. `anonymous` skips the session and
/// goes straight to the analysis backend.
pub async fn run_analyze(ctx: &AppContext, file: &Path, anonymous: bool) -> Result<()> {
    let anonymous_session = SessionContext::in_memory(None);
    let session = if anonymous {
        &anonymous_session
    } else {
        ctx.enter(DASHBOARD_PATH)?;
        &ctx.session
    };

    let mut page = DashboardPage::new();
    page.select_path(file);
    if let Some(e) = page.error() {
        bail!("{e}");
    }
    if let Some(selected) = page.selected_file() {
        eprintln!(
            "Analyzing {} ({} bytes, {})...",
            selected.name(),
            format_count(selected.size()),
            match UploadRoute::for_session(session) {
                UploadRoute::Authenticated => "saved to your history",
                UploadRoute::Direct => "not saved",
            }
        );
    }

    page.analyze(session, &ctx.client).await;
    if let Some(e) = page.error() {
        bail!("{e}");
    }
    if let Some(result) = page.result() {
        print!("{}", ResultView::build(result, ctx.client.analysis_origin()).to_text());
    }
    Ok(())
}

pub fn run_chart_url(ctx: &AppContext, file_id: &str, chart_type: &str) -> Result<()> {
    println!("{}", ctx.client.chart_url(file_id, chart_type));
    Ok(())
}
