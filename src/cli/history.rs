// src/cli/history.rs - `history` and `show`

use anyhow::{bail, Result};

use super::AppContext;
use crate::api::AnalysisApi;
use crate::pages::detail::{DetailPage, DetailScreen, DetailTab};
use crate::pages::mypage::MyPage;
use crate::router::{analysis_path, Page, MYPAGE_PATH};
use crate::util::truncate_str;

pub async fn run_history(ctx: &AppContext) -> Result<()> {
    ctx.enter(MYPAGE_PATH)?;
    let mut page = MyPage::new();
    page.toggle_history(&ctx.session, &ctx.client).await;
    if let Some(e) = page.error() {
        bail!("{e}");
    }

    let rows = page.history_rows();
    if rows.is_empty() {
        println!("No analyses yet. Run `dropsee analyze <FILE>` to create one.");
        return Ok(());
    }
    println!("  {:>6}  {:<16}  {:<30}  Summary", "ID", "Analyzed", "File");
    for row in rows {
        println!(
            "  {:>6}  {:<16}  {:<30}  {}",
            row.id,
            row.created_at,
            truncate_str(&row.file_name, 30),
            truncate_str(&row.summary, 60)
        );
    }
    Ok(())
}

/// The analysis id as the router sees it, so the request matches the page.
fn routed_id(ctx: &AppContext, raw: &str) -> Result<String> {
    match ctx.enter(&analysis_path(raw))? {
        Some(Page::AnalysisDetail { id }) => Ok(id),
        _ => bail!("Invalid analysis id: {raw}"),
    }
}

pub async fn run_show(ctx: &AppContext, id: &str, tab: DetailTab) -> Result<()> {
    let mut page = DetailPage::new(routed_id(ctx, id)?);
    page.select_tab(tab);
    page.load(&ctx.session, &ctx.client).await;

    match page.view(ctx.client.analysis_origin(), ctx.config.ui.preview_rows) {
        DetailScreen::Loaded(view) => {
            print!("{}", view.to_text());
            Ok(())
        }
        DetailScreen::Error(msg) => bail!("{msg}"),
        DetailScreen::Loading => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::Config;
    use crate::infra::errors::DropSeeError;
    use crate::infra::session::{Session, SessionContext};

    fn ctx(logged_in: bool) -> AppContext {
        let session = logged_in.then(|| Session::new("tok", "Mina", "m@x"));
        AppContext::new(Config::default(), SessionContext::in_memory(session))
    }

    #[test]
    fn test_routed_id_drops_query_and_rejects_traversal() {
        let ctx = ctx(true);
        assert_eq!(routed_id(&ctx, "31").unwrap(), "31");
        assert_eq!(routed_id(&ctx, "7?x=1").unwrap(), "7");
        assert!(routed_id(&ctx, "..").is_err());
        assert!(routed_id(&ctx, "a/b").is_err());
        assert!(routed_id(&ctx, "").is_err());
    }

    #[test]
    fn test_routed_id_requires_login() {
        let err = routed_id(&ctx(false), "31").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DropSeeError>(),
            Some(DropSeeError::NotAuthenticated)
        ));
    }
}
