// src/cli/status.rs - Config, backend and session summary

use super::AppContext;
use crate::infra::paths;

/// Display where things live and who is logged in.
pub fn show_status(ctx: &AppContext, config_path: Option<&str>) -> anyhow::Result<()> {
    println!("dropsee v{}", env!("CARGO_PKG_VERSION"));
    println!();

    match config_path {
        Some(path) => println!("  Config:     {path} (from --config)"),
        None => {
            let path = paths::config_file_path();
            if path.exists() {
                println!("  Config:     {} (loaded)", path.display());
            } else {
                println!("  Config:     (using defaults)");
            }
        }
    }

    println!("  API:        {}", ctx.config.api.base_url);
    println!("  Analysis:   {}", ctx.config.api.analysis_url);
    println!("  Preview:    up to {} rows", ctx.config.ui.preview_rows);
    println!();

    let session_path = paths::session_file_path();
    if ctx.session.is_authenticated() {
        println!(
            "  Session:    {} <{}>",
            ctx.session.display_name(),
            ctx.session.email()
        );
        println!("              {}", session_path.display());
    } else {
        println!("  Session:    not logged in (`dropsee login`)");
    }
    Ok(())
}
