// src/main.rs - Drop & See entry point

use std::path::Path;

use clap::Parser;

use dropsee::cli::{self, AppContext, Cli, Commands};
use dropsee::infra::config::Config;
use dropsee::infra::logger;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = match cli.config.as_deref() {
        Some(path) => {
            let mut config = Config::load_from(Path::new(path))?;
            config.apply_env(|key| std::env::var(key).ok());
            config.validate()?;
            config
        }
        None => Config::load()?,
    };

    // Logging (respects RUST_LOG / DROPSEE_LOG, then log.level)
    logger::init_logging(&config.log.level);

    let mut ctx = AppContext::from_config(config);

    match cli.command {
        None => dropsee::tui::run_ui(ctx, "/").await,
        Some(Commands::Ui { path }) => dropsee::tui::run_ui(ctx, &path).await,
        Some(Commands::Login { email }) => cli::account::run_login(&mut ctx, email.as_deref()).await,
        Some(Commands::Signup { name, email }) => {
            cli::account::run_signup(&ctx, name.as_deref(), email.as_deref()).await
        }
        Some(Commands::Logout) => cli::account::run_logout(&mut ctx),
        Some(Commands::Me) => cli::account::run_me(&mut ctx).await,
        Some(Commands::Passwd) => cli::account::run_passwd(&ctx).await,
        Some(Commands::Rename { name }) => cli::account::run_rename(&mut ctx, &name).await,
        Some(Commands::Analyze { file, anonymous }) => {
            cli::analyze::run_analyze(&ctx, &file, anonymous).await
        }
        Some(Commands::ChartUrl {
            file_id,
            chart_type,
        }) => cli::analyze::run_chart_url(&ctx, &file_id, &chart_type),
        Some(Commands::History) => cli::history::run_history(&ctx).await,
        Some(Commands::Show { id, tab }) => cli::history::run_show(&ctx, &id, tab.into()).await,
        Some(Commands::Status) => cli::status::show_status(&ctx, cli.config.as_deref()),
    }
}
