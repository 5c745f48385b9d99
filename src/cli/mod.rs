// src/cli/mod.rs - CLI definition (clap derive)

pub mod account;
pub mod analyze;
pub mod history;
pub mod status;

use clap::{Parser, Subcommand, ValueEnum};

use crate::api::ApiClient;
use crate::infra::config::Config;
use crate::infra::errors::DropSeeError;
use crate::infra::session::{SessionContext, SessionStore};
use crate::pages::detail::DetailTab;
use crate::router::{self, Page, Resolution, LOGIN_PATH};

#[derive(Parser)]
#[command(name = "dropsee", about = "Upload a data file, get statistics and charts back", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Upload a CSV, JSON or Excel file and print the analysis
    Analyze {
        /// File to analyze (.csv, .json, .xlsx, .xls)
        file: std::path::PathBuf,
        /// Send straight to the analysis backend without logging in; nothing is stored
        #[arg(long)]
        anonymous: bool,
    },
    /// List stored analyses
    History,
    /// Show one stored analysis
    Show {
        /// Analysis id (see `dropsee history`)
        id: String,
        /// Which tab to print
        #[arg(long, value_enum, default_value = "charts")]
        tab: TabArg,
    },
    /// Show the logged-in profile
    Me,
    /// Change the account password
    Passwd,
    /// Change the display name
    Rename { name: String },
    /// Print the image URL of one chart
    ChartUrl { file_id: String, chart_type: String },
    /// Launch the interactive terminal UI
    Ui {
        /// Start at this route (e.g. /mypage, /analysis/7)
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Show config, backends and session state
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Charts,
    Stats,
    Preview,
}

impl From<TabArg> for DetailTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Charts => DetailTab::Charts,
            TabArg::Stats => DetailTab::Statistics,
            TabArg::Preview => DetailTab::Preview,
        }
    }
}

/// Everything a command needs: config, the loaded session and the client.
pub struct AppContext {
    pub config: Config,
    pub session: SessionContext,
    pub client: ApiClient,
}

impl AppContext {
    pub fn new(config: Config, session: SessionContext) -> Self {
        let client = ApiClient::new(&config.api);
        Self {
            config,
            session,
            client,
        }
    }

    /// Load the session from its default location.
    pub fn from_config(config: Config) -> Self {
        Self::new(config, SessionContext::load(SessionStore::default_location()))
    }

    /// Route `path` through the session guard. `Ok(None)` means the guard sent
    /// the user elsewhere (e.g. `login` while already logged in).
    pub fn enter(&self, path: &str) -> Result<Option<Page>, DropSeeError> {
        match router::resolve(path, self.session.is_authenticated()) {
            Resolution::Render(page) => Ok(Some(page)),
            Resolution::Redirect(to) if to == LOGIN_PATH => Err(DropSeeError::NotAuthenticated),
            Resolution::Redirect(to) => {
                tracing::debug!("{path} redirected to {to}");
                Ok(None)
            }
        }
    }
}
