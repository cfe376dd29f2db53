use std::{num::NonZeroUsize, path::PathBuf, sync::Arc, time::Duration};

use clap::{Args, Parser, Subcommand};
use prd_tracker_app::dashboard::{Dashboard, FileSessionStore, GatewayClient};

mod documents;
mod session;

#[derive(Debug, Parser)]
#[command(name = "prd-tracker", about = "PRD tracker operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct ClientArgs {
    /// Base URL of the gateway
    #[arg(long, env = "PRD_GATEWAY_URL", default_value = "http://localhost:8698", global = true)]
    gateway_url: String,

    /// Directory holding the persisted session
    #[arg(long, env = "PRD_STATE_DIR", default_value = ".prd-tracker", global = true)]
    state_dir: PathBuf,

    /// Request timeout in seconds
    #[arg(long, env = "PRD_TIMEOUT_SECONDS", default_value_t = 30, global = true)]
    timeout_seconds: u64,

    /// Documents shown per page
    #[arg(long, env = "PRD_PAGE_SIZE", default_value = "10", global = true)]
    page_size: NonZeroUsize,
}

impl ClientArgs {
    fn dashboard(&self) -> Result<Dashboard, String> {
        let api = GatewayClient::new(&self.gateway_url, Duration::from_secs(self.timeout_seconds))
            .map_err(|error| format!("invalid client configuration: {error}"))?;

        Dashboard::restore(
            Arc::new(api),
            Arc::new(FileSessionStore::new(&self.state_dir)),
            self.page_size,
        )
        .map_err(|error| format!("failed to restore session: {error}"))
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login(session::LoginArgs),
    /// Forget the remembered session
    Logout,
    /// Show the signed-in operator
    Whoami,
    /// Show a page of documents
    List(documents::ListArgs),
    /// Register a new document
    Add(documents::AddArgs),
    /// Change a document's status
    Transition(documents::TransitionArgs),
    /// Show a document's audit trail
    History(documents::HistoryArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let mut dashboard = self.client.dashboard()?;

        match self.command {
            Commands::Login(args) => session::login(&mut dashboard, args).await,
            Commands::Logout => session::logout(&mut dashboard),
            Commands::Whoami => session::whoami(&dashboard),
            Commands::List(args) => documents::list(&mut dashboard, args).await,
            Commands::Add(args) => documents::add(&mut dashboard, args).await,
            Commands::Transition(args) => documents::transition(&mut dashboard, args).await,
            Commands::History(args) => documents::history(&mut dashboard, args).await,
        }
    }
}
