//! PRD tracker operator CLI

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    if let Err(error) = cli::Cli::parse().run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
