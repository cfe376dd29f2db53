//! PRD Tracker JSON Gateway

use std::process;

use salvo::{affix_state::inject, prelude::*, trailing_slash::remove_slash};
use tracing::{error, info};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod api;
mod auth;
mod config;
mod errors;
mod extensions;
mod healthcheck;
mod observability;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// PRD tracker gateway entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "subscriber failed to install, stderr is the only channel left"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    // Secrets and backend URL are checked before the listener binds
    let app = match config.app_context() {
        Ok(app) => app,
        Err(init_error) => {
            error!(kind = init_error.kind().as_str(), "failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(router::app_router());

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;
}
