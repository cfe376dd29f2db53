//! Gateway listener settings.

use clap::Args;

/// Address the gateway binds its HTTP listener to.
#[derive(Debug, Args)]
pub struct ListenConfig {
    /// Interface to listen on; IPv6 literals are accepted without brackets
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port serving `/api/auth`, `/api/proxy` and the operational endpoints
    #[arg(short, long, env = "SERVER_PORT", default_value = "8698")]
    pub port: u16,
}

impl ListenConfig {
    /// `host:port`, bracketing bare IPv6 hosts.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        let host = self.host.trim();

        if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.port)
        } else {
            format!("{host}:{}", self.port)
        }
    }
}
