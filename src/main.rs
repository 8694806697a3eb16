//! rewrite-proxy
//!
//! Re-addresses every inbound request to a single fixed upstream authority
//! and returns the upstream response untouched.
//!
//! ```text
//!   Client ──▶ listener ──▶ axum router ──▶ Forwarder ──▶ hyper client ──▶ 0.0.0.0:8080
//!          ◀──────────────────────────────── response, unmodified ◀──────────
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use rewrite_proxy::config::{resolve_config, ConfigError, Overrides, ProxyConfig};
use rewrite_proxy::lifecycle::{signals, Shutdown};
use rewrite_proxy::observability::{logging, metrics};
use rewrite_proxy::{HttpServer, Target};

#[derive(Parser)]
#[command(name = "rewrite-proxy")]
#[command(about = "Forward every request to one fixed upstream authority", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener address, overriding the config file.
    #[arg(short, long)]
    bind: Option<String>,

    /// Upstream authority (host:port), overriding the config file.
    #[arg(short, long)]
    upstream: Option<Target>,
}

impl Cli {
    fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let overrides = Overrides {
            bind_address: self.bind,
            upstream: self.upstream,
        };
        resolve_config(self.config.as_deref(), overrides)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);

    tracing::info!("rewrite-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.authority,
        default_scheme = %config.upstream.default_scheme,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    signals::wait_for_signal().await?;
    if !shutdown.trigger() {
        tracing::warn!("Server had already stopped");
    }
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
