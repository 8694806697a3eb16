//! Demo upstream for the proxy: answers every request with the body it received.

use std::net::SocketAddr;

use axum::{body::Bytes, Router};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "echo-backend")]
#[command(about = "Upstream that echoes request bodies", long_about = None)]
struct Cli {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
}

async fn hello(body: Bytes) -> String {
    format!("Hello, World! Received: {}", String::from_utf8_lossy(&body))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echo_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let app = Router::new().fallback(hello);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Echo backend listening");

    axum::serve(listener, app).await?;
    Ok(())
}
