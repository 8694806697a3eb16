//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all forwarding handler
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Hand every request to the `Forwarder`
//! - Record per-request metrics
//! - Drain in-flight requests on shutdown

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::client::{Fetch, FetchError, HyperFetch};
use crate::http::forward::Forwarder;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState<F> {
    pub forwarder: Forwarder<F>,
}

/// HTTP server for the rewriting proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server dispatching through the hyper client.
    pub fn new(config: ProxyConfig) -> Result<Self, FetchError> {
        Ok(Self::with_fetch(config, HyperFetch::new()?))
    }

    /// Create a server with a custom network-fetch primitive.
    pub fn with_fetch<F: Fetch>(config: ProxyConfig, fetch: F) -> Self {
        let forwarder = Forwarder::new(
            config.upstream.authority.clone(),
            config.upstream.default_scheme.clone(),
            fetch,
        );
        let router = build_router(forwarder);
        Self { router, config }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.authority,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router<F: Fetch>(forwarder: Forwarder<F>) -> Router {
    Router::new()
        .route("/", any(proxy_handler::<F>))
        .route("/{*path}", any(proxy_handler::<F>))
        .with_state(AppState { forwarder })
        .layer(TraceLayer::new_for_http())
}

/// Main proxy handler.
/// Rewrites the authority and forwards; failures surface as the
/// server's generic error responses.
async fn proxy_handler<F: Fetch>(
    State(state): State<AppState<F>>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        method = %method,
        path = %path,
        upstream = %state.forwarder.target(),
        "Forwarding request"
    );

    match state.forwarder.forward(request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), start_time);
            response
        }
        Err(e) => {
            tracing::error!(method = %method, path = %path, error = %e, "Forwarding failed");
            metrics::record_request(&method, e.status().as_u16(), start_time);
            e.into_response()
        }
    }
}
