//! The network-fetch primitive.
//!
//! `Fetch` is the seam between the rewriter and the network. The server
//! uses [`HyperFetch`]; tests substitute recording or failing fetchers.

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, Version};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

/// Failure to obtain a response from the upstream.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connect, write or read failure reported by the HTTP client.
    #[error("upstream request failed: {0}")]
    Client(#[from] hyper_util::client::legacy::Error),

    /// The TLS client configuration could not be built.
    #[error("TLS setup failed: {0}")]
    Tls(#[from] rustls::Error),
}

/// Sends one request and resolves to the upstream response.
pub trait Fetch: Clone + Send + Sync + 'static {
    fn fetch(
        &self,
        request: Request<Body>,
    ) -> impl Future<Output = Result<Response<Body>, FetchError>> + Send;
}

/// `Fetch` backed by the hyper-util legacy client.
///
/// Dispatches `http` over plain TCP and `https` over rustls, trusting the
/// webpki root set. Redirects are returned to the caller, never followed.
#[derive(Clone)]
pub struct HyperFetch {
    client: Client<HttpsConnector<HttpConnector>, Body>,
}

impl HyperFetch {
    pub fn new() -> Result<Self, FetchError> {
        let roots =
            rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls = rustls::ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client })
    }
}

impl Fetch for HyperFetch {
    async fn fetch(&self, mut request: Request<Body>) -> Result<Response<Body>, FetchError> {
        // The client speaks HTTP/1 to the upstream whatever the inbound version was.
        if request.version() == Version::HTTP_2 || request.version() == Version::HTTP_3 {
            *request.version_mut() = Version::HTTP_11;
        }

        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
