//! The request rewriter: rewrite, dispatch once, hand back the response.

use axum::body::Body;
use axum::http::{Request, Response};

use crate::http::client::Fetch;
use crate::http::request::rewrite_request;
use crate::http::response::ProxyError;
use crate::rewrite::Target;

/// Forwards every request to a single fixed authority.
///
/// Holds no mutable state; clones are independent and share nothing but
/// the fetcher's connection handle.
#[derive(Clone)]
pub struct Forwarder<F> {
    target: Target,
    default_scheme: String,
    fetch: F,
}

impl<F: Fetch> Forwarder<F> {
    pub fn new(target: Target, default_scheme: impl Into<String>, fetch: F) -> Self {
        Self {
            target,
            default_scheme: default_scheme.into(),
            fetch,
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Forward `request` and return the upstream response untouched.
    ///
    /// Exactly one fetch is issued; any failure is returned as-is.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ProxyError> {
        let outbound = rewrite_request(request, &self.target, &self.default_scheme)?;
        let response = self.fetch.fetch(outbound).await?;
        Ok(response)
    }
}
