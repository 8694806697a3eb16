//! Failure propagation to the client.
//!
//! # Responsibilities
//! - Carry rewrite and upstream failures out of the handler unchanged
//! - Render them as the server's generic error responses
//!
//! # Design Decisions
//! - No recovery: a failed invocation is never turned into a synthesized
//!   upstream-looking response
//! - Malformed inbound URLs answer 500, upstream failures 502
//! - Bodies are fixed strings; error detail goes to the log only

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::http::client::FetchError;
use crate::rewrite::RewriteError;

/// A failed proxy invocation.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Rewrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Fetch(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ProxyError::Rewrite(_) => "Internal Server Error",
            ProxyError::Fetch(_) => "Upstream request failed",
        };
        (status, body).into_response()
    }
}
