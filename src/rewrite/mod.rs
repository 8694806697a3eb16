//! URL rewriting.
//!
//! # Data Flow
//! ```text
//! inbound request parts
//!     → url.rs (effective_url: origin-form or absolute-form → Url)
//!     → url.rs (rewrite_url: authority := Target)
//!     → http::request (outbound Request)
//! ```
//!
//! The transformation is pure: no I/O, no shared state.

pub mod target;
pub mod url;

use thiserror::Error;

pub use self::target::Target;
pub use self::url::{effective_url, rewrite_url};

/// Errors produced while deriving the rewritten URL.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The inbound URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    /// The inbound `Host` header is not a valid authority.
    #[error("invalid Host header {0:?}")]
    InvalidHost(String),

    /// Asterisk-form and authority-form request targets have no path.
    #[error("request target {0:?} cannot be rewritten")]
    UnsupportedTarget(String),

    /// The URL has no authority to overwrite (e.g. `mailto:`).
    #[error("URL cannot carry an authority: {0}")]
    CannotBeABase(String),

    /// The target authority literal is malformed.
    #[error("invalid target authority {0:?}: {1}")]
    InvalidTarget(String, &'static str),

    /// The rewritten URL is not a valid HTTP request target.
    #[error("invalid request URI: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUri),
}
