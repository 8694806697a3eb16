//! Single-target URL rewriting proxy library.
//!
//! Every inbound request is re-addressed to one fixed authority
//! (`0.0.0.0:8080` unless configured otherwise) and forwarded once; the
//! upstream response is returned untouched.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod rewrite;

pub use config::schema::ProxyConfig;
pub use http::{Forwarder, HttpServer};
pub use lifecycle::Shutdown;
pub use rewrite::Target;
