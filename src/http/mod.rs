//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route)
//!     → forward.rs (the rewriter)
//!         → request.rs (rewrite authority, keep everything else)
//!         → client.rs (one upstream fetch)
//!     → response.rs (failures only; upstream responses pass through)
//!     → Send to client
//! ```

pub mod client;
pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use client::{Fetch, FetchError, HyperFetch};
pub use forward::Forwarder;
pub use request::{outbound_uri, rewrite_request};
pub use response::ProxyError;
pub use server::HttpServer;
