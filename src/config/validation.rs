//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic, including the target authority)
//! - Validate addresses parse and the default scheme is an HTTP scheme
//! - Detect a listener that would forward to itself, loopback and
//!   unspecified addresses included
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("upstream.default_scheme {0:?} must be \"http\" or \"https\"")]
    DefaultScheme(String),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    LogLevel(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),

    #[error("listener {0} is also the upstream; every request would loop")]
    SelfForwarding(String),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.listener.bind_address.parse::<SocketAddr>() {
        Ok(addr) => {
            if forwards_to_itself(addr, config) {
                errors.push(ValidationError::SelfForwarding(addr.to_string()));
            }
        }
        Err(_) => errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        )),
    }

    if !matches!(config.upstream.default_scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::DefaultScheme(
            config.upstream.default_scheme.clone(),
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// True when the upstream authority would dial the listener itself.
///
/// A connect to `0.0.0.0` or `::` lands on loopback, and a listener on an
/// unspecified address also accepts loopback, so any pairing of local
/// addresses on the same port counts.
fn forwards_to_itself(listener: SocketAddr, config: &ProxyConfig) -> bool {
    let upstream = &config.upstream.authority;
    if listener.port() != upstream.port() {
        return false;
    }

    let host = upstream.host().trim_start_matches('[').trim_end_matches(']');
    let is_local = |ip: IpAddr| ip.is_unspecified() || ip.is_loopback();

    match host.parse::<IpAddr>() {
        Ok(ip) if ip == listener.ip() => true,
        Ok(ip) => is_local(ip) && is_local(listener.ip()),
        Err(_) => host.eq_ignore_ascii_case("localhost") && is_local(listener.ip()),
    }
}
