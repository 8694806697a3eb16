//! The fixed destination authority.

use std::fmt;
use std::str::FromStr;

use axum::http::uri::Authority;
use serde::{Deserialize, Serialize};

use super::RewriteError;

/// Authority every request is rewritten to.
///
/// Always carries an explicit port. Serialized as `"host:port"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    /// Host part, brackets included for IPv6 literals.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for Target {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl FromStr for Target {
    type Err = RewriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| RewriteError::InvalidTarget(s.to_string(), reason);

        if s.contains('@') {
            return Err(invalid("userinfo is not allowed"));
        }
        let authority = Authority::from_str(s).map_err(|_| invalid("not an authority"))?;
        let port = authority.port_u16().ok_or_else(|| invalid("missing port"))?;
        if authority.host().is_empty() {
            return Err(invalid("empty host"));
        }

        Ok(Self {
            host: authority.host().to_string(),
            port,
        })
    }
}

impl TryFrom<String> for Target {
    type Error = RewriteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
