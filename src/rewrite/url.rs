//! URL derivation and authority replacement.

use std::str::FromStr;

use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::uri::Authority;
use url::Url;

use super::{RewriteError, Target};

/// Replace the host and port of `url` with `target`.
///
/// Scheme, userinfo, path, query and fragment are left as they were.
pub fn rewrite_url(url: &Url, target: &Target) -> Result<Url, RewriteError> {
    if url.cannot_be_a_base() {
        return Err(RewriteError::CannotBeABase(url.to_string()));
    }

    let mut rewritten = url.clone();
    rewritten.set_host(Some(target.host()))?;
    rewritten
        .set_port(Some(target.port()))
        .map_err(|()| RewriteError::CannotBeABase(url.to_string()))?;

    Ok(rewritten)
}

/// Reconstruct the full URL a server-side request was addressed to.
///
/// Absolute-form targets are taken verbatim. Origin-form targets are
/// completed with `default_scheme` and the `Host` header, or the target
/// authority when the client sent no `Host`.
pub fn effective_url(
    parts: &Parts,
    default_scheme: &str,
    target: &Target,
) -> Result<Url, RewriteError> {
    let uri = &parts.uri;

    if uri.scheme().is_some() && uri.authority().is_some() {
        return Ok(Url::parse(&uri.to_string())?);
    }

    let path_and_query = match uri.path_and_query() {
        Some(pq) if pq.as_str().starts_with('/') => pq.as_str(),
        _ => return Err(RewriteError::UnsupportedTarget(uri.to_string())),
    };

    let host = match parts.headers.get(HOST) {
        Some(value) => {
            let raw = value.to_str().map_err(|_| {
                RewriteError::InvalidHost(String::from_utf8_lossy(value.as_bytes()).into_owned())
            })?;
            Authority::from_str(raw)
                .map_err(|_| RewriteError::InvalidHost(raw.to_string()))?
                .to_string()
        }
        None => target.to_string(),
    };

    Ok(Url::parse(&format!("{default_scheme}://{host}{path_and_query}"))?)
}
