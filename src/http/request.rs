//! Outbound request construction.
//!
//! # Responsibilities
//! - Derive the rewritten URL from the inbound request
//! - Carry method, version, headers, extensions and body over untouched
//! - Point `Host` at the new authority
//!
//! # Design Decisions
//! - The inbound request is consumed; its body stream is moved, not buffered
//! - Fragments never go on the wire, so they are dropped from the outbound URI

use axum::body::Body;
use axum::http::header::{HeaderValue, HOST};
use axum::http::{Request, Uri};
use url::Url;

use crate::rewrite::{effective_url, rewrite_url, RewriteError, Target};

/// Rewrite `url` onto `target` and convert it to a wire request target.
pub fn outbound_uri(url: &Url, target: &Target) -> Result<Uri, RewriteError> {
    let mut rewritten = rewrite_url(url, target)?;
    rewritten.set_fragment(None);
    Ok(Uri::try_from(rewritten.as_str())?)
}

/// Turn an inbound request into the request sent to `target`.
pub fn rewrite_request(
    request: Request<Body>,
    target: &Target,
    default_scheme: &str,
) -> Result<Request<Body>, RewriteError> {
    let (mut parts, body) = request.into_parts();

    let original = effective_url(&parts, default_scheme, target)?;
    parts.uri = outbound_uri(&original, target)?;

    let host = HeaderValue::from_str(&target.to_string())
        .map_err(|_| RewriteError::InvalidTarget(target.to_string(), "not a header value"))?;
    parts.headers.insert(HOST, host);

    tracing::trace!(from = %original, to = %parts.uri, "Rewrote request URL");

    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Version};

    #[test]
    fn test_absolute_form_keeps_scheme() {
        let req = Request::builder()
            .method(Method::GET)
            .uri("https://example.com/foo?x=1")
            .body(Body::empty())
            .unwrap();

        let out = rewrite_request(req, &Target::default(), "http").unwrap();
        assert_eq!(out.method(), Method::GET);
        assert_eq!(out.uri(), "https://0.0.0.0:8080/foo?x=1");
    }

    #[test]
    fn test_origin_form_uses_default_scheme() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/submit?draft=true")
            .header("host", "example.com")
            .body(Body::from("payload"))
            .unwrap();

        let out = rewrite_request(req, &Target::default(), "http").unwrap();
        assert_eq!(out.method(), Method::POST);
        assert_eq!(out.uri(), "http://0.0.0.0:8080/submit?draft=true");
        assert_eq!(out.headers()["host"], "0.0.0.0:8080");
    }

    #[test]
    fn test_headers_survive_except_host() {
        let req = Request::builder()
            .uri("/")
            .header("host", "example.com")
            .header("authorization", "Bearer abc")
            .header("x-custom", "one")
            .header("x-custom", "two")
            .body(Body::empty())
            .unwrap();
        let before = req.headers().clone();

        let out = rewrite_request(req, &Target::default(), "http").unwrap();

        assert_eq!(out.headers()["authorization"], "Bearer abc");
        for (name, _) in before.iter().filter(|(name, _)| **name != HOST) {
            let want: Vec<_> = before.get_all(name).iter().collect();
            let got: Vec<_> = out.headers().get_all(name).iter().collect();
            assert_eq!(want, got, "header {name}");
        }
        assert_eq!(out.headers().len(), before.len());
    }

    #[test]
    fn test_version_and_extensions_survive() {
        #[derive(Clone, Debug, PartialEq)]
        struct Marker(u32);

        let mut req = Request::builder()
            .uri("/")
            .version(Version::HTTP_10)
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(Marker(7));

        let out = rewrite_request(req, &Target::default(), "http").unwrap();
        assert_eq!(out.version(), Version::HTTP_10);
        assert_eq!(out.extensions().get::<Marker>(), Some(&Marker(7)));
    }

    #[tokio::test]
    async fn test_body_is_moved_through() {
        let req = Request::builder()
            .method(Method::PUT)
            .uri("/upload")
            .body(Body::from("hello upstream"))
            .unwrap();

        let out = rewrite_request(req, &Target::default(), "http").unwrap();
        let bytes = axum::body::to_bytes(out.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello upstream");
    }

    #[test]
    fn test_outbound_uri_drops_fragment() {
        let url = Url::parse("https://example.com/page?x=1#frag").unwrap();
        let uri = outbound_uri(&url, &Target::default()).unwrap();

        assert_eq!(uri, "https://0.0.0.0:8080/page?x=1");
        assert!(!uri.to_string().contains('#'));
        assert_eq!(uri.query(), Some("x=1"));
    }

    #[test]
    fn test_outbound_uri_handles_bare_fragment_marker() {
        let url = Url::parse("http://example.com/a/b/c?#").unwrap();
        let uri = outbound_uri(&url, &Target::default()).unwrap();
        assert_eq!(uri.path(), "/a/b/c");
        assert_eq!(uri.authority().unwrap().as_str(), "0.0.0.0:8080");
    }
}
