//! Cache validation helpers
//!
//! `ETag` generation and `If-None-Match` matching for static files. The
//! Cache-Control header itself is a single configured value applied to every
//! response by the router.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::Response;

/// Generate a quoted `ETag` from file content
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Check whether the client's `If-None-Match` header matches our `ETag`.
/// Handles comma-separated lists and the `*` wildcard.
pub fn etag_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| client.split(',').any(|e| e.trim() == etag || e.trim() == "*"))
}

/// Stamp the configured Cache-Control and Server headers onto a response.
/// Applied to every response, regardless of route or status.
pub fn stamp_common_headers(
    response: &mut Response<Full<Bytes>>,
    cache_control: &HeaderValue,
    server_name: &HeaderValue,
) {
    let headers = response.headers_mut();
    headers.insert("Cache-Control", cache_control.clone());
    headers.insert("Server", server_name.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_is_quoted_and_stable() {
        let a = generate_etag(b"content");
        let b = generate_etag(b"content");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
        assert_ne!(a, generate_etag(b"other content"));
    }

    #[test]
    fn if_none_match_variants() {
        let etag = "\"abc\"";
        assert!(etag_matches(Some("\"abc\""), etag));
        assert!(etag_matches(Some("\"x\", \"abc\""), etag));
        assert!(etag_matches(Some("*"), etag));
        assert!(!etag_matches(Some("\"other\""), etag));
        assert!(!etag_matches(None, etag));
    }

    #[test]
    fn stamping_overrides_existing_headers() {
        let mut resp = Response::new(Full::new(Bytes::new()));
        resp.headers_mut()
            .insert("Cache-Control", HeaderValue::from_static("public"));

        let cc = HeaderValue::from_static("no-cache");
        let server = HeaderValue::from_static("Wicket/0.1");
        stamp_common_headers(&mut resp, &cc, &server);

        assert_eq!(resp.headers()["Cache-Control"], "no-cache");
        assert_eq!(resp.headers()["Server"], "Wicket/0.1");
    }
}
