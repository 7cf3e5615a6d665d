//! HTTP response builders
//!
//! Every builder sets Content-Length so the access logger can report byte
//! counts from the finished response. Cache-Control and Server headers are
//! applied centrally by the router, not here.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::session;

/// Build a 200 HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 307 Temporary Redirect response
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(307)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("307", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the logout response: clear the session cookie, redirect home
pub fn build_logout_response(cookie_name: &str, home_path: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(307)
        .header("Location", home_path)
        .header("Set-Cookie", session::clearing_cookie(cookie_name))
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("logout", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    const BODY: &str = "404 Not Found";
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .header("Content-Length", BODY.len())
        .body(Full::new(Bytes::from(BODY)))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from(BODY)))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    const BODY: &str = "405 Method Not Allowed";
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .header("Content-Length", BODY.len())
        .body(Full::new(Bytes::from(BODY)))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from(BODY)))
        })
}

/// Build 204 response for OPTIONS preflight
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    const BODY: &str = "413 Payload Too Large";
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .header("Content-Length", BODY.len())
        .body(Full::new(Bytes::from(BODY)))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from(BODY)))
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> Response<Full<Bytes>> {
    const BODY: &str = "Range Not Satisfiable";
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{file_size}"))
        .header("Content-Length", BODY.len())
        .body(Full::new(Bytes::from(BODY)))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from(BODY)))
        })
}

/// Build a full 200 response for a static file
pub fn build_file_response(
    data: &[u8],
    content_type: &'static str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data.to_owned())
    };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 206 Partial Content response for a satisfiable range
pub fn build_partial_response(
    data: &[u8],
    content_type: &'static str,
    etag: &str,
    start: usize,
    end: usize,
    total_size: usize,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = end - start + 1;
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data[start..=end].to_vec())
    };

    Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Content-Range", format!("bytes {start}-{end}/{total_size}"))
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location() {
        let resp = build_redirect_response("/unauthorized");
        assert_eq!(resp.status(), 307);
        assert_eq!(resp.headers()["Location"], "/unauthorized");
    }

    #[test]
    fn logout_clears_cookie_and_redirects_home() {
        let resp = build_logout_response("session-token", "/");
        assert_eq!(resp.status(), 307);
        assert_eq!(resp.headers()["Location"], "/");
        let cookie = resp.headers()["Set-Cookie"].to_str().unwrap();
        assert!(cookie.starts_with("session-token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn head_responses_have_empty_bodies_but_full_length() {
        let resp = build_html_response("<p>hello</p>".to_string(), true);
        assert_eq!(resp.headers()["Content-Length"], "12");
    }

    #[test]
    fn partial_response_reports_range() {
        let resp = build_partial_response(b"0123456789", "text/plain", "\"x\"", 2, 5, 10, false);
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["Content-Range"], "bytes 2-5/10");
        assert_eq!(resp.headers()["Content-Length"], "4");
    }
}
