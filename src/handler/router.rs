//! Request routing dispatch
//!
//! Entry point for HTTP request processing: method validation, the session
//! gate, page rendering, static files, and the access log line emitted for
//! every request.

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};

use crate::handler::static_files;
use crate::http::{self, cache};
use crate::logger::{self, AccessLogEntry};
use crate::session;
use crate::state::AppState;

const HOME_PATH: &str = "/";

/// Request data extracted up front, so routing never touches the hyper
/// request again
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub is_head: bool,
    /// Declared Content-Length, when the header parses
    pub content_length: Option<u64>,
    /// Raw value of the session cookie, when present
    pub session_cookie: Option<String>,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let method = req.method();
    let path = req.uri().path();

    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let ctx = RequestContext {
        method,
        path,
        is_head: *method == Method::HEAD,
        content_length: header("content-length").and_then(|v| v.parse().ok()),
        session_cookie: req
            .headers()
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .and_then(|h| session::cookie_value(h, &state.config.session.cookie_name))
            .map(ToString::to_string),
        if_none_match: header("if-none-match"),
        range_header: header("range"),
    };

    let response = route_request(&ctx, &state).await;

    if state.config.logging.access_log {
        let entry = AccessLogEntry {
            remote_addr: peer_addr.to_string(),
            time: chrono::Local::now(),
            method: method.to_string(),
            path: path.to_string(),
            query: req.uri().query().map(ToString::to_string),
            http_version: version_label(req.version()).to_string(),
            status: response.status().as_u16(),
            body_bytes: content_length_of(&response),
            referer: header("referer"),
            user_agent: header("user-agent"),
            latency_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request and build the response.
///
/// Every response leaving this function carries the configured
/// Cache-Control and Server headers, regardless of route or status.
pub async fn route_request(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let mut response = dispatch(ctx, state).await;
    cache::stamp_common_headers(&mut response, &state.cache_control, &state.server_name);
    response
}

async fn dispatch(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    // 1. Method check
    match *ctx.method {
        Method::GET | Method::HEAD => {}
        Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {}", ctx.method));
            return http::build_405_response();
        }
    }

    // 2. Declared body size check
    if let Some(size) = ctx.content_length {
        if size > state.config.http.max_body_size {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {})",
                state.config.http.max_body_size
            ));
            return http::build_413_response();
        }
    }

    // 3. Route dispatch
    let session_cfg = &state.config.session;
    match ctx.path {
        HOME_PATH => render_page(state, "index", ctx.is_head),
        "/secured" => {
            if session::authorize(state.validator.as_ref(), ctx.session_cookie.as_deref()).await {
                render_page(state, "secured", ctx.is_head)
            } else {
                http::build_redirect_response(&session_cfg.unauthorized_path)
            }
        }
        "/unauthorized" => render_page(state, "unauthorized", ctx.is_head),
        "/logout" => http::build_logout_response(&session_cfg.cookie_name, HOME_PATH),
        path => {
            let prefix = &state.config.site.static_prefix;
            match path
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
            {
                Some(rel) if !rel.is_empty() => {
                    static_files::serve(ctx, &state.config.site.static_dir, rel).await
                }
                _ => http::build_404_response(),
            }
        }
    }
}

/// Render a named template, or 404 when the name does not resolve
fn render_page(state: &AppState, name: &str, is_head: bool) -> Response<Full<Bytes>> {
    let mut vars = HashMap::new();
    vars.insert("server_name", state.config.http.server_name.clone());

    match state.templates.render(name, &vars) {
        Some(html) => http::build_html_response(html, is_head),
        None => {
            logger::log_warning(&format!("Template not found: {name}"));
            http::build_404_response()
        }
    }
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else if version == Version::HTTP_3 {
        "3"
    } else {
        "1.1"
    }
}

fn content_length_of(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;

    use crate::config::Config;
    use crate::session::{SessionError, SessionValidator};
    use crate::templates::TemplateSet;

    struct StubValidator {
        valid: bool,
    }

    #[async_trait]
    impl SessionValidator for StubValidator {
        async fn validate(&self, _token: &str) -> Result<bool, SessionError> {
            Ok(self.valid)
        }
    }

    fn test_state(valid_session: bool, static_dir: &str) -> AppState {
        let mut config = Config::load_from("nonexistent-config").unwrap();
        config.site.static_dir = static_dir.to_string();

        let templates = TemplateSet::from_sources(&[
            ("index", "<h1>Home of {{ server_name }}</h1>"),
            ("secured", "<h1>Secured page</h1>"),
            ("unauthorized", "<h1>Please sign in</h1>"),
        ])
        .unwrap();

        AppState::new(
            config,
            templates,
            Box::new(StubValidator {
                valid: valid_session,
            }),
        )
        .unwrap()
    }

    fn ctx<'a>(method: &'a Method, path: &'a str) -> RequestContext<'a> {
        RequestContext {
            method,
            path,
            is_head: false,
            content_length: None,
            session_cookie: None,
            if_none_match: None,
            range_header: None,
        }
    }

    async fn body_bytes(response: Response<Full<Bytes>>) -> Vec<u8> {
        use http_body_util::BodyExt;
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn secured_without_cookie_redirects() {
        let state = test_state(true, "unused");
        let resp = route_request(&ctx(&Method::GET, "/secured"), &state).await;
        assert_eq!(resp.status(), 307);
        assert_eq!(resp.headers()["Location"], "/unauthorized");
    }

    #[tokio::test]
    async fn secured_with_invalid_cookie_redirects() {
        let state = test_state(false, "unused");
        let mut request = ctx(&Method::GET, "/secured");
        request.session_cookie = Some("expired-token".to_string());
        let resp = route_request(&request, &state).await;
        assert_eq!(resp.status(), 307);
        assert_eq!(resp.headers()["Location"], "/unauthorized");
    }

    #[tokio::test]
    async fn secured_with_valid_cookie_renders() {
        let state = test_state(true, "unused");
        let mut request = ctx(&Method::GET, "/secured");
        request.session_cookie = Some("good-token".to_string());
        let resp = route_request(&request, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, b"<h1>Secured page</h1>");
    }

    #[tokio::test]
    async fn home_renders_index_with_vars() {
        let state = test_state(true, "unused");
        let resp = route_request(&ctx(&Method::GET, "/"), &state).await;
        assert_eq!(resp.status(), 200);
        let body = String::from_utf8(body_bytes(resp).await).unwrap();
        assert_eq!(body, "<h1>Home of Wicket/0.1</h1>");
    }

    #[tokio::test]
    async fn logout_clears_cookie_and_redirects() {
        let state = test_state(true, "unused");
        let resp = route_request(&ctx(&Method::GET, "/logout"), &state).await;
        assert_eq!(resp.status(), 307);
        assert_eq!(resp.headers()["Location"], "/");
        let cookie = resp.headers()["Set-Cookie"].to_str().unwrap();
        assert!(cookie.starts_with("session-token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn static_file_round_trips_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let content = b"body { color: #333; }\n";
        let mut f = std::fs::File::create(dir.path().join("style.css")).unwrap();
        f.write_all(content).unwrap();

        let state = test_state(true, dir.path().to_str().unwrap());
        let resp = route_request(&ctx(&Method::GET, "/static/style.css"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/css");
        assert_eq!(body_bytes(resp).await, content);
    }

    #[tokio::test]
    async fn missing_static_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(true, dir.path().to_str().unwrap());
        let resp = route_request(&ctx(&Method::GET, "/static/nope.css"), &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn traversal_attempt_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(true, dir.path().to_str().unwrap());
        let resp = route_request(&ctx(&Method::GET, "/static/../secret.txt"), &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let state = test_state(true, "unused");
        let resp = route_request(&ctx(&Method::GET, "/admin"), &state).await;
        assert_eq!(resp.status(), 404);
        // The bare static prefix is not a route either
        let resp = route_request(&ctx(&Method::GET, "/static"), &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn every_response_carries_cache_control() {
        let state = test_state(true, "unused");
        for path in ["/", "/secured", "/unauthorized", "/logout", "/nope"] {
            let resp = route_request(&ctx(&Method::GET, path), &state).await;
            assert_eq!(
                resp.headers()["Cache-Control"],
                "no-cache, no-store, must-revalidate",
                "missing cache-control on {path}"
            );
            assert_eq!(resp.headers()["Server"], "Wicket/0.1");
        }
    }

    #[tokio::test]
    async fn post_is_rejected_with_405() {
        let state = test_state(true, "unused");
        let resp = route_request(&ctx(&Method::POST, "/"), &state).await;
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected_with_413() {
        let state = test_state(true, "unused");
        let mut request = ctx(&Method::GET, "/");
        request.content_length = Some(state.config.http.max_body_size + 1);
        let resp = route_request(&request, &state).await;
        assert_eq!(resp.status(), 413);
    }

    #[tokio::test]
    async fn head_keeps_headers_drops_body() {
        let state = test_state(true, "unused");
        let mut request = ctx(&Method::HEAD, "/");
        request.is_head = true;
        let resp = route_request(&request, &state).await;
        assert_eq!(resp.status(), 200);
        let declared: usize = resp.headers()["Content-Length"]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(declared > 0);
        assert!(body_bytes(resp).await.is_empty());
    }
}
