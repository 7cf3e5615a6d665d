//! Static file serving
//!
//! Serves files verbatim from the configured asset directory with MIME
//! detection, `ETag` validation and single-range support. Paths are confined
//! to the asset root; anything that escapes it resolves to 404.

use std::path::{Component, Path};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::range::RangeOutcome;
use crate::http::{self, cache, mime, response};
use crate::logger;

/// Serve the asset at `rel_path` (relative to the asset root)
pub async fn serve(
    ctx: &RequestContext<'_>,
    static_dir: &str,
    rel_path: &str,
) -> Response<Full<Bytes>> {
    match load(static_dir, rel_path).await {
        Some((content, content_type)) => build_response(ctx, &content, content_type),
        None => http::build_404_response(),
    }
}

/// Load an asset's bytes, or None when it does not resolve to a file inside
/// the asset root
async fn load(static_dir: &str, rel_path: &str) -> Option<(Vec<u8>, &'static str)> {
    let rel = Path::new(rel_path);

    // Reject traversal and absolute components before touching the
    // filesystem
    if !rel
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        logger::log_warning(&format!("Rejected asset path: {rel_path}"));
        return None;
    }

    let root = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let file_path = root.join(rel);

    // Canonicalize again so symlinks cannot escape the root.
    // Failure here is the common missing-file case, not worth a log line.
    let canonical = file_path.canonicalize().ok()?;
    if !canonical.starts_with(&root) {
        logger::log_warning(&format!(
            "Path escape blocked: {rel_path} -> {}",
            canonical.display()
        ));
        return None;
    }
    if !canonical.is_file() {
        return None;
    }

    let content = match fs::read(&canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!("Failed to read '{}': {e}", canonical.display()));
            return None;
        }
    };

    Some((content, mime::content_type_for(&canonical)))
}

/// Build the file response, honoring If-None-Match and Range
fn build_response(
    ctx: &RequestContext<'_>,
    data: &[u8],
    content_type: &'static str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(ctx.range_header.as_deref(), data.len()) {
        RangeOutcome::Partial { start, end } => response::build_partial_response(
            data,
            content_type,
            &etag,
            start,
            end,
            data.len(),
            ctx.is_head,
        ),
        RangeOutcome::Unsatisfiable => http::build_416_response(data.len()),
        RangeOutcome::Full => response::build_file_response(data, content_type, &etag, ctx.is_head),
    }
}
