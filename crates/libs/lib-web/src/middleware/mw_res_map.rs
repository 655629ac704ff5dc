//! # Response Mapping Middleware
//!
//! Last stop before the logging layer: flags server errors and makes sure
//! every error response declares a content type.

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::error;

/// Response mapping middleware.
///
/// Error responses that left without a content type (the router's own
/// rejections, the 404 fallback) keep their body; only 5xx are logged here.
pub async fn map_res(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut res = next.run(req).await;

    if res.status().is_server_error() {
        error!("[RESPONSE] Server error on {}: {}", path, res.status());
    }

    if res.status().is_client_error() || res.status().is_server_error() {
        res.headers_mut()
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("text/plain; charset=utf-8"));
    }

    res
}
