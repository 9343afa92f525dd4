//! HTTP response building module
//!
//! Turns pages into hyper responses. Builder failures are logged and replaced
//! by an empty response rather than surfacing as transport errors.

use crate::page::Page;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Build the response for a rendered page
///
/// `Content-Length` is always the full body length; HEAD drops the body only.
pub fn build_page_response(page: Page, is_head: bool, server_name: &str) -> Response<Full<Bytes>> {
    let status = page.status;
    let content_type = page.content_type();
    let content_length = page.content_length();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(page.into_body())
    };

    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Server", server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 501 Not Implemented response for methods other than GET/HEAD
pub fn build_501_response(server_name: &str) -> Response<Full<Bytes>> {
    const BODY: &str = "501 Not Implemented";
    Response::builder()
        .status(501)
        .header("Content-Type", "text/plain")
        .header("Content-Length", BODY.len())
        .header("Allow", "GET, HEAD")
        .header("Server", server_name)
        .body(Full::new(Bytes::from(BODY)))
        .unwrap_or_else(|e| {
            log_build_error("501", &e);
            Response::new(Full::new(Bytes::from(BODY)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
