//! Request entry point
//!
//! Method check, mode selection, dispatch on the blocking pool and access
//! logging. Never returns an error to hyper: every outcome is a response.

use crate::config::{AppState, ServeMode};
use crate::dispatch::Dispatched;
use crate::error::DispatchError;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::page::{self, EchoInfo, Page};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let server_name = state.config.http.server_name.as_str();

    let mut entry = AccessLogEntry::new(remote.ip().to_string(), method.to_string(), path.clone());
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let response = if method == Method::GET || method == Method::HEAD {
        let page = match state.config.site.mode {
            ServeMode::Echo => echo_page(method.as_str(), &path, remote),
            ServeMode::Dispatch => {
                let out = dispatch_blocking(&state, &path, remote).await;
                logger::log_case_selected(&path, out.case);
                entry.case = out.case.to_string();
                entry.error = out.error.map(|kind| kind.as_str().to_string());
                out.page
            }
        };
        http::build_page_response(page, method == Method::HEAD, server_name)
    } else {
        logger::log_warning(&format!("Method not implemented: {method}"));
        http::build_501_response(server_name)
    };

    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    if state.config.logging.access_log {
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Run the case chain off the reactor; file reads and scripts block
async fn dispatch_blocking(state: &Arc<AppState>, path: &str, remote: SocketAddr) -> Dispatched {
    let worker_state = Arc::clone(state);
    let raw_path = path.to_string();
    let job = tokio::task::spawn_blocking(move || worker_state.dispatcher.dispatch(&raw_path, remote));

    match job.await {
        Ok(out) => out,
        Err(e) => {
            logger::log_error(&format!("Dispatch task for '{path}' failed: {e}"));
            let err = DispatchError::UnknownResourceType {
                path: path.to_string(),
            };
            Dispatched {
                page: Page::error(&err, state.config.http.strict_status),
                case: "fallback",
                error: Some(err.kind()),
            }
        }
    }
}

/// Page describing the request back to the caller
fn echo_page(command: &str, path: &str, remote: SocketAddr) -> Page {
    let info = EchoInfo {
        date_time: chrono::Utc::now()
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string(),
        client_host: remote.ip().to_string(),
        client_port: remote.port(),
        command,
        path,
    };
    Page::html(page::render_echo(&info))
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::fs;
    use std::path::Path;

    fn state(root: &Path, mode: ServeMode) -> Arc<AppState> {
        let mut config = Config::default();
        config.site.root = root.display().to_string();
        config.site.mode = mode;
        config.logging.access_log = false;
        Arc::new(AppState::new(config).unwrap())
    }

    fn remote() -> SocketAddr {
        "127.0.0.1:50123".parse().unwrap()
    }

    async fn call(state: &Arc<AppState>, method: &str, uri: &str) -> (u16, String, String) {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        let resp = handle_request(req, Arc::clone(state), remote()).await.unwrap();
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_serves_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.html"), "<p>hi</p>").unwrap();
        let state = state(dir.path(), ServeMode::Dispatch);

        let (status, content_type, body) = call(&state, "GET", "/page.html").await;
        assert_eq!(status, 200);
        assert_eq!(content_type, "text/html");
        assert_eq!(body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_missing_is_200_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path(), ServeMode::Dispatch);

        let (status, _, body) = call(&state, "GET", "/missing.txt").await;
        assert_eq!(status, 200);
        assert!(body.contains("missing.txt"));
        assert!(body.contains("not found"));
    }

    #[tokio::test]
    async fn test_query_string_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page.html"), "<p>hi</p>").unwrap();
        let state = state(dir.path(), ServeMode::Dispatch);

        let (_, _, body) = call(&state, "GET", "/page.html?x=1").await;
        assert_eq!(body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_post_not_implemented() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path(), ServeMode::Dispatch);

        let (status, _, _) = call(&state, "POST", "/").await;
        assert_eq!(status, 501);
    }

    #[tokio::test]
    async fn test_echo_mode() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(dir.path(), ServeMode::Echo);

        let (status, _, body) = call(&state, "GET", "/anything/at/all").await;
        assert_eq!(status, 200);
        assert!(body.contains("<td>/anything/at/all</td>"));
        assert!(body.contains("<td>127.0.0.1</td>"));
        assert!(body.contains("<td>50123</td>"));
        assert!(body.contains("<td>GET</td>"));
    }

    #[test]
    fn test_header_value() {
        let req = Request::builder()
            .uri("/")
            .header("referer", "http://localhost/docs/")
            .body(())
            .unwrap();
        assert_eq!(
            header_value(&req, "referer").as_deref(),
            Some("http://localhost/docs/")
        );
        assert_eq!(header_value(&req, "user-agent"), None);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
    }
}
