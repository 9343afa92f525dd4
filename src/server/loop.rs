// Server loop module
// Accepts connections until shutdown is requested, then drains them

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections on `listener` until `state.shutdown` is notified.
///
/// Accept errors are logged and the loop keeps going; a failing connection
/// never ends the server. After the listener closes, idle keep-alive
/// connections are told to close and requests already being served get up
/// to `performance.shutdown_timeout` seconds to complete before this returns.
pub async fn run(listener: TcpListener, state: Arc<AppState>) {
    let shutdown = Arc::clone(&state.shutdown);
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => break,
        }
    }

    drop(listener);
    logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));

    let deadline = Duration::from_secs(state.config.performance.shutdown_timeout);
    tokio::select! {
        () = graceful.shutdown() => logger::log_drained(),
        () = tokio::time::sleep(deadline) => {
            logger::log_warning(&format!(
                "[Shutdown] {} connection(s) still open after {}s, abandoning them",
                state.active_connections.load(Ordering::SeqCst),
                deadline.as_secs()
            ));
        }
    }
}
