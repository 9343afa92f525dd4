// Application state module
// Immutable state built once at startup and shared by every connection

use std::io;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::dispatch::Dispatcher;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Case chain and server root; never mutated after construction
    pub dispatcher: Dispatcher,
    /// Notified once when the server should stop accepting connections
    pub shutdown: Arc<Notify>,
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Build the state with the standard case chain for `config.site`
    pub fn new(config: Config) -> io::Result<Self> {
        let dispatcher = Dispatcher::from_config(&config.site, &config.http)?;
        Ok(Self::with_dispatcher(config, dispatcher))
    }

    /// Build the state around a caller-assembled dispatcher (custom chains)
    pub fn with_dispatcher(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config,
            dispatcher,
            shutdown: Arc::new(Notify::new()),
            active_connections: AtomicUsize::new(0),
        }
    }
}
