// Configuration module entry point
// Loads layered configuration and builds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ScriptsConfig, ServeMode, ServerConfig,
    SiteConfig,
};

/// Values given on the command line; they win over file and environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub mode: Option<ServeMode>,
}

impl Config {
    /// Load configuration from specified file path (extension optional).
    ///
    /// Sources, lowest to highest priority: defaults, the file (if present),
    /// `CASE_SERVER_*` environment variables (`__` separates nested keys,
    /// e.g. `CASE_SERVER_SITE__ROOT`), then `overrides`.
    pub fn load_from(config_path: &str, overrides: &Overrides) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CASE_SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8888)?
            .set_default("server.backlog", 128)?
            .set_default("site.root", ".")?
            .set_default("site.mode", "dispatch")?
            .set_default("site.index_file", "index.html")?
            .set_default("site.confine_to_root", true)?
            .set_default("site.scripts.enabled", true)?
            .set_default("site.scripts.interpreters.py", "python3")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.shutdown_timeout", 30)?
            .set_default("http.server_name", "case_server/0.1")?
            .set_default("http.strict_status", false)?
            .set_override_option("site.root", overrides.root.clone())?
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port.map(i64::from))?
            .set_override_option("site.mode", overrides.mode.map(|m| m.to_string()))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
