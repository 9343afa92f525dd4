// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Listen backlog
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_backlog() -> i32 {
    128
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8888,
            workers: None,
            backlog: default_backlog(),
        }
    }
}

/// What the server answers with
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServeMode {
    /// Classify the path through the case chain
    #[default]
    Dispatch,
    /// Describe the request back to the caller
    Echo,
}

impl std::str::FromStr for ServeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dispatch" => Ok(Self::Dispatch),
            "echo" => Ok(Self::Echo),
            other => Err(format!("unknown mode '{other}' (expected dispatch or echo)")),
        }
    }
}

impl std::fmt::Display for ServeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Dispatch => "dispatch",
            Self::Echo => "echo",
        })
    }
}

/// Site configuration: where files live and how paths are classified
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    /// Server root, resolved to an absolute path at startup
    pub root: String,
    #[serde(default)]
    pub mode: ServeMode,
    /// Entry served for a directory instead of a listing
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Reject request paths whose `..` segments climb above the root
    #[serde(default = "default_confine_to_root")]
    pub confine_to_root: bool,
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_file() -> String {
    "index.html".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_confine_to_root() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            mode: ServeMode::default(),
            index_file: default_index_file(),
            confine_to_root: default_confine_to_root(),
            scripts: ScriptsConfig::default(),
        }
    }
}

/// Script execution configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScriptsConfig {
    #[serde(default = "default_scripts_enabled")]
    pub enabled: bool,
    /// File extension (no dot) -> interpreter program
    #[serde(default = "default_interpreters")]
    pub interpreters: HashMap<String, String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_scripts_enabled() -> bool {
    true
}

fn default_interpreters() -> HashMap<String, String> {
    HashMap::from([("py".to_string(), "python3".to_string())])
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            enabled: default_scripts_enabled(),
            interpreters: default_interpreters(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    /// HTTP/1.1 keep-alive switch: `0` disables it, any other value enables
    /// it. hyper's HTTP/1 server has no idle timer, so the value itself is
    /// not applied.
    pub keep_alive_timeout: u64,
    /// Seconds a client may take to send a request head; `0` disables
    pub read_timeout: u64,
    /// Seconds in-flight connections get to finish after shutdown
    pub shutdown_timeout: u64,
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive_timeout: 75,
            read_timeout: 30,
            shutdown_timeout: 30,
            max_connections: None,
        }
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    /// Send 404/500 for error pages instead of always 200
    #[serde(default)]
    pub strict_status: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: "case_server/0.1".to_string(),
            strict_status: false,
        }
    }
}
