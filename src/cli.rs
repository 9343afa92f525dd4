//! Command-line arguments

use crate::config::{Overrides, ServeMode};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "case_server", version, about = "Serve a directory tree through an ordered chain of request cases")]
pub struct Cli {
    /// Configuration file (extension optional, missing file is fine)
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Server root directory
    #[arg(short, long)]
    pub root: Option<String>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,

    /// dispatch (case chain) or echo (describe the request)
    #[arg(short, long)]
    pub mode: Option<ServeMode>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            root: self.root.clone(),
            host: self.host.clone(),
            port: self.port,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["case_server"]);
        assert_eq!(cli.config, "config");
        assert!(cli.root.is_none());
        assert!(!cli.print_config);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "case_server",
            "--root",
            "/srv/www",
            "--port",
            "9000",
            "--mode",
            "echo",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.root.as_deref(), Some("/srv/www"));
        assert_eq!(overrides.port, Some(9000));
        assert_eq!(overrides.mode, Some(ServeMode::Echo));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["case_server", "--mode", "linear"]).is_err());
    }
}
