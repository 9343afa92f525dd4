//! Request classification and dispatch
//!
//! Maps a raw request path onto the server root and hands it to the first
//! case in the chain that claims it.

pub mod cases;
pub mod chain;
pub mod request;

pub use cases::Case;
pub use chain::{CaseChain, Dispatched};
pub use request::Request;

use crate::config::{HttpConfig, SiteConfig};
use crate::page::Page;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Case name reported when the path is rejected before classification
pub const RESOLVE_STAGE: &str = "resolve";

/// Process-wide dispatcher, built once at startup and shared read-only
pub struct Dispatcher {
    chain: CaseChain,
    root: PathBuf,
    confine_to_root: bool,
    strict_status: bool,
}

impl Dispatcher {
    pub const fn new(
        chain: CaseChain,
        root: PathBuf,
        confine_to_root: bool,
        strict_status: bool,
    ) -> Self {
        Self {
            chain,
            root,
            confine_to_root,
            strict_status,
        }
    }

    /// Standard chain over the configured root. The root must exist.
    pub fn from_config(site: &SiteConfig, http: &HttpConfig) -> io::Result<Self> {
        let root = Path::new(&site.root).canonicalize().map_err(|e| {
            io::Error::new(e.kind(), format!("server root '{}': {e}", site.root))
        })?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("server root '{}' is not a directory", root.display()),
            ));
        }
        Ok(Self::new(
            CaseChain::standard(site),
            root,
            site.confine_to_root,
            http.strict_status,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn chain(&self) -> &CaseChain {
        &self.chain
    }

    /// Resolve `raw_path` under the root and run it through the chain
    pub fn dispatch(&self, raw_path: &str, remote: SocketAddr) -> Dispatched {
        match Request::resolve(raw_path, &self.root, remote, self.confine_to_root) {
            Ok(request) => self.chain.dispatch(&request, self.strict_status),
            Err(err) => Dispatched {
                page: Page::error(&err, self.strict_status),
                case: RESOLVE_STAGE,
                error: Some(err.kind()),
            },
        }
    }
}
