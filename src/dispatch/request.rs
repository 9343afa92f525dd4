//! Request resolution
//!
//! Turns the raw request path into an absolute filesystem path under the
//! server root.

use crate::error::{DispatchError, DispatchResult};
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};

/// One inbound request as seen by the case chain. Immutable once built.
#[derive(Debug, Clone)]
pub struct Request {
    raw_path: String,
    full_path: PathBuf,
    remote: SocketAddr,
}

impl Request {
    /// Resolve `raw_path` against `root`.
    ///
    /// With `confine` set, `.` and `..` segments are folded lexically and a
    /// path climbing above the root is rejected. Without it the raw path is
    /// appended to the root as-is.
    ///
    /// Confined resolution drops a trailing `/`, so `/page.html/` reaches the
    /// file `page.html` rather than being reported missing.
    pub fn resolve(
        raw_path: &str,
        root: &Path,
        remote: SocketAddr,
        confine: bool,
    ) -> DispatchResult<Self> {
        let relative = raw_path.trim_start_matches('/');
        let full_path = if confine {
            root.join(normalize(relative).ok_or_else(|| DispatchError::OutsideRoot {
                path: raw_path.to_string(),
            })?)
        } else {
            root.join(relative)
        };

        Ok(Self {
            raw_path: raw_path.to_string(),
            full_path,
            remote,
        })
    }

    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub const fn remote(&self) -> SocketAddr {
        self.remote
    }
}

/// Fold `.`/`..` without touching the filesystem; `None` if the path escapes
fn normalize(relative: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::ParentDir => {
                parts.pop()?;
            }
            // Leading separators were already stripped; a prefix or root here
            // would only come from odd inputs such as "//x" and is ignored.
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts.into_iter().collect())
}
