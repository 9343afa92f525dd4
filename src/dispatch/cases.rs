//! Standard cases
//!
//! Each case is one classification rule: a predicate over the resolved path
//! and the action taken when it holds.

use super::request::Request;
use crate::error::{DispatchError, DispatchResult};
use crate::page::{self, Page};
use std::collections::HashMap;
use std::fs;
use std::process::Command;

/// Longest stderr excerpt carried into an execution failure message
const STDERR_EXCERPT: usize = 200;

/// A predicate+action pair. Implementations must not keep per-request state.
pub trait Case: Send + Sync {
    /// Stable identifier, used for logging and positional insertion
    fn name(&self) -> &'static str;

    fn matches(&self, request: &Request) -> bool;

    fn handle(&self, request: &Request) -> DispatchResult<Page>;
}

/// Resolved path does not exist
pub struct NotFoundCase;

impl Case for NotFoundCase {
    fn name(&self) -> &'static str {
        "not_found"
    }

    fn matches(&self, request: &Request) -> bool {
        !request.full_path().exists()
    }

    fn handle(&self, request: &Request) -> DispatchResult<Page> {
        Err(DispatchError::NotFound {
            path: request.raw_path().to_string(),
        })
    }
}

/// File with a known script extension, run through its interpreter
pub struct ExecutableCase {
    interpreters: HashMap<String, String>,
}

impl ExecutableCase {
    /// `interpreters` maps a file extension (without the dot) to a program
    pub const fn new(interpreters: HashMap<String, String>) -> Self {
        Self { interpreters }
    }

    fn interpreter_for(&self, request: &Request) -> Option<&str> {
        let ext = request.full_path().extension()?.to_str()?;
        self.interpreters.get(ext).map(String::as_str)
    }
}

impl Case for ExecutableCase {
    fn name(&self) -> &'static str {
        "executable"
    }

    fn matches(&self, request: &Request) -> bool {
        request.full_path().is_file() && self.interpreter_for(request).is_some()
    }

    fn handle(&self, request: &Request) -> DispatchResult<Page> {
        let path = request.raw_path().to_string();
        let Some(interpreter) = self.interpreter_for(request) else {
            return Err(DispatchError::UnknownResourceType { path });
        };

        let output = Command::new(interpreter)
            .arg(request.full_path())
            .output()
            .map_err(|e| DispatchError::Execution {
                path: path.clone(),
                reason: format!("cannot start {interpreter}: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let excerpt: String = stderr.trim().chars().take(STDERR_EXCERPT).collect();
            return Err(DispatchError::Execution {
                path,
                reason: format!("{interpreter} {}: {excerpt}", output.status),
            });
        }

        Ok(Page::html(output.stdout))
    }
}

/// Existing regular file, served verbatim
pub struct RegularFileCase;

impl Case for RegularFileCase {
    fn name(&self) -> &'static str {
        "file"
    }

    fn matches(&self, request: &Request) -> bool {
        request.full_path().is_file()
    }

    fn handle(&self, request: &Request) -> DispatchResult<Page> {
        read_page(request, request.full_path())
    }
}

/// Directory holding an index entry
pub struct DirectoryWithIndexCase {
    index_file: String,
}

impl DirectoryWithIndexCase {
    pub fn new(index_file: impl Into<String>) -> Self {
        Self {
            index_file: index_file.into(),
        }
    }
}

impl Case for DirectoryWithIndexCase {
    fn name(&self) -> &'static str {
        "directory_index"
    }

    fn matches(&self, request: &Request) -> bool {
        let path = request.full_path();
        path.is_dir() && path.join(&self.index_file).is_file()
    }

    fn handle(&self, request: &Request) -> DispatchResult<Page> {
        read_page(request, &request.full_path().join(&self.index_file))
    }
}

/// Directory without an index entry, rendered as a listing
pub struct DirectoryWithoutIndexCase {
    index_file: String,
}

impl DirectoryWithoutIndexCase {
    pub fn new(index_file: impl Into<String>) -> Self {
        Self {
            index_file: index_file.into(),
        }
    }
}

impl Case for DirectoryWithoutIndexCase {
    fn name(&self) -> &'static str {
        "directory_listing"
    }

    // Exact complement of DirectoryWithIndexCase over directories
    fn matches(&self, request: &Request) -> bool {
        let path = request.full_path();
        path.is_dir() && !path.join(&self.index_file).is_file()
    }

    fn handle(&self, request: &Request) -> DispatchResult<Page> {
        let list_error = |source: std::io::Error| DispatchError::List {
            path: request.raw_path().to_string(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(request.full_path()).map_err(list_error)? {
            let entry = entry.map_err(list_error)?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();

        Ok(Page::html(page::render_listing(names)))
    }
}

/// Terminal case, always matches
pub struct FallbackCase;

impl Case for FallbackCase {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn matches(&self, _request: &Request) -> bool {
        true
    }

    fn handle(&self, request: &Request) -> DispatchResult<Page> {
        Err(DispatchError::UnknownResourceType {
            path: request.raw_path().to_string(),
        })
    }
}

fn read_page(request: &Request, file: &std::path::Path) -> DispatchResult<Page> {
    fs::read(file)
        .map(Page::html)
        .map_err(|source| DispatchError::Read {
            path: request.raw_path().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::path::Path;

    fn request(root: &Path, raw: &str) -> Request {
        Request::resolve(raw, root, "127.0.0.1:1234".parse().unwrap(), true).unwrap()
    }

    #[test]
    fn test_not_found_case() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), "/missing.txt");
        assert!(NotFoundCase.matches(&req));
        let err = NotFoundCase.handle(&req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    }

    #[test]
    fn test_regular_file_case_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.bin"), [0u8, 159, 146, 150]).unwrap();
        let req = request(dir.path(), "/data.bin");
        assert!(RegularFileCase.matches(&req));
        assert!(!NotFoundCase.matches(&req));
        let page = RegularFileCase.handle(&req).unwrap();
        assert_eq!(page.body(), &[0u8, 159, 146, 150]);
    }

    #[test]
    fn test_directory_cases_are_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("with")).unwrap();
        fs::write(dir.path().join("with/index.html"), "<h1>home</h1>").unwrap();
        fs::create_dir(dir.path().join("without")).unwrap();
        fs::write(dir.path().join("without/a.txt"), "a").unwrap();

        let with_index = DirectoryWithIndexCase::new("index.html");
        let without_index = DirectoryWithoutIndexCase::new("index.html");

        let req = request(dir.path(), "/with/");
        assert!(with_index.matches(&req));
        assert!(!without_index.matches(&req));
        assert_eq!(with_index.handle(&req).unwrap().body(), b"<h1>home</h1>");

        let req = request(dir.path(), "/without/");
        assert!(!with_index.matches(&req));
        assert!(without_index.matches(&req));
    }

    #[test]
    fn test_listing_hides_dot_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("visible.txt"), "v").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let req = request(dir.path(), "/");
        let page = DirectoryWithoutIndexCase::new("index.html")
            .handle(&req)
            .unwrap();
        let body = String::from_utf8(page.into_body()).unwrap();
        assert_eq!(body.matches("<li>").count(), 2);
        assert!(body.contains("<li>sub</li>"));
        assert!(body.contains("<li>visible.txt</li>"));
        assert!(!body.contains(".hidden"));
    }

    #[test]
    fn test_file_removed_after_classification() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("gone.html"), "x").unwrap();
        let req = request(dir.path(), "/gone.html");
        assert!(RegularFileCase.matches(&req));

        fs::remove_file(dir.path().join("gone.html")).unwrap();
        let err = RegularFileCase.handle(&req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadFailure);
        assert_eq!(err.path(), "/gone.html");
    }

    #[test]
    fn test_directory_removed_after_classification() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("gone")).unwrap();
        let case = DirectoryWithoutIndexCase::new("index.html");
        let req = request(dir.path(), "/gone/");
        assert!(case.matches(&req));

        fs::remove_dir(dir.path().join("gone")).unwrap();
        let err = case.handle(&req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ListFailure);
        assert_eq!(err.path(), "/gone/");
    }

    #[test]
    fn test_executable_matches_known_extension_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run.sh"), "echo hi").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let case = ExecutableCase::new(HashMap::from([("sh".to_string(), "sh".to_string())]));

        assert!(case.matches(&request(dir.path(), "/run.sh")));
        assert!(!case.matches(&request(dir.path(), "/notes.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("run.sh"), "printf '<p>from script</p>'").unwrap();
        let case = ExecutableCase::new(HashMap::from([("sh".to_string(), "sh".to_string())]));

        let page = case.handle(&request(dir.path(), "/run.sh")).unwrap();
        assert_eq!(page.body(), b"<p>from script</p>");
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fail.sh"), "echo broken >&2; exit 3").unwrap();
        let case = ExecutableCase::new(HashMap::from([("sh".to_string(), "sh".to_string())]));

        let err = case.handle(&request(dir.path(), "/fail.sh")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_executable_missing_interpreter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("x.zz"), "").unwrap();
        let case = ExecutableCase::new(HashMap::from([(
            "zz".to_string(),
            "definitely-not-an-interpreter-on-path".to_string(),
        )]));

        let err = case.handle(&request(dir.path(), "/x.zz")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
        assert!(err.to_string().contains("cannot start"));
    }

    #[test]
    fn test_fallback_always_errors() {
        let dir = tempfile::tempdir().unwrap();
        let req = request(dir.path(), "/");
        assert!(FallbackCase.matches(&req));
        assert_eq!(
            FallbackCase.handle(&req).unwrap_err().kind(),
            ErrorKind::UnknownResourceType
        );
    }
}
