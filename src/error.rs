//! Dispatch error module
//!
//! A single error-result type for everything a case can fail with.
//! Every variant is rendered through the same error page.

use std::io;
use thiserror::Error;

/// Classification of a dispatch failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ResourceNotFound,
    ReadFailure,
    ListFailure,
    UnknownResourceType,
    ExecutionFailure,
    OutsideRoot,
    UnknownCase,
}

impl ErrorKind {
    /// Short label used in access logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResourceNotFound => "not_found",
            Self::ReadFailure => "read_failure",
            Self::ListFailure => "list_failure",
            Self::UnknownResourceType => "unknown_type",
            Self::ExecutionFailure => "execution_failure",
            Self::OutsideRoot => "outside_root",
            Self::UnknownCase => "unknown_case",
        }
    }
}

/// Errors raised while classifying or handling a request
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("'{path}' not found")]
    NotFound { path: String },

    #[error("Cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Cannot list '{path}': {source}")]
    List {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Unknown object '{path}'")]
    UnknownResourceType { path: String },

    #[error("Failed to run '{path}': {reason}")]
    Execution { path: String, reason: String },

    #[error("'{path}' is outside the server root")]
    OutsideRoot { path: String },

    #[error("No case named '{name}' in the chain")]
    UnknownCase { name: String },
}

impl DispatchError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::ResourceNotFound,
            Self::Read { .. } => ErrorKind::ReadFailure,
            Self::List { .. } => ErrorKind::ListFailure,
            Self::UnknownResourceType { .. } => ErrorKind::UnknownResourceType,
            Self::Execution { .. } => ErrorKind::ExecutionFailure,
            Self::OutsideRoot { .. } => ErrorKind::OutsideRoot,
            Self::UnknownCase { .. } => ErrorKind::UnknownCase,
        }
    }

    /// The offending request path (or case name for chain-building errors)
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::Read { path, .. }
            | Self::List { path, .. }
            | Self::UnknownResourceType { path }
            | Self::Execution { path, .. }
            | Self::OutsideRoot { path } => path,
            Self::UnknownCase { name } => name,
        }
    }
}

pub type DispatchResult<T> = Result<T, DispatchError>;
