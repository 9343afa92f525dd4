//! Request handler module
//!
//! Bridges hyper requests to the dispatcher (or the echo page) and back.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
