//! HTTP protocol layer module
//!
//! Response construction, kept apart from classification logic.

pub mod response;

pub use response::{build_501_response, build_page_response};
