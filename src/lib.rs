//! A small HTTP server that classifies each request path through an ordered
//! chain of cases (missing, script, file, directory with or without index,
//! fallback) and answers with an HTML page.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod page;
pub mod server;
