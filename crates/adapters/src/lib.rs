//! Melt protocol adapters
//!
//! This crate bridges external protocols with the Melt dispatcher. The
//! embedded HTTP server funnels every request through the web context's
//! handler mapping, so routing decisions stay in one place.

pub mod dispatch;
pub mod http_server;

pub use http_server::{HttpServer, ServerConfig};
