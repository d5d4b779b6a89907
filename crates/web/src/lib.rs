//! Melt web routing core
//!
//! This crate defines the web half of Melt: the request/response model,
//! route patterns with path variables, the handler mapping, and the
//! transport-independent dispatcher. The HTTP transport itself lives in
//! the adapters crate.

pub mod context;
pub mod error;
pub mod handler;
pub mod http;
pub mod mapping;
pub mod params;
pub mod pattern;

// Re-export key types for easy access
pub use context::{WebContext, WebContextBuilder};
pub use error::WebError;
pub use handler::{Controller, Handler, Route};
pub use http::{HttpMethod, Request, Response};
pub use mapping::{HandlerMapping, RouteMatch};
pub use params::parse_query;
pub use pattern::PathPattern;

/// Result type for web operations
pub type Result<T> = std::result::Result<T, WebError>;
