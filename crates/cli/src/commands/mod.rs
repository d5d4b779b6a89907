//! CLI command modules

pub mod routes;
pub mod serve;

pub use routes::execute_routes_command;
pub use serve::{execute_serve_command, ServeArgs};
