//! Routes command implementation
//!
//! This module implements the `melt routes` command: build the demo
//! application context and print the handler mappings it registers.

use anyhow::{Context, Result};

use crate::app;

/// Execute the routes command
pub fn execute_routes_command() -> Result<()> {
    let context = app::build_web_context().context("Failed to build application context")?;

    println!("📋 Registered handler mappings:");
    for route in context.mapping().routes() {
        println!("  {} {} -> {}", route.method(), route.pattern(), route.name());
    }
    println!();
    println!("Total: {} routes", context.mapping().len());

    Ok(())
}
