//! Serve command implementation
//!
//! This module implements the `melt serve` command: build the demo
//! application context, start the embedded HTTP server, and run until a
//! shutdown signal arrives.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;

use melt_adapters::{HttpServer, ServerConfig};

use crate::app;

/// Arguments for the serve command
pub struct ServeArgs {
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

/// Execute the serve command
pub async fn execute_serve_command(args: ServeArgs) -> Result<()> {
    println!("🚀 Starting Melt server...");
    println!("🔌 Binding: {}:{}", args.host, args.port);
    println!();

    // Initialize tracing for the server
    tracing_subscriber::fmt()
        .with_env_filter("melt=debug,info")
        .init();

    let addr = parse_bind_address(&args.host, args.port)?;

    let context = app::build_web_context().context("Failed to build application context")?;

    println!("📋 Registered routes: {}", context.mapping().len());
    context.mapping().log_routes();
    println!();

    let config = ServerConfig {
        addr,
        ..ServerConfig::default()
    };
    let server = HttpServer::new(config, Arc::new(context));

    println!("🔄 Server running... Press Ctrl+C to shutdown");
    server
        .run_until(wait_for_shutdown())
        .await
        .context("Failed to run HTTP server")?;

    println!("\n✅ Server shutdown complete");
    Ok(())
}

/// Parse a bind address with helpful error messages
pub fn parse_bind_address(host: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = host.parse().with_context(|| {
        format!("Invalid host address '{host}'. Expected an IP such as 127.0.0.1")
    })?;
    Ok(SocketAddr::new(ip, port))
}

/// Wait for shutdown signal (Ctrl+C)
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        // Valid addresses
        assert!(parse_bind_address("127.0.0.1", 8080).is_ok());
        assert!(parse_bind_address("0.0.0.0", 80).is_ok());
        assert!(parse_bind_address("::1", 8080).is_ok());

        // Invalid addresses
        assert!(parse_bind_address("localhost", 8080).is_err());
        assert!(parse_bind_address("not an ip", 8080).is_err());
    }

    #[test]
    fn test_serve_args() {
        let args = ServeArgs {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };

        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 8080);
    }
}
