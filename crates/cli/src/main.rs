use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod app;
mod commands;

use commands::{execute_routes_command, execute_serve_command, ServeArgs};

#[derive(Parser)]
#[command(name = "melt")]
#[command(about = "Melt - a miniature component-container web framework")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the demo web application
    Serve(ServeCommandArgs),
    /// List the registered handler mappings
    Routes,
}

#[derive(Args)]
pub struct ServeCommandArgs {
    /// Host address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let serve_args = ServeArgs {
                host: args.host,
                port: args.port,
            };
            execute_serve_command(serve_args).await
        }
        Commands::Routes => execute_routes_command(),
    }
}
