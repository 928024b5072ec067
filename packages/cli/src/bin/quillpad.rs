use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use quillpad_cli::{server, Config};

mod cli;

use cli::tokens::TokenCommands;

#[derive(Parser)]
#[command(name = "quillpad")]
#[command(about = "Quillpad blog tag service")]
#[command(version)]
struct Cli {
    /// Path to the SQLite database (overrides QUILLPAD_DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to bind (overrides QUILLPAD_HOST)
        #[arg(long)]
        host: Option<std::net::IpAddr>,

        /// Port to listen on (overrides QUILLPAD_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Manage API tokens used to authorize tag changes
    #[command(subcommand)]
    Token(TokenCommands),
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(database) = cli.database {
        config.database_path = database;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                anyhow::ensure!(port != 0, "Port 0 is out of valid range (1-65535)");
                config.port = port;
            }
            server::run(config).await
        }
        Commands::Token(command) => cli::tokens::handle_token_command(command, &config).await,
    }
}
