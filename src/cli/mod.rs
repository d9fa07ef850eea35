pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "focus")]
#[command(about = "Focus CLI - Operator tools for the focus API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a shared-secret bearer token for local development")]
    Token(commands::token::TokenArgs),

    #[command(about = "Apply database migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Check a running server's /health endpoint")]
    Ping(commands::ping::PingArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token(args) => commands::token::handle(args, output_format).await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Ping(args) => commands::ping::handle(args, output_format).await,
    }
}
