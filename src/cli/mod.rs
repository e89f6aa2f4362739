pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "flux")]
#[command(about = "Flux CLI - administration for the Flux Music API database")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "Database URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Replace the song catalogue with the demo songs")]
    Seed,

    #[command(about = "User account management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },

    #[command(about = "Bearer token management")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    let state = AppState::connect(config).await?;

    let result = match cli.command {
        Commands::Seed => commands::seed::handle(&state, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, &state, output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, &state, output_format).await,
    };

    state.db.close().await;
    result
}
