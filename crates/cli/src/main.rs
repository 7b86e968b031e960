//! Enterprise QnA CLI
//!
//! Entry point for the `qna` command-line tool: RAG chat over an
//! enterprise document index, a retrieval-only diagnostic, and the
//! ingestion pipeline commands.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, IngestCommand, SearchCommand};
use qna_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Enterprise QnA - RAG chat over an enterprise document index
#[derive(Parser, Debug)]
#[command(name = "qna")]
#[command(about = "RAG chat over an enterprise document index", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "QNA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chat with the document index (interactive when no question given)
    Chat(ChatCommand),

    /// Run a retrieval-only query and print the normalized chunks
    Search(SearchCommand),

    /// Provision or run the ingestion pipeline
    Ingest(IngestCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    // Load configuration; required values fail fast here
    let config = AppConfig::load(cli.config.as_deref())?
        .with_overrides(cli.log_level, cli.verbose, cli.no_color);

    logging::init(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!(index = %config.search_index, "Enterprise QnA starting");

    let command_name = match &cli.command {
        Commands::Chat(_) => "chat",
        Commands::Search(_) => "search",
        Commands::Ingest(_) => "ingest",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
        Commands::Ingest(cmd) => cmd.execute(&config).await,
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }

    result
}
