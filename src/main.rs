//! paperdex CLI entry point

use clap::{Parser, Subcommand};
use paperdex::{
    answer::print_answer,
    commands::{cmd_add, cmd_query, print_ingest_stats},
    config::{default_index_path, default_ollama_host, default_paper_dir, LlmBackend, Settings},
    discover::running_ollama_model,
    error::Result,
};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "paperdex")]
#[command(version, about = "Ask questions of a personal PDF paper library", long_about = None)]
struct Cli {
    /// LLM backend to use
    #[arg(long, global = true, value_enum, default_value_t = LlmBackend::Ollama)]
    llm: LlmBackend,

    /// Ollama model name (defaults to the currently running model)
    #[arg(long = "ollama_model", global = true)]
    ollama_model: Option<String>,

    /// Verbosity: 0 answer only, 1 adds reasoning, 2 adds contexts, 3 debug logs
    #[arg(long, global = true, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add documents to the index
    Add {
        /// Path to the folder containing papers
        #[arg(long = "paper_dir", default_value_os_t = default_paper_dir())]
        paper_dir: PathBuf,

        /// Path to the persisted index
        #[arg(long = "file_path", default_value_os_t = default_index_path())]
        file_path: PathBuf,
    },

    /// Query your index
    Query {
        /// The question to ask
        query: String,

        /// Path to the persisted index
        #[arg(long = "file_path", default_value_os_t = default_index_path())]
        file_path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // 0 = errors only, 1 = warnings, 2 = info, 3 = debug
    let level = match cli.verbose {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let settings = build_settings(&cli).await?;
    println!("Using model: {}", settings.llm_model);

    match cli.command {
        Commands::Add {
            paper_dir,
            file_path,
        } => {
            println!("Adding documents...\n");
            let stats = cmd_add(&settings, &file_path, &paper_dir).await?;
            print_ingest_stats(&stats);
        }

        Commands::Query { query, file_path } => {
            println!("Processing query...\n");
            let answer = cmd_query(&settings, &file_path, &query).await?;
            print_answer(&answer, cli.verbose);
        }
    }

    Ok(())
}

/// Resolve the model name (asking the Ollama daemon when none was given)
/// and build the immutable settings bundle.
async fn build_settings(cli: &Cli) -> Result<Settings> {
    let model = match cli.llm {
        LlmBackend::Openai => None,
        LlmBackend::Ollama => match cli.ollama_model.clone() {
            Some(model) => Some(model),
            None => running_ollama_model(&default_ollama_host()).await?,
        },
    };

    Settings::build(cli.llm, model)
}
