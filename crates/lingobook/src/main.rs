//! Lingobook CLI - multi-language builds for Jupyter Books.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "lingobook")]
#[command(about = "Build every language of a Jupyter Book into one site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to lingobook.toml config file
    #[arg(short, long, default_value = "lingobook.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all languages into the output tree
    Build {
        /// Build only this language code
        #[arg(short, long)]
        lang: Option<String>,

        /// Export PDFs instead of HTML
        #[arg(long)]
        pdf: bool,
    },

    /// Detect languages and refresh languages.json
    Languages,

    /// Preview the built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(&cli.config)?;

    // Execute command
    let ok = match cli.command {
        Commands::Build { lang, pdf } => commands::build::run(&config, lang, pdf).await?,
        Commands::Languages => {
            commands::languages::run(&config)?;
            true
        }
        Commands::Serve { port, dir } => {
            let dir = dir.unwrap_or_else(|| config.output_dir());
            commands::serve::run(port, dir, &config.book.static_dir, &config.book.entry_page)
                .await?;
            true
        }
    };

    Ok(exit_code(ok))
}

/// Partial builds exit non-zero so CI notices a missing language.
fn exit_code(all_built: bool) -> ExitCode {
    if all_built {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
