//! Artscout - identify paintings from a photograph.
//!
//! Runs an HTTP service that accepts an uploaded image, finds visually
//! similar images on the web, and asks an LLM to identify the artist and
//! artwork from those matches.
//!
//! # Usage
//!
//! ```bash
//! # Start the server (keys come from IMGBB_API_KEY, SERPAPI_KEY, CEREBRAS_API_KEY)
//! artscout serve --port 3001
//!
//! # View configuration
//! artscout config show
//!
//! # Check that provider keys resolve
//! artscout config check
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;
mod server;

/// Artscout - painting identification via reverse image search and an LLM.
#[derive(Parser, Debug)]
#[command(name = "artscout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP search server
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging from config, with CLI verbose override.
    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match artscout_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `artscout config path`."
            );
            artscout_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Artscout v{}", artscout_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config).await,
    }
}
