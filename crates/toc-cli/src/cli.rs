//! CLI argument parsing for essential-toc.
//!
//! CLI flags override all other config sources.

use clap::{Parser, Subcommand};

/// Essential TOC
///
/// Table-of-contents tooling for the essential programming books site.
#[derive(Parser, Debug)]
#[command(name = "essential-toc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/essential-toc/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which TOC entries a page expands
    Resolve {
        /// TOC data file (gBookToc script or JSON array)
        #[arg(short, long)]
        toc: String,

        /// Page URL, or a path with optional #fragment
        #[arg(short, long)]
        url: String,
    },

    /// Resolve each location read from stdin, debounced
    Follow {
        /// TOC data file (gBookToc script or JSON array)
        #[arg(short, long)]
        toc: String,

        /// Override the debounce quiet period (milliseconds)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Generate TOC data from a book outline
    Build {
        /// Book outline (JSON)
        #[arg(short, long)]
        outline: String,

        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<String>,

        /// Emit compact JSON
        #[arg(long)]
        minify: bool,
    },

    /// Send one JSON record to the configured log sink
    Log {
        /// JSON payload
        #[arg(short, long)]
        payload: String,

        /// Seconds to wait for the delivery diagnostic
        #[arg(long, default_value = "10")]
        wait_secs: u64,
    },

    /// Print the effective configuration
    Config,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
