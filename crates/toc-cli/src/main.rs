//! essential-toc
//!
//! Table-of-contents tooling for the essential programming books site.
//!
//! # Usage
//!
//! ```bash
//! essential-toc resolve --toc toc_search.js --url https://host/essential/go/5-strings#trim
//! essential-toc follow --toc toc_search.js < locations.txt
//! essential-toc build --outline book.json --out toc_search.js
//! essential-toc log --payload '{"event":"search","q":"slices"}'
//! essential-toc config
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/essential-toc/config.toml)
//! 3. Environment variables (ESSENTIAL_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use toc_cli::{
    handle_build, handle_follow, handle_log, handle_resolve, init_logging, load_settings,
    show_config, Cli, Commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref(), cli.log_level.as_deref())?;
    init_logging(&settings)?;

    match cli.command {
        Commands::Resolve { toc, url } => {
            handle_resolve(&settings, &toc, &url)?;
        }
        Commands::Follow { toc, debounce_ms } => {
            handle_follow(&settings, &toc, debounce_ms).await?;
        }
        Commands::Build {
            outline,
            out,
            minify,
        } => {
            handle_build(&outline, out.as_deref(), minify)?;
        }
        Commands::Log { payload, wait_secs } => {
            handle_log(&settings, &payload, wait_secs).await?;
        }
        Commands::Config => {
            show_config(&settings)?;
        }
    }

    Ok(())
}
