//! essential-toc command-line library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (resolve, follow, build, log, config)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
pub use commands::{
    follow_lines, format_resolution, handle_build, handle_follow, handle_log, handle_resolve,
    init_logging, load_settings, parse_location, render_config, resolve, send_and_wait,
    show_config, Resolution,
};
