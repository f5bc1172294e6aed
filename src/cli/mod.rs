//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument
//! types:
//! - marketplace: Marketplace subcommand arguments
//! - config: Config subcommand arguments
//! - completions: Completions command arguments

use clap::builder::{styling::AnsiColor, Styles};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod config;
pub mod marketplace;

pub use completions::CompletionsArgs;
pub use config::{ConfigArgs, ConfigCommand, OutputFormat};
pub use marketplace::{
    AddArgs, MarketplaceArgs, MarketplaceCommand, RemoveArgs, ScopeArg, ShowArgs,
};

/// Nova - bundle manager
///
/// Manage bundles distributed through marketplaces, with layered global,
/// project, and user configuration.
#[derive(Parser, Debug)]
#[command(
    name = "nova",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Bundle manager with layered configuration and marketplace acquisition",
    long_about = "Nova manages bundles distributed through marketplaces (manifest-based \
                  catalogs in git repositories or local directories). Configuration is \
                  layered across global, project, and user scopes.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  nova marketplace add nova-team/bundles --scope global   \x1b[90m# Add from GitHub shorthand\x1b[0m\n   \
                  nova marketplace add ./marketplaces/dev --scope project \x1b[90m# Add a local directory\x1b[0m\n   \
                  nova marketplace list                                   \x1b[90m# List configured marketplaces\x1b[0m\n   \
                  nova marketplace remove official                        \x1b[90m# Remove by name\x1b[0m\n   \
                  nova config show --format json                          \x1b[90m# Print the effective config\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Working directory for project discovery (defaults to current directory)
    #[arg(long = "working-dir", short = 'C', global = true, env = "NOVA_WORKING_DIR")]
    pub working_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage marketplaces
    Marketplace(MarketplaceArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}
