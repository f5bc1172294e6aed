//! Arguments for the marketplace subcommands

use clap::{Args, Subcommand, ValueEnum};

use crate::config::Scope;

/// Arguments for the marketplace command group
#[derive(Args, Debug)]
pub struct MarketplaceArgs {
    #[command(subcommand)]
    pub command: MarketplaceCommand,
}

#[derive(Subcommand, Debug)]
pub enum MarketplaceCommand {
    /// Add a marketplace from a source
    #[command(after_help = "EXAMPLES:\n  \
                  Add from GitHub shorthand:\n    nova marketplace add nova-team/bundles --scope global\n\n\
                  Add from a git URL:\n    nova marketplace add https://git.acme.dev/bundles.git --scope project\n\n\
                  Add a local directory:\n    nova marketplace add ./marketplaces/dev --scope project")]
    Add(AddArgs),

    /// Remove a marketplace by name or source
    Remove(RemoveArgs),

    /// List configured marketplaces
    List,

    /// Show one marketplace
    Show(ShowArgs),
}

/// Arguments for marketplace add
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Source: owner/repo shorthand, git URL, or local directory
    pub source: String,

    /// Configuration scope to record the marketplace in
    #[arg(long, value_enum)]
    pub scope: ScopeArg,
}

/// Arguments for marketplace remove
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Marketplace name, or its source if the name is ambiguous
    pub target: String,

    /// Scope holding the entry; required when the name exists in several scopes
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,
}

/// Arguments for marketplace show
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Marketplace name
    pub name: String,
}

/// Scope selector on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeArg {
    Global,
    Project,
    User,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Global => Scope::Global,
            ScopeArg::Project => Scope::Project,
            ScopeArg::User => Scope::User,
        }
    }
}
