//! Config command implementations

use std::path::Path;

use console::style;

use crate::cli::{ConfigArgs, ConfigCommand, OutputFormat};
use crate::config::{ConfigStore, FileConfigStore};
use crate::error::{MarketplaceError, Result};

/// Run a config subcommand
pub fn run(working_dir: &Path, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show(show_args) => show(working_dir, show_args.format),
    }
}

fn show(working_dir: &Path, format: OutputFormat) -> Result<()> {
    let store = FileConfigStore::new(working_dir);
    let effective = store.load()?;

    for warning in &effective.warnings {
        eprintln!("{} {warning}", style("warning:").yellow().bold());
    }

    let rendered = match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&effective).map_err(|e| MarketplaceError::Internal {
                message: format!("failed to render configuration as YAML: {e}"),
            })?
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&effective).map_err(|e| MarketplaceError::Internal {
                message: format!("failed to render configuration as JSON: {e}"),
            })?
        }
    };
    println!("{rendered}");
    Ok(())
}
