//! Marketplace command implementations

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::{AddArgs, MarketplaceArgs, MarketplaceCommand, RemoveArgs, ShowArgs};
use crate::config::FileConfigStore;
use crate::error::Result;
use crate::marketplace::{Marketplace, MarketplaceInfo};
use crate::paths::NovaPaths;

/// Run a marketplace subcommand
pub fn run(working_dir: &Path, args: MarketplaceArgs) -> Result<()> {
    match args.command {
        MarketplaceCommand::Add(add_args) => add(working_dir, add_args),
        MarketplaceCommand::Remove(remove_args) => remove(working_dir, remove_args),
        MarketplaceCommand::List => list(working_dir),
        MarketplaceCommand::Show(show_args) => show(working_dir, show_args),
    }
}

fn service_parts(working_dir: &Path) -> Result<(FileConfigStore, NovaPaths)> {
    let paths = NovaPaths::resolve(working_dir)?;
    let store = FileConfigStore::new(working_dir);
    Ok((store, paths))
}

fn add(working_dir: &Path, args: AddArgs) -> Result<()> {
    let (store, paths) = service_parts(working_dir)?;
    let service = Marketplace::new(&store, paths, working_dir);

    let spinner = fetch_spinner(&args.source);
    let result = service.add(&args.source, args.scope.into());
    spinner.finish_and_clear();

    let info = result?;
    println!(
        "{} Added marketplace {} ({})",
        style("✓").green().bold(),
        style(&info.name).cyan().bold(),
        bundle_count_label(info.bundle_count),
    );
    if !info.description.is_empty() {
        println!("  {}", style(&info.description).dim());
    }
    Ok(())
}

fn remove(working_dir: &Path, args: RemoveArgs) -> Result<()> {
    let (store, paths) = service_parts(working_dir)?;
    let service = Marketplace::new(&store, paths, working_dir);

    let info = service.remove(&args.target, args.scope.map(Into::into))?;
    println!(
        "{} Removed marketplace {}",
        style("✓").green().bold(),
        style(&info.name).cyan().bold(),
    );
    Ok(())
}

fn list(working_dir: &Path) -> Result<()> {
    let (store, paths) = service_parts(working_dir)?;
    let service = Marketplace::new(&store, paths, working_dir);

    let infos = service.list()?;
    if infos.is_empty() {
        println!("No marketplaces configured");
        return Ok(());
    }

    for info in &infos {
        print_info_line(info);
    }
    Ok(())
}

fn show(working_dir: &Path, args: ShowArgs) -> Result<()> {
    let (store, paths) = service_parts(working_dir)?;
    let service = Marketplace::new(&store, paths, working_dir);

    let info = service.get(&args.name)?;
    println!("{}", style(&info.name).cyan().bold());
    if !info.description.is_empty() {
        println!("  {}", info.description);
    }
    println!("  source:  {}", info.source);
    println!("  bundles: {}", info.bundle_count);
    Ok(())
}

fn print_info_line(info: &MarketplaceInfo) {
    println!(
        "{}  {}  {}",
        style(&info.name).cyan().bold(),
        style(bundle_count_label(info.bundle_count)).dim(),
        style(info.source.to_string()).dim(),
    );
    if !info.description.is_empty() {
        println!("    {}", style(&info.description).dim());
    }
}

fn bundle_count_label(count: usize) -> String {
    if count == 1 {
        "1 bundle".to_string()
    } else {
        format!("{count} bundles")
    }
}

fn fetch_spinner(source: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_message(format!("Fetching {source}..."));
    if let Ok(spinner_style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(spinner_style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
