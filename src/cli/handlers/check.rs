use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons::GlobalOptions,
    core::config_loader::{self, CatalogSource},
    models::{PrerequisitePolicy, VisibilityPolicy},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Loads and validates a catalog, then prints a summary."
)]
struct CheckArgs {
    /// Catalog file to check. Defaults to the catalog that would be used.
    path: Option<String>,
}

/// Checks a catalog file, or the catalog that would be used, and prints a summary.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;
    let requested = check_args.path.as_deref().or(options.catalog.as_deref());

    let loaded = config_loader::load_catalog(requested)?;
    let catalog = &loaded.catalog;
    let catalog_options = catalog.options();

    println!(
        "\n{} {}",
        t!("common.success").green().bold(),
        format!(t!("check.success.valid"), source = loaded.source)
    );
    if loaded.source == CatalogSource::Builtin {
        println!("  {}", t!("check.info.builtin_hint").dimmed());
    }

    println!(
        "  {:<16} {}",
        t!("check.label.commands").blue(),
        catalog.commands().len()
    );
    println!(
        "  {:<16} {}",
        t!("check.label.arguments").blue(),
        catalog.arguments().len()
    );
    println!(
        "  {:<16} {}",
        t!("check.label.prerequisites").blue(),
        match catalog_options.prerequisites {
            PrerequisitePolicy::Declared => t!("check.policy.declared"),
            PrerequisitePolicy::Transitive => t!("check.policy.transitive"),
        }
    );
    println!(
        "  {:<16} {}",
        t!("check.label.visibility").blue(),
        match catalog_options.visibility {
            VisibilityPolicy::RemovedCommand => t!("check.policy.removed_command"),
            VisibilityPolicy::Rescan => t!("check.policy.rescan"),
        }
    );

    Ok(())
}
