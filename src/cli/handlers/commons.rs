// src/cli/handlers/commons.rs

// Shared helpers used by several handlers.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::core::{
    catalog::WorkloadCatalog, config_loader, selection::WorkloadSelectionEngine,
    validation::ValidationReport,
};

/// Options given before the command name, shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit catalog path (`--catalog`).
    pub catalog: Option<String>,
}

/// Loads the catalog selected by the global options and wraps it for sharing.
pub fn load_catalog(options: &GlobalOptions) -> Result<Arc<WorkloadCatalog>> {
    let loaded = config_loader::load_catalog(options.catalog.as_deref())?;
    log::info!("Catalog loaded from {}", loaded.source);
    Ok(Arc::new(loaded.catalog))
}

/// Prints every command name with its description, one per line.
pub fn print_available_commands(catalog: &WorkloadCatalog) {
    println!("{}", t!("common.header.available_commands").bold());
    for cmd in catalog.commands() {
        match &cmd.description {
            Some(desc) => println!("  {:<22} {}", cmd.name.cyan(), desc.dimmed()),
            None => println!("  {}", cmd.name.cyan()),
        }
    }
}

/// Prints the numbered selection, the visible arguments and the workload string.
pub fn print_selection(engine: &WorkloadSelectionEngine) {
    println!("\n{}", t!("common.header.selection").bold());
    if !engine.has_selection() {
        println!("  {}", t!("common.info.empty_selection").dimmed());
    }
    for (i, instance) in engine.instances().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, instance.name.cyan());
    }

    if engine.has_visible_arguments() {
        println!("\n{}", t!("common.header.arguments").bold());
        for view in engine.arguments().filter(|v| v.visible) {
            let marker = if view.has_error() {
                "✗".red()
            } else {
                "✓".green()
            };
            println!(
                "  {} {:<14} {} {}",
                marker,
                view.spec.label,
                view.value,
                format!("({})", view.spec.name).dimmed()
            );
        }
    }

    println!(
        "\n{} {}",
        t!("common.label.workloads").bold(),
        engine.workloads().yellow()
    );
}

/// Prints each problem of a validation report, one per line.
pub fn print_report(report: &ValidationReport) {
    if report.empty_workload {
        println!("  {} {}", "-".red(), t!("common.error.empty_workload"));
    }
    for field in &report.fields {
        println!(
            "  {} {}",
            "-".red(),
            format!(
                t!("common.error.field"),
                label = field.label,
                name = field.name,
                reason = field.reason
            )
        );
    }
}

/// Writes the stock catalog to a temp file and returns options pointing at it. The file
/// lives as long as the returned handle.
#[cfg(test)]
pub(crate) fn sample_catalog_options() -> (tempfile::NamedTempFile, GlobalOptions) {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(include_str!("../../../catalog/pat.toml").as_bytes())
        .unwrap();
    let options = GlobalOptions {
        catalog: Some(file.path().to_str().unwrap().to_string()),
    };
    (file, options)
}
