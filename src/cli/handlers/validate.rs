use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons::{self, GlobalOptions},
    core::{catalog::CatalogError, projection},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Checks a workload string against the catalog, the way the backend does."
)]
struct ValidateArgs {
    /// Comma separated workload string, e.g. "rest:target,rest:login".
    workloads: String,
}

/// Checks a workload string against the catalog and its prerequisite order.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let validate_args = ValidateArgs::try_parse_from(&args)?;
    let catalog = commons::load_catalog(options)?;

    let commands = match projection::parse_workload_string(&catalog, &validate_args.workloads) {
        Ok(commands) => commands,
        Err(CatalogError::UnknownCommand { name }) => {
            println!(
                "{}",
                format!(t!("validate.error.invalid_workload"), name = name).red()
            );
            commons::print_available_commands(&catalog);
            return Err(anyhow!(t!("validate.error.failed")));
        }
        Err(e) => return Err(e.into()),
    };

    let unmet = projection::unmet_prerequisites(&commands);
    for item in &unmet {
        println!(
            "{} {}",
            t!("common.warning").yellow().bold(),
            format!(
                t!("validate.warning.unmet"),
                position = item.position + 1,
                command = item.command,
                missing = item.missing.join(", ")
            )
        );
    }

    println!(
        "{} {}",
        t!("common.success").green().bold(),
        format!(t!("validate.success.valid"), count = commands.len())
    );
    Ok(())
}
