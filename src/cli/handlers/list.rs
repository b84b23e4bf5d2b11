use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use crate::{
    cli::handlers::commons::{self, GlobalOptions},
    core::catalog::WorkloadCatalog,
    models::CommandSpec,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Lists the commands available in the catalog."
)]
struct ListArgs {
    /// Also show each argument's default value and validation pattern.
    #[arg(long, short)]
    args: bool,
}

/// Prints the catalog commands, optionally with argument details.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let catalog = commons::load_catalog(options)?;

    println!("\n{}", t!("list.header").bold());
    for cmd in catalog.commands() {
        print_command(cmd, &catalog, list_args.args);
    }
    Ok(())
}

fn print_command(cmd: &CommandSpec, catalog: &WorkloadCatalog, show_args: bool) {
    println!("\n  {}", cmd.name.bold());
    if let Some(desc) = &cmd.description {
        println!("    {}", desc.dimmed());
    }
    if !cmd.requires.is_empty() {
        println!(
            "    {:<10} {}",
            t!("list.label.requires").blue(),
            cmd.requires.join(", ")
        );
    }
    if cmd.args.is_empty() {
        return;
    }
    println!("    {:<10} {}", t!("list.label.args").blue(), cmd.args.join(", "));

    if show_args {
        for name in &cmd.args {
            // Names were checked when the catalog was built.
            if let Ok(arg) = catalog.argument(name) {
                println!(
                    "      {} {}",
                    arg.label.cyan(),
                    format!(
                        t!("list.info.arg_detail"),
                        default = arg.default,
                        pattern = arg.pattern()
                    )
                    .dimmed()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::commons::sample_catalog_options;

    #[test]
    fn test_list_plain_and_with_args() {
        let (_file, options) = sample_catalog_options();
        assert!(handle(vec![], &options).is_ok());
        assert!(handle(vec!["--args".to_string()], &options).is_ok());
        assert!(handle(vec!["-a".to_string()], &options).is_ok());
    }

    #[test]
    fn test_list_rejects_unknown_flag() {
        let (_file, options) = sample_catalog_options();
        let err = handle(vec!["--bogus".to_string()], &options).unwrap_err();
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }

    #[test]
    fn test_list_fails_on_missing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let options = GlobalOptions {
            catalog: Some(dir.path().join("absent.toml").display().to_string()),
        };
        assert!(handle(vec![], &options).is_err());
    }
}
