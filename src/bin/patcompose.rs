// src/bin/patcompose.rs

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser};
use colored::*;
use patcompose::{
    cli::{
        Cli,
        handlers::{self, commons::GlobalOptions},
    },
    t,
};

// --- Command Definition and Registry ---

/// A CLI action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &GlobalOptions) -> Result<()>,
}

/// Every action the binary understands. Adding one means adding an entry here.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "check",
        aliases: &[],
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "compose",
        aliases: &["c"],
        handler: handlers::compose::handle,
    },
    CommandDefinition {
        name: "interactive",
        aliases: &["ui"],
        handler: handlers::interactive::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "validate",
        aliases: &[],
        handler: handlers::validate::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Sets up logging, dispatches to the handler and reports errors in one place.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // Handlers parse their own arguments, so `--help` on an action arrives here.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let Some((action_name, action_args)) = cli.action() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let command = find_command(action_name)
        .ok_or_else(|| anyhow!(t!("cli.error.unknown_action"), name = action_name))?;
    (command.handler)(action_args, &cli.global_options())
}
