// src/cli/handlers/interactive.rs

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::{
    cli::handlers::commons::{self, GlobalOptions},
    core::selection::{SelectionError, WorkloadSelectionEngine},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Composes a workload from an interactive menu."
)]
struct InteractiveArgs {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Add,
    Remove,
    Edit,
    Submit,
    Quit,
}

impl MenuAction {
    /// Actions offered for the current state, in menu order.
    fn available(engine: &WorkloadSelectionEngine) -> Vec<Self> {
        let mut actions = vec![Self::Add];
        if engine.has_selection() {
            actions.push(Self::Remove);
        }
        if engine.has_visible_arguments() {
            actions.push(Self::Edit);
        }
        actions.push(Self::Submit);
        actions.push(Self::Quit);
        actions
    }

    fn label(self) -> &'static str {
        match self {
            Self::Add => t!("interactive.menu.add"),
            Self::Remove => t!("interactive.menu.remove"),
            Self::Edit => t!("interactive.menu.edit"),
            Self::Submit => t!("interactive.menu.submit"),
            Self::Quit => t!("interactive.menu.quit"),
        }
    }
}

/// Runs the menu-driven selection session.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let _interactive_args = InteractiveArgs::try_parse_from(&args)?;
    let catalog = commons::load_catalog(options)?;
    let mut engine = WorkloadSelectionEngine::new(catalog);

    let subscription = engine.subscribe(|snapshot| {
        let status = if snapshot.form_has_error {
            t!("interactive.status.incomplete").yellow()
        } else {
            t!("interactive.status.ready").green()
        };
        println!(
            "{} {} {}",
            t!("common.label.workloads").bold(),
            if snapshot.workloads.is_empty() {
                "-".dimmed()
            } else {
                snapshot.workloads.cyan()
            },
            format!("[{}]", status)
        );
    });

    println!("\n{}", t!("interactive.header").bold());
    loop {
        let actions = MenuAction::available(&engine);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(t!("interactive.prompt.action"))
            .items(&labels)
            .default(0)
            .interact()?;

        match actions.get(selection).copied().unwrap_or(MenuAction::Quit) {
            MenuAction::Add => add_command(&mut engine)?,
            MenuAction::Remove => remove_instance(&mut engine)?,
            MenuAction::Edit => edit_argument(&mut engine)?,
            MenuAction::Submit => {
                if submit(&engine)? {
                    break;
                }
            }
            MenuAction::Quit => {
                println!("\n{}", t!("common.info.operation_cancelled"));
                break;
            }
        }
    }

    engine.unsubscribe(subscription);
    Ok(())
}

fn add_command(engine: &mut WorkloadSelectionEngine) -> Result<()> {
    let items: Vec<String> = engine
        .catalog()
        .commands()
        .iter()
        .map(|cmd| match &cmd.description {
            Some(desc) => format!("{:<22} {}", cmd.name, desc.dimmed()),
            None => cmd.name.clone(),
        })
        .collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("interactive.prompt.add"))
        .items(&items)
        .default(0)
        .interact_opt()?;

    let Some(name) = choice
        .and_then(|i| engine.catalog().commands().get(i))
        .map(|cmd| cmd.name.clone())
    else {
        return Ok(());
    };
    engine.add(&name)?;
    Ok(())
}

fn remove_instance(engine: &mut WorkloadSelectionEngine) -> Result<()> {
    let items: Vec<String> = engine
        .instances()
        .iter()
        .enumerate()
        .map(|(i, instance)| format!("{:>2}. {}", i + 1, instance.name))
        .collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("interactive.prompt.remove"))
        .items(&items)
        .default(items.len().saturating_sub(1))
        .interact_opt()?;

    let Some(id) = choice.and_then(|i| engine.instance_at(i)) else {
        return Ok(());
    };
    match engine.remove(id) {
        Ok(_) => Ok(()),
        Err(e @ SelectionError::BlockedByDependent { .. }) => {
            println!("{} {}", t!("common.warning").yellow().bold(), e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn edit_argument(engine: &mut WorkloadSelectionEngine) -> Result<()> {
    let visible: Vec<(String, String, String)> = engine
        .arguments()
        .filter(|v| v.visible)
        .map(|v| (v.spec.name.clone(), v.spec.label.clone(), v.value.to_string()))
        .collect();
    let items: Vec<String> = visible
        .iter()
        .map(|(_, label, value)| format!("{:<14} {}", label, value.dimmed()))
        .collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("interactive.prompt.edit"))
        .items(&items)
        .default(0)
        .interact_opt()?;

    let Some((name, label, current)) = choice.and_then(|i| visible.get(i)) else {
        return Ok(());
    };

    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label.as_str())
        .with_initial_text(current.as_str())
        .allow_empty(true)
        .interact_text()?;
    engine.set_value(name, value)?;

    if engine.argument(name)?.has_error() {
        println!(
            "{} {}",
            t!("common.warning").yellow().bold(),
            format!(t!("interactive.warning.invalid_value"), label = label)
        );
    }
    Ok(())
}

/// Prints the request when the form is valid. Returns whether the session is over.
fn submit(engine: &WorkloadSelectionEngine) -> Result<bool> {
    let Some(request) = engine.experiment_request() else {
        println!("\n{}", t!("compose.error.form_invalid").red());
        commons::print_report(&engine.validator().report());
        return Ok(false);
    };

    commons::print_selection(engine);
    println!("\n{}", serde_json::to_string_pretty(&request)?);
    Ok(true)
}
