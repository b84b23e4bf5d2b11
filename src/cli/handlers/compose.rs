// src/cli/handlers/compose.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    cli::handlers::commons::{self, GlobalOptions},
    core::selection::{SelectionError, WorkloadSelectionEngine},
};

lazy_static! {
    // `~3` removes the third selected instance.
    static ref REMOVE_RE: Regex = Regex::new(r"^~(\d+)$").unwrap();
    static ref ASSIGNMENT_RE: Regex = Regex::new(r"^([^=\s]+)=(.*)$").unwrap();
}

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Builds a workload by replaying add and remove operations."
)]
struct ComposeArgs {
    /// Operations applied in order: a command name adds it, `~N` removes the N-th instance.
    #[arg(value_name = "OPS")]
    ops: Vec<String>,

    /// Sets an argument value, e.g. `--set rest:space=prod`. Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Print the experiment request as JSON instead of the summary.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operation {
    Add(String),
    /// 1-based position in the current selection.
    Remove(usize),
}

fn parse_operation(raw: &str) -> Result<Operation> {
    if let Some(caps) = REMOVE_RE.captures(raw) {
        let position: usize = caps
            .get(1)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .parse()
            .map_err(|_| anyhow!(t!("compose.error.bad_position"), op = raw))?;
        if position == 0 {
            return Err(anyhow!(t!("compose.error.bad_position"), op = raw));
        }
        return Ok(Operation::Remove(position));
    }
    Ok(Operation::Add(raw.to_string()))
}

fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let caps = ASSIGNMENT_RE
        .captures(raw)
        .ok_or_else(|| anyhow!(t!("compose.error.bad_assignment"), raw = raw))?;
    let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let value = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
    Ok((name.to_string(), value.to_string()))
}

/// Applies the operations in order.
///
/// A removal refused because of a dependent is reported and skipped, like the dashboard
/// does. Any other failure stops the replay. Returns the messages of skipped removals.
fn apply_operations(engine: &mut WorkloadSelectionEngine, ops: &[Operation]) -> Result<Vec<String>> {
    let mut skipped = Vec::new();
    for op in ops {
        match op {
            Operation::Add(name) => {
                engine.add(name)?;
            }
            Operation::Remove(position) => {
                let id = engine
                    .instance_at(position - 1)
                    .ok_or_else(|| anyhow!(t!("compose.error.no_instance"), position = position))?;
                match engine.remove(id) {
                    Ok(_) => {}
                    Err(e @ SelectionError::BlockedByDependent { .. }) => {
                        skipped.push(e.to_string());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }
    Ok(skipped)
}

/// Replays add and remove operations, then prints the summary or the request as JSON.
pub fn handle(args: Vec<String>, options: &GlobalOptions) -> Result<()> {
    let compose_args = ComposeArgs::try_parse_from(&args)?;
    let ops = compose_args
        .ops
        .iter()
        .map(|raw| parse_operation(raw))
        .collect::<Result<Vec<_>>>()?;
    let assignments = compose_args
        .set
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;

    let catalog = commons::load_catalog(options)?;
    let mut engine = WorkloadSelectionEngine::new(catalog);

    for warning in apply_operations(&mut engine, &ops)? {
        eprintln!("{} {}", t!("common.warning").yellow().bold(), warning);
    }
    for (name, value) in assignments {
        engine.set_value(&name, value)?;
    }

    if compose_args.json {
        let Some(request) = engine.experiment_request() else {
            eprintln!("{}", t!("compose.error.form_invalid").red());
            commons::print_report(&engine.validator().report());
            return Err(anyhow!(t!("compose.error.not_submittable")));
        };
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    commons::print_selection(&engine);
    let report = engine.validator().report();
    if report.has_errors() {
        println!("\n{}", t!("compose.error.form_invalid").red());
        commons::print_report(&report);
    } else {
        println!("\n{}", t!("compose.success.ready").green());
    }
    Ok(())
}
