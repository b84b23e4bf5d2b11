//! # Workload Catalog
//!
//! The static, read-only description of what can be selected: every command with its
//! dependency edges, and every input argument with its validation pattern. A catalog is
//! checked once at construction, so lookups made later by the selection engine only fail
//! when the caller passes a name that was never declared.

use crate::models::{ArgumentDef, CatalogFile, CatalogOptions, CommandSpec};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while building a catalog or looking names up in it.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A command name was looked up but never declared.
    #[error("Unknown command '{name}'.")]
    UnknownCommand {
        /// The name that was looked up.
        name: String,
    },
    /// An argument name was looked up but never declared.
    #[error("Unknown argument '{name}'.")]
    UnknownArgument {
        /// The name that was looked up.
        name: String,
    },
    /// Two commands share a name.
    #[error("Command '{name}' is declared more than once.")]
    DuplicateCommand {
        /// The repeated name.
        name: String,
    },
    /// Two arguments share a name.
    #[error("Argument '{name}' is declared more than once.")]
    DuplicateArgument {
        /// The repeated name.
        name: String,
    },
    /// A `requires` list repeats a name.
    #[error("Command '{command}' lists '{name}' more than once in `requires`.")]
    DuplicateRequirement {
        /// The command whose `requires` list has the repeat.
        command: String,
        /// The repeated prerequisite.
        name: String,
    },
    /// A `requires`, `required_by`, `args` or `for_cmd` entry names nothing.
    #[error("'{owner}' references '{name}' in `{field}`, but no such entry is declared.")]
    DanglingReference {
        /// The command or argument holding the reference.
        owner: String,
        /// The field the reference sits in.
        field: &'static str,
        /// The undeclared name.
        name: String,
    },
    /// `command` requires `prerequisite`, but the inverse edge is missing.
    #[error(
        "Command '{command}' requires '{prerequisite}', but '{prerequisite}' does not list it in `required_by`."
    )]
    InconsistentRequiredBy {
        /// The dependent command.
        command: String,
        /// The prerequisite missing the `required_by` entry.
        prerequisite: String,
    },
    /// The `requires` relation has a cycle.
    #[error("Circular dependency detected in `requires`: {cycle_path}")]
    CircularDependency {
        /// The cycle, e.g. `a -> b -> a`.
        cycle_path: String,
    },
    /// An argument pattern is not a valid regex.
    #[error("Invalid pattern for argument '{name}': {source}")]
    InvalidPattern {
        /// The argument whose pattern failed to compile.
        name: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },
}

type CatalogResult<T> = Result<T, CatalogError>;

/// An input argument with its pattern compiled for full-string matching.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    /// Key used in the submission, e.g. `rest:username`.
    pub name: String,
    /// Form label. Falls back to `name`.
    pub label: String,
    /// The command whose selection surfaces this argument.
    pub for_cmd: String,
    /// Initial value of the field.
    pub default: String,
    /// Commands that list this argument.
    pub required_by: Vec<String>,
    pattern: String,
    regex: Regex,
}

impl ArgumentSpec {
    /// Compiles an [`ArgumentDef`]. The pattern is anchored on both ends, so a value only
    /// passes when the whole string matches.
    pub fn compile(def: ArgumentDef) -> CatalogResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", def.pattern)).map_err(|source| {
            CatalogError::InvalidPattern {
                name: def.name.clone(),
                source,
            }
        })?;

        Ok(Self {
            label: def.label.unwrap_or_else(|| def.name.clone()),
            name: def.name,
            for_cmd: def.for_cmd,
            default: def.default,
            required_by: def.required_by,
            pattern: def.pattern,
            regex,
        })
    }

    /// The pattern as written in the catalog.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether `value` matches the pattern as a whole.
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Read-only mapping from names to commands and arguments, in declaration order.
#[derive(Debug, Clone)]
pub struct WorkloadCatalog {
    commands: Vec<CommandSpec>,
    arguments: Vec<ArgumentSpec>,
    command_index: HashMap<String, usize>,
    argument_index: HashMap<String, usize>,
    options: CatalogOptions,
}

impl WorkloadCatalog {
    /// Builds and validates a catalog with the default selection options.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names, duplicate prerequisites, references to undeclared names,
    /// `requires` edges without the matching `required_by` entry, cycles in `requires`,
    /// and patterns that do not compile.
    pub fn new(commands: Vec<CommandSpec>, arguments: Vec<ArgumentDef>) -> CatalogResult<Self> {
        let mut command_index = HashMap::with_capacity(commands.len());
        for (i, cmd) in commands.iter().enumerate() {
            if command_index.insert(cmd.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateCommand {
                    name: cmd.name.clone(),
                });
            }
        }

        let mut argument_index = HashMap::with_capacity(arguments.len());
        let mut compiled = Vec::with_capacity(arguments.len());
        for (i, def) in arguments.into_iter().enumerate() {
            if argument_index.insert(def.name.clone(), i).is_some() {
                return Err(CatalogError::DuplicateArgument { name: def.name });
            }
            compiled.push(ArgumentSpec::compile(def)?);
        }

        let catalog = Self {
            commands,
            arguments: compiled,
            command_index,
            argument_index,
            options: CatalogOptions::default(),
        };
        catalog.validate()?;

        log::debug!(
            "Catalog built with {} commands and {} arguments.",
            catalog.commands.len(),
            catalog.arguments.len()
        );
        Ok(catalog)
    }

    /// Builds a catalog from a deserialized catalog file, keeping its `[options]`.
    pub fn from_file(file: CatalogFile) -> CatalogResult<Self> {
        let options = file.options;
        Ok(Self::new(file.commands, file.arguments)?.with_options(options))
    }

    /// Replaces the selection options the catalog hands to engines.
    pub fn with_options(mut self, options: CatalogOptions) -> Self {
        self.options = options;
        self
    }

    /// The prerequisite and visibility policies engines follow.
    pub fn options(&self) -> CatalogOptions {
        self.options
    }

    /// Looks a command up by name.
    pub fn command(&self, name: &str) -> CatalogResult<&CommandSpec> {
        self.command_index
            .get(name)
            .and_then(|&i| self.commands.get(i))
            .ok_or_else(|| CatalogError::UnknownCommand {
                name: name.to_string(),
            })
    }

    /// Looks an argument up by name.
    pub fn argument(&self, name: &str) -> CatalogResult<&ArgumentSpec> {
        self.argument_position(name)
            .and_then(|i| {
                self.arguments.get(i).ok_or_else(|| CatalogError::UnknownArgument {
                    name: name.to_string(),
                })
            })
    }

    /// Position of an argument in declaration order. The selection engine keeps its
    /// per-argument state aligned with this order.
    pub(crate) fn argument_position(&self, name: &str) -> CatalogResult<usize> {
        self.argument_index
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::UnknownArgument {
                name: name.to_string(),
            })
    }

    /// Whether a command named `name` is declared.
    pub fn contains_command(&self, name: &str) -> bool {
        self.command_index.contains_key(name)
    }

    /// All commands, in the order they were declared (for rendering a menu).
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    /// All arguments, in the order they were declared (for rendering a form).
    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    fn validate(&self) -> CatalogResult<()> {
        for cmd in &self.commands {
            let mut seen = HashSet::new();
            for req in &cmd.requires {
                if !seen.insert(req.as_str()) {
                    return Err(CatalogError::DuplicateRequirement {
                        command: cmd.name.clone(),
                        name: req.clone(),
                    });
                }
                let prerequisite = self.command_ref(&cmd.name, "requires", req)?;
                if !prerequisite.required_by.contains(&cmd.name) {
                    return Err(CatalogError::InconsistentRequiredBy {
                        command: cmd.name.clone(),
                        prerequisite: req.clone(),
                    });
                }
            }
            for dependent in &cmd.required_by {
                self.command_ref(&cmd.name, "required_by", dependent)?;
            }
            for arg in &cmd.args {
                if !self.argument_index.contains_key(arg) {
                    return Err(CatalogError::DanglingReference {
                        owner: cmd.name.clone(),
                        field: "args",
                        name: arg.clone(),
                    });
                }
            }
        }

        for arg in &self.arguments {
            self.command_ref(&arg.name, "for_cmd", &arg.for_cmd)?;
            for cmd in &arg.required_by {
                self.command_ref(&arg.name, "required_by", cmd)?;
            }
        }

        if let Some(cycle) = self.find_cycle() {
            return Err(CatalogError::CircularDependency {
                cycle_path: cycle.join(" -> "),
            });
        }
        Ok(())
    }

    fn command_ref(&self, owner: &str, field: &'static str, name: &str) -> CatalogResult<&CommandSpec> {
        self.command(name)
            .map_err(|_| CatalogError::DanglingReference {
                owner: owner.to_string(),
                field,
                name: name.to_string(),
            })
    }

    /// Depth-first search over `requires`. Returns the first cycle found, with the
    /// repeated node at both ends (`a -> b -> a`).
    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut states: HashMap<&str, VisitState> = HashMap::new();
        let mut path: Vec<&str> = Vec::new();

        for cmd in &self.commands {
            if let Some(cycle) = self.visit(&cmd.name, &mut states, &mut path) {
                return Some(cycle);
            }
        }
        None
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        states: &mut HashMap<&'a str, VisitState>,
        path: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match states.get(name) {
            Some(VisitState::Done) => return None,
            Some(VisitState::InProgress) => {
                let start = path.iter().position(|&n| n == name).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path.iter().skip(start).map(|n| n.to_string()).collect();
                cycle.push(name.to_string());
                return Some(cycle);
            }
            None => {}
        }

        states.insert(name, VisitState::InProgress);
        path.push(name);
        if let Ok(cmd) = self.command(name) {
            for req in &cmd.requires {
                if let Some(cycle) = self.visit(req, states, path) {
                    return Some(cycle);
                }
            }
        }
        path.pop();
        states.insert(name, VisitState::Done);
        None
    }
}

// MARK: --- UNIT TESTS ---
