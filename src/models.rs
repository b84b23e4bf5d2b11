// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// --- CATALOG MODELS (what is read from a catalog `.toml` file) ---

/// A command that can be part of a workload, together with its dependency edges.
///
/// `requires` lists the commands that must already be selected for this one to make
/// sense; `required_by` is the inverse relation and is what blocks a premature removal.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Unique name, as it appears in the workload string.
    pub name: String,
    /// One-line summary shown in listings.
    pub description: Option<String>,
    /// Direct prerequisites.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Commands that list this one in `requires`.
    #[serde(default)]
    pub required_by: Vec<String>,
    /// Arguments that become visible while an instance of this command is selected.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Creates a command with no edges and no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            requires: Vec::new(),
            required_by: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the direct prerequisites.
    pub fn with_requires(mut self, names: &[&str]) -> Self {
        self.requires = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Replaces the inverse edges.
    pub fn with_required_by(mut self, names: &[&str]) -> Self {
        self.required_by = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Replaces the arguments surfaced by this command.
    pub fn with_args(mut self, names: &[&str]) -> Self {
        self.args = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// An owned copy of this command, detached from the catalog it came from.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }
}

/// Raw definition of an input argument, before its pattern is compiled.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ArgumentDef {
    /// Unique name, used as the submission key.
    pub name: String,
    /// Human readable label for forms (e.g. "CF Username").
    pub label: Option<String>,
    /// The command whose selection surfaces this argument.
    pub for_cmd: String,
    /// Initial value.
    #[serde(default)]
    pub default: String,
    /// Validation pattern. It must match the whole value.
    pub pattern: String,
    /// Commands whose selection makes this argument visible.
    #[serde(default)]
    pub required_by: Vec<String>,
}

/// How `add` treats the prerequisites of a command.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PrerequisitePolicy {
    /// Only the names listed in `requires` are inserted (one level).
    #[default]
    Declared,
    /// Prerequisites of prerequisites are expanded as well, deepest first.
    Transitive,
}

/// How argument visibility is updated when an instance is removed.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum VisibilityPolicy {
    /// Hide every argument of the removed command, even if another selected
    /// command still lists it.
    #[default]
    RemovedCommand,
    /// Recompute visibility from all remaining instances.
    Rescan,
}

/// Behavior switches read from the `[options]` table.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CatalogOptions {
    /// See [`PrerequisitePolicy`].
    #[serde(default)]
    pub prerequisites: PrerequisitePolicy,
    /// See [`VisibilityPolicy`].
    #[serde(default)]
    pub visibility: VisibilityPolicy,
}

/// The deserialized structure of a catalog file.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// The `[options]` table.
    #[serde(default)]
    pub options: CatalogOptions,
    /// `[[commands]]` entries, in display order.
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
    /// `[[arguments]]` entries, in form order.
    #[serde(default)]
    pub arguments: Vec<ArgumentDef>,
}

// --- SELECTION MODELS (runtime state owned by the selection engine) ---

/// Identity of one selected instance. Two instances of the same command never share an id.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the ordered selection.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectedInstance {
    /// Identity of this entry.
    pub id: InstanceId,
    /// Name of the selected command.
    pub name: String,
}

/// Mutable half of an argument: what the user typed and whether the field is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentState {
    /// Raw value, untrimmed.
    pub value: String,
    /// Whether the field is part of the form.
    pub visible: bool,
}

/// Owned state of one argument, as rendered by a form.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSnapshot {
    /// Argument name.
    pub name: String,
    /// Form label.
    pub label: String,
    /// Raw value.
    pub value: String,
    /// Whether the field is shown.
    pub visible: bool,
    /// Whether the field currently blocks a submission.
    pub has_error: bool,
}

/// Owned view of everything a UI renders after a change.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    /// The ordered selection.
    pub instances: Vec<SelectedInstance>,
    /// The comma-joined workload string.
    pub workloads: String,
    /// Every argument, in catalog order.
    pub arguments: Vec<ArgumentSnapshot>,
    /// Whether a submission is blocked.
    pub form_has_error: bool,
}

/// The part of an experiment submission this crate is responsible for.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExperimentRequest {
    /// The comma-joined workload string.
    pub workloads: String,
    /// Visible argument values, keyed by name.
    pub arguments: BTreeMap<String, String>,
}
