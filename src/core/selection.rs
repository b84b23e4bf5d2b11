//! # Workload Selection Engine
//!
//! Keeps the ordered list of selected command instances and enforces the two dependency
//! rules of a workload:
//!
//! 1. **Adding** a command first appends every prerequisite that is not selected yet, in
//!    the order the catalog declares them, then the command itself.
//! 2. **Removing** an instance is refused while a later instance depends on it, unless an
//!    earlier instance of the same command keeps the dependency satisfied.
//!
//! The engine is also the only writer of argument visibility. Every successful mutation
//! recomputes the workload string and then notifies subscribers with a fresh snapshot.

use crate::{
    constants::DEPENDENT_SEPARATOR,
    core::{
        catalog::{ArgumentSpec, CatalogError, WorkloadCatalog},
        projection,
        validation::{self, ArgumentValidator},
    },
    models::{
        ArgumentSnapshot, ArgumentState, CommandSpec, ExperimentRequest, InstanceId,
        PrerequisitePolicy, SelectedInstance, SelectionSnapshot, VisibilityPolicy,
    },
};
use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    sync::Arc,
};
use thiserror::Error;

/// Errors returned by engine mutations. None of them leaves a partial change behind.
#[derive(Error, Debug)]
pub enum SelectionError {
    /// An unknown command or argument name.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The id does not belong to the current selection.
    #[error("No selected instance with id '{id}'.")]
    UnknownInstance {
        /// The id that was asked for.
        id: InstanceId,
    },
    /// The removal would leave a later instance without its prerequisite.
    #[error(
        "Cannot remove item '{}': it is required by [{}]",
        .command,
        .dependents.join(DEPENDENT_SEPARATOR)
    )]
    BlockedByDependent {
        /// The command of the instance that stays.
        command: String,
        /// Later selected commands that need it, in selection order.
        dependents: Vec<String>,
    },
}

type SelectionResult<T> = Result<T, SelectionError>;

type Observer = Box<dyn FnMut(&SelectionSnapshot)>;

/// Handle returned by [`WorkloadSelectionEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Read-only view of one argument: its static spec plus the engine's current state for it.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentView<'a> {
    /// Catalog definition.
    pub spec: &'a ArgumentSpec,
    /// Stored value, untrimmed.
    pub value: &'a str,
    /// Whether a selected command currently needs the argument.
    pub visible: bool,
}

impl ArgumentView<'_> {
    /// Whether the argument would block a submission.
    pub fn has_error(&self) -> bool {
        validation::check_field(self.spec, self.value, self.visible).is_some()
    }
}

/// The ordered selection of workload instances plus the argument form derived from it.
///
/// Every mutation either succeeds completely or leaves the engine as it was. After a
/// successful one the workload string and argument visibility are up to date and every
/// subscriber has seen the new snapshot.
pub struct WorkloadSelectionEngine {
    catalog: Arc<WorkloadCatalog>,
    instances: Vec<SelectedInstance>,
    /// Aligned with `catalog.arguments()`.
    arguments: Vec<ArgumentState>,
    workloads: String,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for WorkloadSelectionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkloadSelectionEngine")
            .field("instances", &self.instances)
            .field("arguments", &self.arguments)
            .field("workloads", &self.workloads)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl WorkloadSelectionEngine {
    /// Creates an engine with an empty selection. Every argument starts hidden and holds
    /// its catalog default.
    pub fn new(catalog: Arc<WorkloadCatalog>) -> Self {
        let arguments = catalog
            .arguments()
            .iter()
            .map(|spec| ArgumentState {
                value: spec.default.clone(),
                visible: false,
            })
            .collect();

        Self {
            catalog,
            instances: Vec::new(),
            arguments,
            workloads: String::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The catalog the engine was built on.
    pub fn catalog(&self) -> &WorkloadCatalog {
        &self.catalog
    }

    // --- MUTATIONS ---

    /// Appends an instance of `name`, preceded by any missing prerequisites.
    ///
    /// Returns the ids of every instance created, prerequisites first.
    ///
    /// # Errors
    ///
    /// `UnknownCommand` if `name` is not in the catalog. The selection is untouched.
    pub fn add(&mut self, name: &str) -> SelectionResult<Vec<InstanceId>> {
        let catalog = Arc::clone(&self.catalog);
        let spec = catalog.command(name)?;
        let prerequisites = self.missing_prerequisites(&catalog, spec)?;

        let mut created = Vec::with_capacity(prerequisites.len() + 1);
        for prerequisite in prerequisites {
            log::debug!(
                "Inserting prerequisite '{}' before '{}'.",
                prerequisite.name,
                name
            );
            created.push(self.push_instance(&prerequisite.name));
            self.set_visibility(prerequisite, true);
        }
        created.push(self.push_instance(name));
        self.set_visibility(spec, true);

        self.refresh();
        log::debug!("Added '{}'. Workload is now '{}'.", name, self.workloads);
        Ok(created)
    }

    /// Removes one instance, unless a later instance still depends on it.
    ///
    /// # Errors
    ///
    /// `UnknownInstance` if `id` is not selected, `BlockedByDependent` if the removal
    /// would orphan a dependent. In both cases the selection is untouched.
    pub fn remove(&mut self, id: InstanceId) -> SelectionResult<SelectedInstance> {
        let position = self
            .instances
            .iter()
            .position(|i| i.id == id)
            .ok_or(SelectionError::UnknownInstance { id })?;
        let name = self
            .instances
            .get(position)
            .map(|i| i.name.clone())
            .ok_or(SelectionError::UnknownInstance { id })?;

        let catalog = Arc::clone(&self.catalog);
        let spec = catalog.command(&name)?;

        // An earlier instance of the same command keeps every dependent satisfied.
        let duplicated = self.instances.iter().take(position).any(|i| i.name == name);

        if !duplicated {
            let dependents: Vec<String> = spec
                .required_by
                .iter()
                .filter(|d| self.instances.iter().skip(position).any(|i| &i.name == *d))
                .cloned()
                .collect();

            if !dependents.is_empty() {
                log::warn!(
                    "Refusing to remove '{}': required by [{}].",
                    name,
                    dependents.join(DEPENDENT_SEPARATOR)
                );
                return Err(SelectionError::BlockedByDependent {
                    command: name,
                    dependents,
                });
            }
        }

        let removed = self.instances.remove(position);

        if !duplicated {
            match catalog.options().visibility {
                VisibilityPolicy::RemovedCommand => self.set_visibility(spec, false),
                VisibilityPolicy::Rescan => self.rescan_visibility(),
            }
        }

        self.refresh();
        log::debug!(
            "Removed '{}' at position {}. Workload is now '{}'.",
            name,
            position,
            self.workloads
        );
        Ok(removed)
    }

    /// Updates the value of an argument. Visibility is not affected.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> SelectionResult<()> {
        let position = self.catalog.argument_position(name)?;
        if let Some(state) = self.arguments.get_mut(position) {
            state.value = value.into();
            log::debug!("Argument '{}' set to '{}'.", name, state.value);
        }
        self.refresh();
        Ok(())
    }

    /// Drops every instance and hides every argument. Values are kept.
    pub fn clear(&mut self) {
        self.instances.clear();
        for state in &mut self.arguments {
            state.visible = false;
        }
        self.refresh();
    }

    // --- SUBSCRIPTIONS ---

    /// Registers a callback invoked after every successful mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&SelectionSnapshot) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    // --- QUERIES ---

    /// The current selection, in insertion order.
    pub fn instances(&self) -> &[SelectedInstance] {
        &self.instances
    }

    /// Id of the instance at a 0-based position.
    pub fn instance_at(&self, position: usize) -> Option<InstanceId> {
        self.instances.get(position).map(|i| i.id)
    }

    /// The comma-joined workload string. Empty when nothing is selected.
    pub fn workloads(&self) -> &str {
        &self.workloads
    }

    /// `true` once at least one instance is selected.
    pub fn has_selection(&self) -> bool {
        !self.instances.is_empty()
    }

    /// `true` when the form has anything to show.
    pub fn has_visible_arguments(&self) -> bool {
        self.arguments.iter().any(|a| a.visible)
    }

    /// Looks up one argument by name.
    pub fn argument(&self, name: &str) -> Result<ArgumentView<'_>, CatalogError> {
        let position = self.catalog.argument_position(name)?;
        self.catalog
            .arguments()
            .get(position)
            .zip(self.arguments.get(position))
            .map(|(spec, state)| ArgumentView {
                spec,
                value: &state.value,
                visible: state.visible,
            })
            .ok_or_else(|| CatalogError::UnknownArgument {
                name: name.to_string(),
            })
    }

    /// Every argument in catalog order, hidden ones included.
    pub fn arguments(&self) -> impl Iterator<Item = ArgumentView<'_>> {
        self.catalog
            .arguments()
            .iter()
            .zip(self.arguments.iter())
            .map(|(spec, state)| ArgumentView {
                spec,
                value: &state.value,
                visible: state.visible,
            })
    }

    /// A validator borrowing this engine.
    pub fn validator(&self) -> ArgumentValidator<'_> {
        ArgumentValidator::new(self)
    }

    /// Shorthand for [`ArgumentValidator::form_has_error`].
    pub fn form_has_error(&self) -> bool {
        self.validator().form_has_error()
    }

    /// Values of the visible arguments, keyed by argument name.
    pub fn submission_arguments(&self) -> BTreeMap<String, String> {
        projection::submission_arguments(self)
    }

    /// The submission payload, or `None` while the form has errors.
    pub fn experiment_request(&self) -> Option<ExperimentRequest> {
        projection::experiment_request(self)
    }

    /// An owned copy of the observable state, as passed to subscribers.
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            instances: self.instances.clone(),
            workloads: self.workloads.clone(),
            arguments: self
                .arguments()
                .map(|view| ArgumentSnapshot {
                    name: view.spec.name.clone(),
                    label: view.spec.label.clone(),
                    value: view.value.to_string(),
                    visible: view.visible,
                    has_error: view.has_error(),
                })
                .collect(),
            form_has_error: self.form_has_error(),
        }
    }

    // --- INTERNALS ---

    fn is_selected(&self, name: &str) -> bool {
        self.instances.iter().any(|i| i.name == name)
    }

    /// Resolves the prerequisites to insert before `spec`, in insertion order. Nothing is
    /// mutated here, so a lookup failure leaves the engine as it was.
    fn missing_prerequisites<'c>(
        &self,
        catalog: &'c WorkloadCatalog,
        spec: &CommandSpec,
    ) -> Result<Vec<&'c CommandSpec>, CatalogError> {
        let mut planned: Vec<&'c CommandSpec> = Vec::new();
        match catalog.options().prerequisites {
            PrerequisitePolicy::Declared => {
                for req in &spec.requires {
                    if !self.is_selected(req) && !planned.iter().any(|c| &c.name == req) {
                        planned.push(catalog.command(req)?);
                    }
                }
            }
            PrerequisitePolicy::Transitive => {
                let mut visiting = HashSet::new();
                for req in &spec.requires {
                    self.plan_transitive(catalog, req, &mut planned, &mut visiting)?;
                }
            }
        }
        Ok(planned)
    }

    fn plan_transitive<'c>(
        &self,
        catalog: &'c WorkloadCatalog,
        name: &str,
        planned: &mut Vec<&'c CommandSpec>,
        visiting: &mut HashSet<String>,
    ) -> Result<(), CatalogError> {
        if self.is_selected(name)
            || planned.iter().any(|c| c.name == name)
            || !visiting.insert(name.to_string())
        {
            return Ok(());
        }
        let spec = catalog.command(name)?;
        for req in &spec.requires {
            self.plan_transitive(catalog, req, planned, visiting)?;
        }
        planned.push(spec);
        Ok(())
    }

    fn push_instance(&mut self, name: &str) -> InstanceId {
        let instance = SelectedInstance {
            id: InstanceId::new(),
            name: name.to_string(),
        };
        let id = instance.id;
        self.instances.push(instance);
        id
    }

    fn set_visibility(&mut self, spec: &CommandSpec, visible: bool) {
        for arg in &spec.args {
            match self.catalog.argument_position(arg) {
                Ok(position) => {
                    if let Some(state) = self.arguments.get_mut(position) {
                        state.visible = visible;
                    }
                }
                Err(e) => log::error!("Command '{}' lists an argument that cannot be shown: {}", spec.name, e),
            }
        }
    }

    fn rescan_visibility(&mut self) {
        let catalog = Arc::clone(&self.catalog);
        let needed: HashSet<&str> = self
            .instances
            .iter()
            .filter_map(|i| catalog.command(&i.name).ok())
            .flat_map(|cmd| cmd.args.iter().map(String::as_str))
            .collect();

        for (spec, state) in catalog.arguments().iter().zip(self.arguments.iter_mut()) {
            state.visible = needed.contains(spec.name.as_str());
        }
    }

    /// Recomputes derived state and notifies subscribers.
    fn refresh(&mut self) {
        self.workloads = projection::workload_string(&self.instances);
        log::trace!("Workload string recomputed: '{}'", self.workloads);

        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builtin::default_catalog;
    use crate::models::{ArgumentDef, CatalogOptions};
    use std::{cell::RefCell, rc::Rc};

    fn engine() -> WorkloadSelectionEngine {
        WorkloadSelectionEngine::new(Arc::new(default_catalog().unwrap()))
    }

    fn engine_with(options: CatalogOptions) -> WorkloadSelectionEngine {
        WorkloadSelectionEngine::new(Arc::new(default_catalog().unwrap().with_options(options)))
    }

    fn names(engine: &WorkloadSelectionEngine) -> Vec<&str> {
        engine.instances().iter().map(|i| i.name.as_str()).collect()
    }

    fn visible(engine: &WorkloadSelectionEngine, arg: &str) -> bool {
        engine.argument(arg).unwrap().visible
    }

    #[test]
    fn test_add_inserts_missing_prerequisites_in_declared_order() {
        let mut engine = engine();
        let created = engine.add("rest:push").unwrap();
        assert_eq!(names(&engine), vec!["rest:target", "rest:login", "rest:push"]);
        assert_eq!(created.len(), 3);
        assert_eq!(engine.workloads(), "rest:target,rest:login,rest:push");
    }

    #[test]
    fn test_add_does_not_duplicate_present_prerequisite() {
        let mut engine = engine();
        engine.add("rest:target").unwrap();
        engine.add("rest:login").unwrap();
        assert_eq!(names(&engine), vec!["rest:target", "rest:login"]);
    }

    #[test]
    fn test_adding_same_command_twice_reuses_prerequisite() {
        // The prerequisite scan covers the whole selection, so the second add only
        // appends the command itself.
        let mut engine = engine();
        engine.add("rest:login").unwrap();
        engine.add("rest:login").unwrap();
        assert_eq!(names(&engine), vec!["rest:target", "rest:login", "rest:login"]);
        assert_eq!(engine.workloads(), "rest:target,rest:login,rest:login");
    }

    #[test]
    fn test_add_shows_arguments_of_command_and_prerequisites() {
        let mut engine = engine();
        assert!(!engine.has_visible_arguments());
        engine.add("rest:login").unwrap();
        assert!(visible(&engine, "rest:target"));
        assert!(visible(&engine, "rest:username"));
        assert!(visible(&engine, "rest:password"));
        assert!(visible(&engine, "rest:space"));
    }

    #[test]
    fn test_add_unknown_command_leaves_state_untouched() {
        let mut engine = engine();
        engine.add("dummy").unwrap();
        let err = engine.add("rest:logout").unwrap_err();
        assert!(matches!(
            err,
            SelectionError::Catalog(CatalogError::UnknownCommand { ref name }) if name == "rest:logout"
        ));
        assert_eq!(engine.workloads(), "dummy");
    }

    #[test]
    fn test_remove_blocked_by_later_dependent() {
        let mut engine = engine();
        engine.add("rest:push").unwrap();
        let target = engine.instance_at(0).unwrap();

        let err = engine.remove(target).unwrap_err();
        match &err {
            SelectionError::BlockedByDependent { command, dependents } => {
                assert_eq!(command, "rest:target");
                assert_eq!(dependents, &vec!["rest:login".to_string(), "rest:push".to_string()]);
            }
            other => panic!("Expected BlockedByDependent, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Cannot remove item 'rest:target': it is required by [rest:login, rest:push]"
        );
        assert_eq!(engine.workloads(), "rest:target,rest:login,rest:push");
        assert!(visible(&engine, "rest:target"));
    }

    #[test]
    fn test_remove_last_instance_shrinks_workload_by_one() {
        let mut engine = engine();
        engine.add("rest:push").unwrap();
        engine.add("dummy").unwrap();

        let last = engine.instance_at(3).unwrap();
        let removed = engine.remove(last).unwrap();
        assert_eq!(removed.name, "dummy");
        assert_eq!(engine.workloads(), "rest:target,rest:login,rest:push");

        let push = engine.instance_at(2).unwrap();
        engine.remove(push).unwrap();
        assert_eq!(engine.workloads(), "rest:target,rest:login");
    }

    #[test]
    fn test_remove_in_reverse_order_empties_selection() {
        let mut engine = engine();
        engine.add("rest:push").unwrap();
        while let Some(last) = engine.instances().last().map(|i| i.id) {
            engine.remove(last).unwrap();
        }
        assert_eq!(engine.workloads(), "");
        assert!(!engine.has_selection());
        assert!(!engine.has_visible_arguments());
    }

    #[test]
    fn test_remove_later_duplicate_is_allowed_and_keeps_arguments() {
        let mut engine = engine();
        engine.add("rest:login").unwrap();
        engine.add("rest:target").unwrap();
        assert_eq!(names(&engine), vec!["rest:target", "rest:login", "rest:target"]);

        // The first target is still needed by the login that follows it.
        let first = engine.instance_at(0).unwrap();
        assert!(engine.remove(first).is_err());

        let second = engine.instance_at(2).unwrap();
        engine.remove(second).unwrap();
        assert_eq!(names(&engine), vec!["rest:target", "rest:login"]);
        assert!(visible(&engine, "rest:target"));
    }

    #[test]
    fn test_remove_unknown_instance() {
        let mut engine = engine();
        engine.add("dummy").unwrap();
        let stray = InstanceId::new();
        assert!(matches!(
            engine.remove(stray),
            Err(SelectionError::UnknownInstance { id }) if id == stray
        ));
        assert_eq!(engine.workloads(), "dummy");
    }

    #[test]
    fn test_removed_instance_id_is_gone() {
        let mut engine = engine();
        let ids = engine.add("gcf:push").unwrap();
        engine.remove(ids[0]).unwrap();
        assert!(matches!(
            engine.remove(ids[0]),
            Err(SelectionError::UnknownInstance { .. })
        ));
    }

    fn shared_argument_catalog(options: CatalogOptions) -> WorkloadCatalog {
        let commands = vec![
            CommandSpec::new("x").with_args(&["shared"]),
            CommandSpec::new("y").with_args(&["shared"]),
        ];
        let arguments = vec![ArgumentDef {
            name: "shared".to_string(),
            label: None,
            for_cmd: "x".to_string(),
            default: "v".to_string(),
            pattern: "[a-z]+".to_string(),
            required_by: vec!["x".to_string(), "y".to_string()],
        }];
        WorkloadCatalog::new(commands, arguments)
            .unwrap()
            .with_options(options)
    }

    #[test]
    fn test_removal_hides_arguments_of_removed_command_only() {
        let mut engine = WorkloadSelectionEngine::new(Arc::new(shared_argument_catalog(
            CatalogOptions::default(),
        )));
        engine.add("x").unwrap();
        engine.add("y").unwrap();
        let x = engine.instance_at(0).unwrap();
        engine.remove(x).unwrap();

        // `y` still lists the argument, but only the removed command's list is consulted.
        assert_eq!(engine.workloads(), "y");
        assert!(!visible(&engine, "shared"));
    }

    #[test]
    fn test_rescan_policy_keeps_arguments_still_needed() {
        let options = CatalogOptions {
            visibility: VisibilityPolicy::Rescan,
            ..Default::default()
        };
        let mut engine = WorkloadSelectionEngine::new(Arc::new(shared_argument_catalog(options)));
        engine.add("x").unwrap();
        engine.add("y").unwrap();
        let x = engine.instance_at(0).unwrap();
        engine.remove(x).unwrap();
        assert!(visible(&engine, "shared"));

        let y = engine.instance_at(0).unwrap();
        engine.remove(y).unwrap();
        assert!(!visible(&engine, "shared"));
    }

    #[test]
    fn test_transitive_policy_expands_nested_prerequisites() {
        let commands = vec![
            CommandSpec::new("target").with_required_by(&["login"]),
            CommandSpec::new("login")
                .with_requires(&["target"])
                .with_required_by(&["push"]),
            CommandSpec::new("push").with_requires(&["login"]),
        ];
        let catalog = WorkloadCatalog::new(commands, vec![]).unwrap();

        let mut declared = WorkloadSelectionEngine::new(Arc::new(catalog.clone()));
        declared.add("push").unwrap();
        assert_eq!(declared.workloads(), "login,push");

        let options = CatalogOptions {
            prerequisites: PrerequisitePolicy::Transitive,
            ..Default::default()
        };
        let mut transitive = WorkloadSelectionEngine::new(Arc::new(catalog.with_options(options)));
        transitive.add("push").unwrap();
        assert_eq!(transitive.workloads(), "target,login,push");
    }

    #[test]
    fn test_transitive_policy_matches_declared_on_complete_catalog() {
        let mut engine = engine_with(CatalogOptions {
            prerequisites: PrerequisitePolicy::Transitive,
            ..Default::default()
        });
        engine.add("rest:push").unwrap();
        assert_eq!(engine.workloads(), "rest:target,rest:login,rest:push");
    }

    #[test]
    fn test_set_value_and_unknown_argument() {
        let mut engine = engine();
        assert_eq!(engine.argument("rest:space").unwrap().value, "dev");
        engine.set_value("rest:space", "prod").unwrap();
        assert_eq!(engine.argument("rest:space").unwrap().value, "prod");
        assert!(!visible(&engine, "rest:space"));

        assert!(matches!(
            engine.set_value("rest:token", "x"),
            Err(SelectionError::Catalog(CatalogError::UnknownArgument { .. }))
        ));
    }

    #[test]
    fn test_values_survive_hiding() {
        let mut engine = engine();
        engine.add("rest:target").unwrap();
        engine.set_value("rest:target", "https://api.example.org").unwrap();
        let id = engine.instance_at(0).unwrap();
        engine.remove(id).unwrap();
        assert!(!visible(&engine, "rest:target"));
        assert_eq!(engine.argument("rest:target").unwrap().value, "https://api.example.org");
    }

    #[test]
    fn test_clear() {
        let mut engine = engine();
        engine.add("rest:push").unwrap();
        engine.clear();
        assert_eq!(engine.workloads(), "");
        assert!(!engine.has_visible_arguments());
        assert!(engine.form_has_error());
    }

    #[test]
    fn test_observers_see_each_successful_change() {
        let mut engine = engine();
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = engine.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.workloads.clone()));

        engine.add("rest:login").unwrap();
        let _ = engine.add("nope");
        let first = engine.instance_at(0).unwrap();
        let _ = engine.remove(first);
        engine.set_value("rest:space", "qa").unwrap();

        assert_eq!(
            *seen.borrow(),
            vec!["rest:target,rest:login".to_string(), "rest:target,rest:login".to_string()]
        );

        assert!(engine.unsubscribe(sub));
        assert!(!engine.unsubscribe(sub));
        engine.add("dummy").unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut engine = engine();
        engine.add("rest:target").unwrap();
        engine.set_value("rest:target", "not a url").unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.workloads, "rest:target");
        assert_eq!(snapshot.instances.len(), 1);
        assert!(snapshot.form_has_error);
        let target = snapshot.arguments.iter().find(|a| a.name == "rest:target").unwrap();
        assert!(target.visible && target.has_error);
        assert_eq!(target.label, "CF Target");
    }

    #[test]
    fn test_engines_share_a_catalog_independently() {
        let catalog = Arc::new(default_catalog().unwrap());
        let mut a = WorkloadSelectionEngine::new(Arc::clone(&catalog));
        let b = WorkloadSelectionEngine::new(catalog);
        a.add("dummy").unwrap();
        assert_eq!(a.workloads(), "dummy");
        assert_eq!(b.workloads(), "");
    }

    #[test]
    fn test_mixed_operations_end_valid() {
        let mut engine = engine();
        engine.add("dummy").unwrap();
        engine.add("rest:push").unwrap();
        engine.add("gcf:push").unwrap();
        let dummy = engine.instance_at(0).unwrap();
        engine.remove(dummy).unwrap();
        let gcf = engine.instance_at(3).unwrap();
        engine.remove(gcf).unwrap();

        assert_eq!(engine.workloads(), "rest:target,rest:login,rest:push");
        assert!(!engine.form_has_error());
    }
}
