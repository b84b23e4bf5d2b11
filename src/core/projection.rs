//! # Workload String Projection
//!
//! Pure functions that turn the selection into what the backend consumes, and back.
//! Nothing here holds state: the selection engine calls [`workload_string`] after every
//! mutation, and the submission helpers read the engine as it is at call time.

use crate::{
    constants::WORKLOAD_SEPARATOR,
    core::{
        catalog::{CatalogError, WorkloadCatalog},
        selection::WorkloadSelectionEngine,
    },
    models::{CommandSpec, ExperimentRequest, SelectedInstance},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Joins instance names in selection order, duplicates included. Empty for an empty slice.
pub fn workload_string(instances: &[SelectedInstance]) -> String {
    instances
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(WORKLOAD_SEPARATOR)
}

/// Current values of the visible arguments, keyed by argument name.
pub fn submission_arguments(engine: &WorkloadSelectionEngine) -> BTreeMap<String, String> {
    engine
        .arguments()
        .filter(|view| view.visible)
        .map(|view| (view.spec.name.clone(), view.value.to_string()))
        .collect()
}

/// Builds the submission payload. Returns `None` while the form has an error.
pub fn experiment_request(engine: &WorkloadSelectionEngine) -> Option<ExperimentRequest> {
    if engine.form_has_error() {
        return None;
    }
    Some(ExperimentRequest {
        workloads: engine.workloads().to_string(),
        arguments: submission_arguments(engine),
    })
}

/// Resolves a workload string against the catalog.
///
/// Spaces are dropped anywhere in the input before splitting. The first name that is not
/// in the catalog aborts the parse, so an empty string fails on the empty name.
pub fn parse_workload_string<'c>(
    catalog: &'c WorkloadCatalog,
    raw: &str,
) -> Result<Vec<&'c CommandSpec>, CatalogError> {
    let compact: String = raw.chars().filter(|c| *c != ' ').collect();
    compact
        .split(WORKLOAD_SEPARATOR)
        .map(|name| catalog.command(name))
        .collect()
}

/// A prerequisite that does not appear before the command that needs it.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UnmetPrerequisite {
    /// 0-based position in the workload.
    pub position: usize,
    /// The command at that position.
    pub command: String,
    /// Its prerequisites that do not appear earlier.
    pub missing: Vec<String>,
}

/// For each position, the `requires` entries that are absent from the earlier part of the
/// workload. Positions with nothing missing are left out.
pub fn unmet_prerequisites(commands: &[&CommandSpec]) -> Vec<UnmetPrerequisite> {
    let mut unmet = Vec::new();
    for (position, cmd) in commands.iter().enumerate() {
        let earlier = commands.get(..position).unwrap_or_default();
        let missing: Vec<String> = cmd
            .requires
            .iter()
            .filter(|req| !earlier.iter().any(|c| &c.name == *req))
            .cloned()
            .collect();
        if !missing.is_empty() {
            unmet.push(UnmetPrerequisite {
                position,
                command: cmd.name.clone(),
                missing,
            });
        }
    }
    unmet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builtin::default_catalog;
    use crate::models::InstanceId;
    use std::sync::Arc;

    fn instance(name: &str) -> SelectedInstance {
        SelectedInstance {
            id: InstanceId::new(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_workload_string() {
        assert_eq!(workload_string(&[]), "");
        assert_eq!(workload_string(&[instance("dummy")]), "dummy");
        assert_eq!(
            workload_string(&[instance("rest:target"), instance("dummy"), instance("dummy")]),
            "rest:target,dummy,dummy"
        );
    }

    #[test]
    fn test_submission_arguments_only_visible() {
        let mut engine = WorkloadSelectionEngine::new(Arc::new(default_catalog().unwrap()));
        assert!(submission_arguments(&engine).is_empty());

        engine.add("rest:target").unwrap();
        engine.set_value("rest:username", "hidden").unwrap();
        let args = submission_arguments(&engine);
        assert_eq!(args.len(), 1);
        assert_eq!(args.get("rest:target").map(String::as_str), Some("http://api.example.com"));
    }

    #[test]
    fn test_experiment_request_requires_a_valid_form() {
        let mut engine = WorkloadSelectionEngine::new(Arc::new(default_catalog().unwrap()));
        assert!(experiment_request(&engine).is_none());

        engine.add("rest:login").unwrap();
        engine.set_value("rest:password", "").unwrap();
        assert!(experiment_request(&engine).is_none());

        engine.set_value("rest:password", "secret").unwrap();
        let request = experiment_request(&engine).unwrap();
        assert_eq!(request.workloads, "rest:target,rest:login");
        assert_eq!(request.arguments.len(), 4);
        assert_eq!(request.arguments["rest:password"], "secret");
    }

    #[test]
    fn test_experiment_request_json_shape() {
        let mut engine = WorkloadSelectionEngine::new(Arc::new(default_catalog().unwrap()));
        engine.add("rest:target").unwrap();
        engine.add("gcf:push").unwrap();

        let json = serde_json::to_value(experiment_request(&engine).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "workloads": "rest:target,gcf:push",
                "arguments": { "rest:target": "http://api.example.com" }
            })
        );
    }

    #[test]
    fn test_parse_workload_string() {
        let catalog = default_catalog().unwrap();
        let names: Vec<&str> = parse_workload_string(&catalog, "rest:target, rest:login ,dummy")
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["rest:target", "rest:login", "dummy"]);
    }

    #[test]
    fn test_parse_workload_string_empty_is_rejected() {
        let catalog = default_catalog().unwrap();
        for raw in ["", "   "] {
            let err = parse_workload_string(&catalog, raw).unwrap_err();
            assert!(matches!(err, CatalogError::UnknownCommand { ref name } if name.is_empty()));
        }
    }

    #[test]
    fn test_parse_workload_string_stops_at_first_unknown() {
        let catalog = default_catalog().unwrap();
        let err = parse_workload_string(&catalog, "dummy,nope,other").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCommand { ref name } if name == "nope"));

        // A trailing separator leaves an empty name behind.
        let err = parse_workload_string(&catalog, "dummy,").unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCommand { ref name } if name.is_empty()));
    }

    #[test]
    fn test_parse_round_trips_engine_output() {
        let catalog = Arc::new(default_catalog().unwrap());
        let mut engine = WorkloadSelectionEngine::new(Arc::clone(&catalog));
        engine.add("rest:push").unwrap();
        engine.add("dummy").unwrap();

        let parsed = parse_workload_string(&catalog, engine.workloads()).unwrap();
        let names: Vec<&str> = parsed.iter().map(|c| c.name.as_str()).collect();
        let expected: Vec<&str> = engine.instances().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, expected);
        assert!(unmet_prerequisites(&parsed).is_empty());
    }

    #[test]
    fn test_unmet_prerequisites() {
        let catalog = default_catalog().unwrap();
        let parsed = parse_workload_string(&catalog, "rest:login,rest:target,rest:push").unwrap();
        let unmet = unmet_prerequisites(&parsed);
        assert_eq!(
            unmet,
            vec![UnmetPrerequisite {
                position: 0,
                command: "rest:login".to_string(),
                missing: vec!["rest:target".to_string()],
            }]
        );
    }

    #[test]
    fn test_unmet_prerequisites_reports_every_missing_name() {
        let catalog = default_catalog().unwrap();
        let parsed = parse_workload_string(&catalog, "dummy,rest:push").unwrap();
        let unmet = unmet_prerequisites(&parsed);
        assert_eq!(unmet.len(), 1);
        assert_eq!(unmet[0].position, 1);
        assert_eq!(unmet[0].missing, vec!["rest:target", "rest:login"]);
    }
}
