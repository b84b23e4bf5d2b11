// src/core/builtin.rs

use crate::{
    core::catalog::{CatalogError, WorkloadCatalog},
    models::{ArgumentDef, CommandSpec},
};

const URL_PATTERN: &str =
    r"(?:https?://(?:www\.)?|www\.)[a-z0-9]+(?:[-.][a-z0-9]+)*\.[a-z]{2,5}(?::[0-9]{1,5})?(?:/\S*)?";
const USERNAME_PATTERN: &str = r"[a-zA-Z0-9_,@.-]+";
const TOKEN_PATTERN: &str = r"[a-zA-Z0-9_,-]+";

/// The catalog used when no catalog file is configured: the stock REST and CLI
/// workloads plus the dummy workloads for running without a target environment.
pub fn default_catalog() -> Result<WorkloadCatalog, CatalogError> {
    let commands = vec![
        CommandSpec::new("rest:target")
            .with_description("Sets the CF target")
            .with_required_by(&["rest:login", "rest:push"])
            .with_args(&["rest:target"]),
        CommandSpec::new("rest:login")
            .with_description(
                "Performs a login to the REST api. This option requires rest:target to be included in the list of workloads",
            )
            .with_requires(&["rest:target"])
            .with_required_by(&["rest:push"])
            .with_args(&["rest:username", "rest:password", "rest:space"]),
        CommandSpec::new("rest:push")
            .with_description(
                "Pushes a simple Ruby application using the REST api. This option requires both rest:target and rest:login to be included in the list of workloads",
            )
            .with_requires(&["rest:target", "rest:login"]),
        CommandSpec::new("gcf:push")
            .with_description("Pushes a simple Ruby application using the CF command-line"),
        CommandSpec::new("gcf:generateAndPush").with_description(
            "Generates and pushes a unique simple Ruby application using the CF command-line",
        ),
        CommandSpec::new("dummy").with_description(
            "An empty workload that can be used when a CF environment is not available",
        ),
        CommandSpec::new("dummyWithErrors").with_description(
            "An empty workload that generates errors. This can be used when a CF environment is not available",
        ),
    ];

    let arguments = vec![
        argument("rest:target", "CF Target", "rest:target", "http://api.example.com", URL_PATTERN),
        argument("rest:username", "CF Username", "rest:login", "cfUser", USERNAME_PATTERN),
        argument("rest:password", "CF Password", "rest:login", "cfPass", TOKEN_PATTERN),
        argument("rest:space", "CF Space", "rest:login", "dev", TOKEN_PATTERN),
    ];

    WorkloadCatalog::new(commands, arguments)
}

fn argument(name: &str, label: &str, for_cmd: &str, default: &str, pattern: &str) -> ArgumentDef {
    ArgumentDef {
        name: name.to_string(),
        label: Some(label.to_string()),
        for_cmd: for_cmd.to_string(),
        default: default.to_string(),
        pattern: pattern.to_string(),
        required_by: vec![for_cmd.to_string()],
    }
}
