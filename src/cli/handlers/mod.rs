// src/cli/handlers/mod.rs

// One module per CLI action.

/// `check [PATH]`
pub mod check;
/// Helpers shared by the handlers.
pub mod commons;
/// `compose <command>...`
pub mod compose;
/// `interactive`
pub mod interactive;
/// `list [--args]`
pub mod list;
/// `validate <workloads>`
pub mod validate;
