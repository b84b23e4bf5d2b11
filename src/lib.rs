//! Dependency-aware workload composition for performance experiments.
//!
//! A [`core::catalog::WorkloadCatalog`] declares the commands a backend can run,
//! their prerequisites and the input arguments they surface. A
//! [`core::selection::WorkloadSelectionEngine`] keeps the ordered selection a
//! user is building, and [`core::validation::ArgumentValidator`] turns the
//! visible arguments into a single "form is valid" signal.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// Command line front end: argument parsing and one handler per action.
pub mod cli;
/// Names and separators shared across modules.
pub mod constants;
/// Catalog loading, selection, validation and projection.
pub mod core;
/// Plain data types: catalog definitions and selection state.
pub mod models;
