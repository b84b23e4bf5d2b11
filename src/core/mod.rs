// src/core/mod.rs

/// The catalog compiled into the binary.
pub mod builtin;
pub mod catalog;
pub mod config_loader;
/// Config directory lookup and path expansion.
pub mod paths;
pub mod projection;
pub mod selection;
/// Field and form validation over a selection engine.
pub mod validation;
