// src/core/paths.rs

use crate::constants::{APP_DIR, CATALOG_FILENAME};
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

lazy_static! {
    static ref APP_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while resolving filesystem paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// `~` or an environment variable in a path could not be expanded.
    #[error("Could not expand path '{template}': {reason}")]
    Expansion {
        /// The path as written.
        template: String,
        /// Why expansion failed, e.g. an undefined variable.
        reason: String,
    },
}

/// Returns the application config directory (`~/.config/patcompose` on Linux).
///
/// The directory is only located, never created: a missing directory simply means there
/// is no user catalog. The first call caches the result.
pub fn get_app_config_dir() -> Result<PathBuf, PathError> {
    let mut cached = APP_CONFIG_DIR
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR);

    *cached = Some(config_path.clone());
    Ok(config_path)
}

/// Path of the user catalog inside the config directory. It may not exist.
pub fn get_user_catalog_path() -> Result<PathBuf, PathError> {
    get_app_config_dir().map(|dir| dir.join(CATALOG_FILENAME))
}

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a user supplied path.
pub fn expand_path(template: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(template).map_err(|e| PathError::Expansion {
        template: template.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}
