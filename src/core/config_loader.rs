//! # Config Loader
//!
//! Finds the catalog to use and turns it into a validated [`WorkloadCatalog`].
//!
//! Lookup order, first match wins:
//!
//! 1. The path passed on the command line (`--catalog`).
//! 2. The path in the `PATCOMPOSE_CATALOG` environment variable.
//! 3. `catalog.toml` in the user config directory, if the file exists.
//! 4. The built-in catalog.
//!
//! An explicitly requested file (1 or 2) that does not exist is an error rather than a
//! silent fallback.

use crate::{
    constants::CATALOG_ENV_VAR,
    core::{
        builtin,
        catalog::{CatalogError, WorkloadCatalog},
        paths::{self, PathError},
    },
    models::CatalogFile,
};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while locating, reading or validating a catalog.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The catalog file could not be read.
    #[error("Could not read catalog '{path}': {source}")]
    Io {
        /// The file that failed.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid catalog document.
    #[error("Error parsing TOML in '{path}': {source}")]
    TomlParse {
        /// The file that failed.
        path: String,
        /// The parser error, with line and column.
        #[source]
        source: toml::de::Error,
    },
    /// A catalog path given with `--catalog` or the environment does not exist.
    #[error("Catalog file not found at '{path}'.")]
    CatalogNotFound {
        /// The expanded path.
        path: String,
    },
    /// The document parsed but the catalog is inconsistent.
    #[error("Invalid catalog '{origin}': {source}")]
    Catalog {
        /// Where the catalog came from.
        origin: String,
        /// The consistency error.
        #[source]
        source: CatalogError,
    },
    /// The config directory could not be resolved or a path could not be expanded.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

type LoaderResult<T> = Result<T, ConfigError>;

/// Where a catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// `--catalog <PATH>`.
    CommandLine(PathBuf),
    /// The `PATCOMPOSE_CATALOG` environment variable.
    Environment(PathBuf),
    /// `catalog.toml` in the user config directory.
    UserConfig(PathBuf),
    /// No file; the catalog compiled into the binary.
    Builtin,
}

impl CatalogSource {
    /// The file behind this source, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::CommandLine(p) | Self::Environment(p) | Self::UserConfig(p) => Some(p),
            Self::Builtin => None,
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandLine(p) => write!(f, "{} (--catalog)", p.display()),
            Self::Environment(p) => write!(f, "{} (${})", p.display(), CATALOG_ENV_VAR),
            Self::UserConfig(p) => write!(f, "{}", p.display()),
            Self::Builtin => write!(f, "built-in"),
        }
    }
}

/// A validated catalog together with its origin.
#[derive(Debug)]
pub struct LoadedCatalog {
    /// The validated catalog.
    pub catalog: WorkloadCatalog,
    /// Where it was loaded from.
    pub source: CatalogSource,
}

/// Applies the lookup order and loads the winning catalog.
pub fn load_catalog(cli_path: Option<&str>) -> LoaderResult<LoadedCatalog> {
    let env_path = std::env::var(CATALOG_ENV_VAR).ok();
    let user_path = match paths::get_user_catalog_path() {
        Ok(path) => Some(path),
        Err(e) => {
            log::debug!("No user config directory, skipping user catalog: {}", e);
            None
        }
    };

    let source = resolve_catalog_source(cli_path, env_path.as_deref(), user_path)?;
    log::debug!("Using catalog from {}", source);

    let catalog = match source.path() {
        Some(path) => load_catalog_file(path)?,
        None => builtin::default_catalog().map_err(|source| ConfigError::Catalog {
            origin: CatalogSource::Builtin.to_string(),
            source,
        })?,
    };

    Ok(LoadedCatalog { catalog, source })
}

/// Picks the catalog source without touching the process environment.
///
/// `env_path` is the raw value of the environment variable and `user_path` the location
/// of the user catalog, if a config directory exists at all.
pub fn resolve_catalog_source(
    cli_path: Option<&str>,
    env_path: Option<&str>,
    user_path: Option<PathBuf>,
) -> LoaderResult<CatalogSource> {
    if let Some(raw) = cli_path {
        return Ok(CatalogSource::CommandLine(existing_file(raw)?));
    }
    if let Some(raw) = env_path.filter(|s| !s.trim().is_empty()) {
        return Ok(CatalogSource::Environment(existing_file(raw)?));
    }
    if let Some(path) = user_path
        && path.is_file()
    {
        return Ok(CatalogSource::UserConfig(path));
    }
    Ok(CatalogSource::Builtin)
}

/// Reads, parses and validates a catalog file.
pub fn load_catalog_file(path: &Path) -> LoaderResult<WorkloadCatalog> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_catalog(&content, &path.display().to_string())
}

/// Parses catalog TOML. `origin` only labels errors.
pub fn parse_catalog(content: &str, origin: &str) -> LoaderResult<WorkloadCatalog> {
    let file: CatalogFile = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: origin.to_string(),
        source,
    })?;
    WorkloadCatalog::from_file(file).map_err(|source| ConfigError::Catalog {
        origin: origin.to_string(),
        source,
    })
}

fn existing_file(raw: &str) -> LoaderResult<PathBuf> {
    let expanded = paths::expand_path(raw)?;
    if !expanded.is_file() {
        return Err(ConfigError::CatalogNotFound {
            path: expanded.display().to_string(),
        });
    }
    dunce::canonicalize(&expanded).map_err(|source| ConfigError::Io {
        path: expanded.display().to_string(),
        source,
    })
}
