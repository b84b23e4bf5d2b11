// src/constants.rs

/// The name of the application directory inside the system config dir (`~/.config/patcompose`).
pub const APP_DIR: &str = "patcompose";

/// The name of the catalog file looked up inside [`APP_DIR`].
pub const CATALOG_FILENAME: &str = "catalog.toml";

/// Environment variable that points to a catalog file, overriding the config dir lookup.
pub const CATALOG_ENV_VAR: &str = "PATCOMPOSE_CATALOG";

/// Separator used in the workload string sent to the backend.
pub const WORKLOAD_SEPARATOR: &str = ",";

/// Separator used when reporting several blocking dependents at once.
pub const DEPENDENT_SEPARATOR: &str = ", ";
