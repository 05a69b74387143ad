//! core::config
//!
//! Layered configuration loading and merging.
//!
//! # Overview
//!
//! Rollmill reads up to two TOML configuration documents:
//! - **Global**: user-level settings under the application directory,
//!   materialized from a default template on first use
//! - **Local**: project-level settings, by default `./config.toml`
//!
//! # Precedence
//!
//! Layers are deep-merged in this order (later overrides earlier):
//! 1. Built-in empty defaults
//! 2. Global layer (if requested)
//! 3. Local layer (if the file exists)
//!
//! The merge is key-wise on tables; any other value (including arrays) in a
//! later layer fully replaces the earlier one. Missing optional layers are
//! skipped silently; a present-but-malformed layer aborts startup.
//!
//! # Reserved sections
//!
//! - `[rollmill]` - the `plugins` list plus per-plugin configuration tables
//!   (`[rollmill.core]`, `[rollmill.report]`, ...), candidates for propagation
//!   into plugin registries
//! - `[logging]` - handed to the logging subsystem at startup

pub mod schema;

pub use schema::{LogFormat, LoggingSection};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use thiserror::Error;

use crate::core::paths::AppPaths;
use crate::core::templates;

/// Reserved top-level section owning the plugin list and plugin tables.
pub const MILL_SECTION: &str = "rollmill";

/// Reserved top-level section configuring the logging subsystem.
pub const LOGGING_SECTION: &str = "logging";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid '{section}' section: {message}")]
    InvalidSection {
        section: &'static str,
        message: String,
    },
}

/// The merged configuration tree.
///
/// Immutable once constructed; commands only read it. Plugins receive their
/// own sections through the propagation step at startup, never by reaching
/// back into this tree.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    root: Table,
}

impl MergedConfig {
    /// Wrap an already-merged table (used by tests and the REPL setup path).
    pub fn from_table(root: Table) -> Self {
        Self { root }
    }

    /// The raw merged tree.
    pub fn root(&self) -> &Table {
        &self.root
    }

    /// Plugin identifiers declared in the `[rollmill]` section.
    pub fn plugins(&self) -> Result<Vec<String>, ConfigError> {
        let Some(mill) = self.root.get(MILL_SECTION).and_then(Value::as_table) else {
            return Ok(Vec::new());
        };
        match mill.get("plugins") {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(String::from)
                        .ok_or_else(|| ConfigError::InvalidSection {
                            section: MILL_SECTION,
                            message: format!("'plugins' entries must be strings, got {item}"),
                        })
                })
                .collect(),
            Some(other) => Err(ConfigError::InvalidSection {
                section: MILL_SECTION,
                message: format!("'plugins' must be an array of strings, got {other}"),
            }),
        }
    }

    /// Sub-tables of the `[rollmill]` section, keyed by short plugin name.
    ///
    /// Scalar keys (like `plugins`) are not tables and are excluded.
    pub fn plugin_tables(&self) -> Vec<(String, Table)> {
        let Some(mill) = self.root.get(MILL_SECTION).and_then(Value::as_table) else {
            return Vec::new();
        };
        mill.iter()
            .filter_map(|(name, value)| {
                value
                    .as_table()
                    .map(|table| (name.clone(), table.clone()))
            })
            .collect()
    }

    /// The typed `[logging]` section, defaulted when absent.
    pub fn logging(&self) -> Result<LoggingSection, ConfigError> {
        match self.root.get(LOGGING_SECTION) {
            None => Ok(LoggingSection::default()),
            Some(value) => {
                value
                    .clone()
                    .try_into()
                    .map_err(|err: toml::de::Error| ConfigError::InvalidSection {
                        section: LOGGING_SECTION,
                        message: err.message().to_string(),
                    })
            }
        }
    }
}

/// Load and merge the configuration layers.
///
/// If `use_global` is set and the global file does not exist, its parent
/// directory is created and a default document is written before reading.
///
/// # Errors
///
/// Returns an error if a present layer cannot be read or parsed. Missing
/// layers are not an error.
pub fn load(paths: &AppPaths, use_global: bool, local: &Path) -> Result<MergedConfig, ConfigError> {
    let mut root = Table::new();
    root.insert(MILL_SECTION.to_string(), Value::Table(Table::new()));

    if use_global {
        let global = paths.global_config_path();
        if !global.exists() {
            paths.ensure_dir().map_err(|source| ConfigError::Write {
                path: global.clone(),
                source,
            })?;
            let rendered = templates::render_config(&[], &BTreeMap::new());
            fs::write(&global, rendered).map_err(|source| ConfigError::Write {
                path: global.clone(),
                source,
            })?;
            println!("Created global config file: {}", global.display());
        } else {
            println!("Using global config file: {}", global.display());
        }
        deep_merge(&mut root, read_table(&global)?);
    }

    if local.exists() {
        println!("Using local config file: {}", local.display());
        deep_merge(&mut root, read_table(local)?);
    }

    Ok(MergedConfig { root })
}

fn read_table(path: &Path) -> Result<Table, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.message().to_string(),
    })
}

/// Deep-merge `overlay` into `base`.
///
/// Tables merge key-wise; every other value in the overlay (scalars and
/// arrays alike) replaces the base value at that key.
pub fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match value {
            Value::Table(overlay_table) => {
                if let Some(Value::Table(base_table)) = base.get_mut(&key) {
                    deep_merge(base_table, overlay_table);
                } else {
                    base.insert(key, Value::Table(overlay_table));
                }
            }
            other => {
                base.insert(key, other);
            }
        }
    }
}
