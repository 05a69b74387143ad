//! core::paths
//!
//! Centralized path routing for Rollmill storage locations.
//!
//! # Storage Layout
//!
//! All per-user data lives under one application directory:
//! - `config.toml` - Global configuration layer
//! - `shell_history` - Interactive shell history
//!
//! The directory is resolved in this order:
//! 1. `$ROLLMILL_CONFIG_DIR` if set
//! 2. `<platform config dir>/rollmill` (e.g. `~/.config/rollmill` on Linux)

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the application directory.
pub const CONFIG_DIR_ENV: &str = "ROLLMILL_CONFIG_DIR";

/// Errors from path resolution.
#[derive(Debug, Error)]
pub enum PathsError {
    #[error("could not determine the user configuration directory")]
    NoConfigDir,
}

/// Well-known storage locations for per-user application data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the application directory from the environment.
    pub fn resolve() -> Result<Self, PathsError> {
        if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
            return Ok(Self {
                config_dir: PathBuf::from(dir),
            });
        }
        let base = dirs::config_dir().ok_or(PathsError::NoConfigDir)?;
        Ok(Self {
            config_dir: base.join("rollmill"),
        })
    }

    /// Create paths rooted at an explicit directory.
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// The application directory itself.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Path of the global configuration layer.
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Path of the interactive shell history file.
    pub fn history_path(&self) -> PathBuf {
        self.config_dir.join("shell_history")
    }

    /// Ensure the application directory exists.
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.config_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_files_live_under_config_dir() {
        let paths = AppPaths::new(PathBuf::from("/home/op/.config/rollmill"));
        assert_eq!(
            paths.global_config_path(),
            PathBuf::from("/home/op/.config/rollmill/config.toml")
        );
        assert_eq!(
            paths.history_path(),
            PathBuf::from("/home/op/.config/rollmill/shell_history")
        );
    }

    #[test]
    fn env_override_wins() {
        env::set_var(CONFIG_DIR_ENV, "/tmp/rollmill-test");
        let paths = AppPaths::resolve().unwrap();
        assert_eq!(paths.config_dir(), Path::new("/tmp/rollmill-test"));
        env::remove_var(CONFIG_DIR_ENV);
    }

    #[test]
    fn ensure_dir_creates_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = AppPaths::new(temp.path().join("nested/rollmill"));
        paths.ensure_dir().unwrap();
        assert!(paths.config_dir().is_dir());
    }
}
