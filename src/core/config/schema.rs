//! core::config::schema
//!
//! Typed views of the reserved configuration sections.

use std::path::PathBuf;

use serde::Deserialize;

/// The `[logging]` section, passed through to the logging subsystem.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Filter directive, e.g. `"info"` or `"rollmill=debug"`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Write log output to this file instead of stdout.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Event formatting.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            format: LogFormat::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Log event formatting styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_section() {
        let section: LoggingSection =
            toml::from_str("level = \"debug\"\nfile = \"mill.log\"\nformat = \"json\"").unwrap();
        assert_eq!(section.level, "debug");
        assert_eq!(section.file, Some(PathBuf::from("mill.log")));
        assert_eq!(section.format, LogFormat::Json);
    }

    #[test]
    fn level_defaults_to_info() {
        let section: LoggingSection = toml::from_str("format = \"compact\"").unwrap();
        assert_eq!(section.level, "info");
    }

    #[test]
    fn unknown_format_rejected() {
        let result: Result<LoggingSection, _> = toml::from_str("format = \"fancy\"");
        assert!(result.is_err());
    }
}
