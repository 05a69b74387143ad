//! logging
//!
//! Bridges the `[logging]` configuration section to the tracing subscriber.
//!
//! The section is applied once per process, before the session is
//! constructed; REPL lines and tests never re-initialize. The
//! `ROLLMILL_LOG` environment variable overrides the configured level
//! directive.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use crate::core::config::{LogFormat, LoggingSection};

/// Environment variable overriding the configured filter directive.
pub const LOG_ENV: &str = "ROLLMILL_LOG";

/// Errors from logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level directive '{directive}': {message}")]
    InvalidLevel { directive: String, message: String },

    #[error("failed to open log file '{path}': {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Install the global subscriber from the `[logging]` section.
///
/// A second call in one process is a no-op.
pub fn init(section: &LoggingSection) -> Result<(), LoggingError> {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| section.level.clone());
    let filter =
        EnvFilter::try_new(&directive).map_err(|err| LoggingError::InvalidLevel {
            directive: directive.clone(),
            message: err.to_string(),
        })?;

    let writer = match &section.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenFile {
                    path: path.clone(),
                    source,
                })?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stdout),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true);

    let result = match section.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // Already-initialized is fine (tests, re-entrant setups).
    let _ = result;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_directive_is_rejected() {
        let section = LoggingSection {
            level: "no=such=level".to_string(),
            file: None,
            format: LogFormat::Full,
        };
        assert!(matches!(
            init(&section),
            Err(LoggingError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn unopenable_file_is_rejected() {
        let section = LoggingSection {
            level: "info".to_string(),
            file: Some(PathBuf::from("/nonexistent-dir/mill.log")),
            format: LogFormat::Full,
        };
        assert!(matches!(init(&section), Err(LoggingError::OpenFile { .. })));
    }
}
