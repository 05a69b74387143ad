//! script
//!
//! Input-script loading.
//!
//! An input script is a TOML document exposing exactly two entry points:
//!
//! - `profile` - a table describing the entry stock for the first pass
//! - `sequence` - an ordered array of unit tables (`roll-pass` or
//!   `transport`), wrapped into a validated [`PassSequence`]
//!
//! Missing either entry is a fatal load error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::sim::{PassSequence, Profile, SequenceError, Unit};

/// Errors from input-script loading.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read input script '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in input script: {message}")]
    Parse { message: String },

    #[error("input script does not define '{entry}'")]
    MissingEntry { entry: &'static str },

    #[error("invalid pass sequence: {source}")]
    InvalidSequence {
        #[from]
        source: SequenceError,
    },
}

/// The two values an input script must provide.
#[derive(Debug)]
pub struct LoadedInput {
    pub in_profile: Profile,
    pub sequence: PassSequence,
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    profile: Option<Profile>,
    sequence: Option<Vec<Unit>>,
}

/// Read and evaluate an input script file.
pub fn load(path: &Path) -> Result<LoadedInput, ScriptError> {
    let contents = fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents)
}

/// Evaluate input-script text.
pub fn parse(text: &str) -> Result<LoadedInput, ScriptError> {
    let doc: InputDoc = toml::from_str(text).map_err(|err| ScriptError::Parse {
        message: err.message().to_string(),
    })?;

    let in_profile = doc
        .profile
        .ok_or(ScriptError::MissingEntry { entry: "profile" })?;
    let units = doc
        .sequence
        .ok_or(ScriptError::MissingEntry { entry: "sequence" })?;
    let sequence = PassSequence::new(units)?;

    Ok(LoadedInput {
        in_profile,
        sequence,
    })
}
