//! core
//!
//! Domain-independent foundations: configuration loading and merging,
//! well-known storage paths, the shared session record, and the file
//! templates used by the scaffolding commands.

pub mod config;
pub mod paths;
pub mod session;
pub mod templates;
