//! core::session
//!
//! The single mutable record shared by every subcommand in a chain and by
//! every line of the interactive shell.
//!
//! # Lifecycle
//!
//! A `Session` is constructed exactly once per process invocation, after
//! configuration is merged and plugins are activated. Loader commands replace
//! the simulation state; `reset` clears it. The configuration is read-only for
//! the rest of the run.
//!
//! The in-profile and the pass sequence always come from the same loader, so
//! they are set and cleared together; [`Session::load`] and [`Session::reset`]
//! are the only mutators, which keeps that pairing structural.

use crate::core::config::MergedConfig;
use crate::sim::{PassSequence, Profile};

/// Shared mutable session state.
#[derive(Debug, Default)]
pub struct Session {
    in_profile: Option<Profile>,
    sequence: Option<PassSequence>,
    config: MergedConfig,
}

impl Session {
    /// Construct a fresh session around the merged configuration.
    pub fn new(config: MergedConfig) -> Self {
        Self {
            in_profile: None,
            sequence: None,
            config,
        }
    }

    /// The merged configuration (read-only after construction).
    pub fn config(&self) -> &MergedConfig {
        &self.config
    }

    /// The loaded entry profile, if any.
    pub fn in_profile(&self) -> Option<&Profile> {
        self.in_profile.as_ref()
    }

    /// The loaded pass sequence, if any.
    pub fn sequence(&self) -> Option<&PassSequence> {
        self.sequence.as_ref()
    }

    /// Whether both the profile and the pass sequence are loaded.
    pub fn is_loaded(&self) -> bool {
        self.in_profile.is_some() && self.sequence.is_some()
    }

    /// Replace the simulation state with freshly loaded input.
    pub fn load(&mut self, in_profile: Profile, sequence: PassSequence) {
        self.in_profile = Some(in_profile);
        self.sequence = Some(sequence);
    }

    /// Clear the simulation state.
    pub fn reset(&mut self) {
        self.in_profile = None;
        self.sequence = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script;

    fn loaded_session() -> Session {
        let mut session = Session::new(MergedConfig::default());
        let input = script::parse(crate::core::templates::SAMPLE_INPUT).unwrap();
        session.load(input.in_profile, input.sequence);
        session
    }

    #[test]
    fn fresh_session_has_nothing_loaded() {
        let session = Session::new(MergedConfig::default());
        assert!(!session.is_loaded());
        assert!(session.in_profile().is_none());
        assert!(session.sequence().is_none());
    }

    #[test]
    fn load_sets_both_parts() {
        let session = loaded_session();
        assert!(session.is_loaded());
        assert!(session.in_profile().is_some());
        assert!(session.sequence().is_some());
    }

    #[test]
    fn reset_clears_both_parts() {
        let mut session = loaded_session();
        session.reset();
        assert!(!session.is_loaded());
        assert!(session.in_profile().is_none());
        assert!(session.sequence().is_none());
    }
}
