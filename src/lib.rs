//! Rollmill - a CLI front end for rolling-mill pass-sequence simulations
//!
//! Rollmill is a single-binary tool that drives a pass-sequence simulation from
//! the command line: loading input schedules, running the solution procedure,
//! scaffolding new simulation projects, and offering an interactive shell that
//! keeps simulation state alive between evaluations.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (global flags, chained subcommand dispatch, REPL)
//! - [`core`] - Configuration loading/merging, session state, paths, and file templates
//! - [`plugin`] - Plugin registration table, activation, and config propagation
//! - [`sim`] - The simulation engine boundary (profiles, pass sequences, solve)
//! - [`script`] - Input-script loading
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! Rollmill maintains the following invariants:
//!
//! 1. Configuration layers merge in a fixed order; a later layer wins at the leaf
//! 2. A plugin activates at most once per process, in the order requested
//! 3. Configuration sections propagate into plugin registries before any subcommand runs
//! 4. One mutable [`core::session::Session`] is shared by every command in a chain
//!    and by every line of the interactive shell

pub mod cli;
pub mod core;
pub mod logging;
pub mod plugin;
pub mod script;
pub mod sim;
pub mod ui;
