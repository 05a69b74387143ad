//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse global flags and the subcommand chain
//! - Run the one-time setup phase: merge configuration layers, activate
//!   plugins, propagate configuration into plugin registries, install the
//!   logging subscriber, construct the session
//! - Dispatch the chain (and the interactive shell) against that session
//!
//! # Startup order
//!
//! Configuration load → logging init → plugin activation (core first, then
//! `--plugin` flags, then configuration-declared) → config propagation →
//! builtin command registration → session construction → dispatch. Plugins
//! finish activating before any subcommand name is resolved, because they
//! contribute to the command set.

pub mod args;
pub mod commands;
pub mod dispatch;

pub use args::Cli;

use std::process::ExitCode;

use anyhow::{Context as _, Result};

use crate::core::config;
use crate::core::paths::AppPaths;
use crate::core::session::Session;
use crate::logging;
use crate::plugin::{self, builtin, PluginHost};
use crate::ui::output;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> ExitCode {
    let cli = Cli::parse_args();
    match run_with(cli) {
        Ok(code) => code,
        Err(err) => {
            // Setup failures land here; the subscriber may not exist yet.
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run_with(cli: Cli) -> Result<ExitCode> {
    println!("This is rollmill v{}.\n", env!("CARGO_PKG_VERSION"));

    if let Some(dir) = &cli.dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create working directory '{}'", dir.display()))?;
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change into directory '{}'", dir.display()))?;
    }

    let paths = AppPaths::resolve()?;
    let config = config::load(&paths, cli.use_global_config(), &cli.config_file)?;

    logging::init(&config.logging()?)?;

    let mut registry = commands::CommandRegistry::new();
    let mut host = PluginHost::builtin();

    // The core plugin is part of every run.
    host.activate(&[builtin::CORE.to_string()], &mut registry)?;

    // Flag-requested plugins first, then configuration-declared ones.
    let mut requested = cli.plugins.clone();
    requested.extend(config.plugins()?);
    host.activate(&requested, &mut registry)?;
    if !requested.is_empty() {
        tracing::info!("Loaded plugins: {:?}", requested);
    }

    plugin::propagate(&config, &host);

    commands::register_builtins(&mut registry, &host)?;
    let dispatcher = dispatch::Dispatcher::new(registry, paths);

    let mut session = Session::new(config);

    if cli.chain.is_empty() {
        println!("Usage: rollmill [OPTIONS] [COMMAND [ARGS]]...\n");
        println!("Commands:\n{}", dispatcher.command_overview());
        println!("\nSee 'rollmill --help' for global options.");
        return Ok(ExitCode::SUCCESS);
    }

    match dispatcher.run_chain(&cli.chain, &mut session, false) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(dispatch::CommandError::Aborted) => Ok(ExitCode::SUCCESS),
        Err(dispatch::CommandError::Fatal(_)) => Ok(ExitCode::from(1)),
        Err(dispatch::CommandError::Failed(err)) => {
            output::error(format!("{err:#}"));
            Ok(ExitCode::FAILURE)
        }
    }
}
