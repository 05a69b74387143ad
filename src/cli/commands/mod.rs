//! cli::commands
//!
//! The chainable subcommand set.
//!
//! Each subcommand implements [`ChainCommand`]: it describes its own argument
//! parser (clap builder API, because plugin-contributed commands are only
//! known at runtime) and runs against the shared
//! [`crate::core::session::Session`]. Command handlers receive the session
//! explicitly; they never reach into ambient state.

mod create;
mod edit;
mod input;
mod reset;
pub mod shell;
mod solve;

use std::collections::BTreeMap;

use clap::ArgMatches;

use crate::cli::dispatch::CommandResult;
use crate::core::session::Session;
use crate::plugin::{builtin, PluginHost};

/// A subcommand runnable as part of a chain.
pub trait ChainCommand {
    /// The command's argument parser (name, about text, flags).
    fn parser(&self) -> clap::Command;

    /// Execute against the shared session.
    fn run(&self, args: &ArgMatches, session: &mut Session) -> CommandResult;
}

/// The set of registered subcommands, keyed by name.
///
/// Plugins add to it during activation; the built-in commands are registered
/// afterwards. Registering a name twice replaces the earlier entry.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn ChainCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under the name of its parser.
    pub fn register(&mut self, command: Box<dyn ChainCommand>) {
        let name = command.parser().get_name().to_string();
        self.commands.insert(name, command);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn ChainCommand> {
        self.commands.get(name).map(Box::as_ref)
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Parsers of every registered command.
    pub fn parsers(&self) -> impl Iterator<Item = clap::Command> + '_ {
        self.commands.values().map(|command| command.parser())
    }
}

/// Register the built-in command set.
///
/// Must run after plugin activation: the `solve` and scaffolding commands
/// take references into the plugin host's registries.
pub fn register_builtins(registry: &mut CommandRegistry, host: &PluginHost) -> anyhow::Result<()> {
    let engine_config = host
        .registry_for(builtin::CORE)
        .ok_or_else(|| anyhow::anyhow!("core plugin is not active"))?;

    registry.register(Box::new(input::InputCommand));
    registry.register(Box::new(solve::SolveCommand::new(engine_config)));
    registry.register(Box::new(create::CreateConfig::new(host.available())));
    registry.register(Box::new(create::CreateInput));
    registry.register(Box::new(create::CreateProject::new(host.available())));
    registry.register(Box::new(reset::ResetCommand));
    registry.register(Box::new(edit::EditCommand));
    Ok(())
}
