//! plugin::builtin
//!
//! The linked-in plugin registration table.
//!
//! - `rollmill.core` wraps the simulation engine's configuration registry and
//!   is activated implicitly on every startup
//! - `rollmill.report` contributes the `report` subcommand

use std::sync::Arc;

use clap::ArgMatches;
use toml::Value;

use crate::cli::commands::{ChainCommand, CommandRegistry};
use crate::cli::dispatch::CommandResult;
use crate::core::session::Session;
use crate::plugin::{ConfigRegistry, Plugin, PluginError};
use crate::sim::{self, Unit};

/// The engine plugin, always activated first.
pub const CORE: &str = "rollmill.core";

/// The report plugin.
pub const REPORT: &str = "rollmill.report";

/// The registration table consulted by [`crate::plugin::PluginHost`].
pub fn table() -> Vec<Arc<dyn Plugin>> {
    vec![Arc::new(CorePlugin::new()), Arc::new(ReportPlugin::new())]
}

/// Exposes the engine's configuration registry; contributes no commands.
struct CorePlugin {
    registry: Arc<ConfigRegistry>,
}

impl CorePlugin {
    fn new() -> Self {
        Self {
            registry: Arc::new(ConfigRegistry::with_defaults([
                (
                    "DEFAULT_MAX_ITERATION_COUNT",
                    Value::Integer(i64::from(sim::DEFAULT_MAX_ITERATION_COUNT)),
                ),
                (
                    "DEFAULT_ITERATION_PRECISION",
                    Value::Float(sim::DEFAULT_ITERATION_PRECISION),
                ),
                (
                    "ROLL_PASS_AUTO_ROTATION",
                    Value::Boolean(sim::ROLL_PASS_AUTO_ROTATION),
                ),
            ])),
        }
    }
}

impl Plugin for CorePlugin {
    fn name(&self) -> &'static str {
        CORE
    }

    fn activate(&self, _commands: &mut CommandRegistry) -> Result<(), PluginError> {
        Ok(())
    }

    fn config_registry(&self) -> Option<Arc<ConfigRegistry>> {
        Some(self.registry.clone())
    }
}

struct ReportPlugin {
    registry: Arc<ConfigRegistry>,
}

impl ReportPlugin {
    fn new() -> Self {
        Self {
            registry: Arc::new(ConfigRegistry::with_defaults([(
                "DECIMAL_PLACES",
                Value::Integer(4),
            )])),
        }
    }
}

impl Plugin for ReportPlugin {
    fn name(&self) -> &'static str {
        REPORT
    }

    fn activate(&self, commands: &mut CommandRegistry) -> Result<(), PluginError> {
        commands.register(Box::new(ReportCommand {
            registry: self.registry.clone(),
        }));
        Ok(())
    }

    fn config_registry(&self) -> Option<Arc<ConfigRegistry>> {
        Some(self.registry.clone())
    }
}

/// Print a summary of the loaded profile and pass sequence.
struct ReportCommand {
    registry: Arc<ConfigRegistry>,
}

impl ChainCommand for ReportCommand {
    fn parser(&self) -> clap::Command {
        clap::Command::new("report")
            .about("Print a summary of the loaded profile and pass sequence")
    }

    fn run(&self, _args: &ArgMatches, session: &mut Session) -> CommandResult {
        let (Some(profile), Some(sequence)) = (session.in_profile(), session.sequence()) else {
            return Err(anyhow::anyhow!(
                "nothing loaded; use a command like 'input' to load a pass sequence"
            )
            .into());
        };

        let places = self
            .registry
            .get_integer("DECIMAL_PLACES")
            .map(|n| n.clamp(0, 12) as usize)
            .unwrap_or(4);

        println!(
            "profile: {} stock, diameter {:.places$} m at {:.places$} K",
            profile.shape, profile.diameter, profile.temperature,
        );
        if !profile.material.is_empty() {
            println!("material: {}", profile.material.join(", "));
        }
        println!("sequence of {} units:", sequence.len());
        for unit in sequence.units() {
            match unit {
                Unit::RollPass { label, gap, .. } => {
                    println!("  roll pass '{label}' (gap {gap:.places$} m)");
                }
                Unit::Transport { label, duration } => {
                    println!("  transport '{label}' ({duration:.places$} s)");
                }
            }
        }
        Ok(())
    }
}
