//! solve command - run the solution procedure on the loaded pass sequence

use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, info};

use crate::cli::commands::ChainCommand;
use crate::cli::dispatch::{CommandError, CommandResult};
use crate::core::session::Session;
use crate::plugin::ConfigRegistry;
use crate::sim::SolveLimits;

pub struct SolveCommand {
    engine_config: Arc<ConfigRegistry>,
}

impl SolveCommand {
    /// `engine_config` is the core plugin's registry; solve parameters are
    /// read from it at execution time, after propagation has run.
    pub fn new(engine_config: Arc<ConfigRegistry>) -> Self {
        Self { engine_config }
    }
}

impl ChainCommand for SolveCommand {
    fn parser(&self) -> clap::Command {
        clap::Command::new("solve").about("Run the solution procedure on all loaded roll passes")
    }

    fn run(&self, _args: &ArgMatches, session: &mut Session) -> CommandResult {
        let (Some(in_profile), Some(sequence)) = (session.in_profile(), session.sequence()) else {
            error!("No pass sequence loaded. Use a command like 'input' to load a pass sequence.");
            return Err(CommandError::Fatal("no pass sequence loaded".to_string()));
        };

        let limits = SolveLimits::from_registry(&self.engine_config);

        info!("Starting solution process...");
        match sequence.solve(in_profile, &limits) {
            Ok(report) => {
                for pass in &report.passes {
                    info!(
                        "{}: exit diameter {:.4e} m, exit temperature {:.2} K ({} iterations)",
                        pass.label, pass.exit_diameter, pass.exit_temperature, pass.iterations,
                    );
                }
                info!("Finished solution process.");
                Ok(())
            }
            Err(err) => {
                // Domain failures are reported, not propagated; the chain and
                // the shell keep running.
                error!(error = %err, "Solution process failed.");
                Ok(())
            }
        }
    }
}
