//! reset command - clear the loaded simulation state

use clap::{Arg, ArgAction, ArgMatches};
use tracing::info;

use anyhow::Context as _;

use crate::cli::commands::ChainCommand;
use crate::cli::dispatch::{CommandError, CommandResult};
use crate::core::session::Session;
use crate::ui::prompts;

pub struct ResetCommand;

impl ChainCommand for ResetCommand {
    fn parser(&self) -> clap::Command {
        clap::Command::new("reset")
            .about("Clear the loaded profile and pass sequence")
            .arg(
                Arg::new("yes")
                    .short('y')
                    .long("yes")
                    .help("Skip the confirmation prompt")
                    .action(ArgAction::SetTrue),
            )
    }

    fn run(&self, args: &ArgMatches, session: &mut Session) -> CommandResult {
        if !args.get_flag("yes") {
            let confirmed = prompts::confirm("Discard the loaded profile and pass sequence?")
                .context("failed to read confirmation")?;
            if !confirmed {
                return Err(CommandError::Aborted);
            }
        }

        session.reset();
        info!("Session state cleared.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MergedConfig;
    use crate::core::templates::SAMPLE_INPUT;
    use crate::script;

    #[test]
    fn reset_with_yes_clears_state() {
        let mut session = Session::new(MergedConfig::default());
        let input = script::parse(SAMPLE_INPUT).unwrap();
        session.load(input.in_profile, input.sequence);

        let command = ResetCommand;
        let matches = command.parser().get_matches_from(["reset", "-y"]);
        command.run(&matches, &mut session).unwrap();
        assert!(!session.is_loaded());
    }
}
