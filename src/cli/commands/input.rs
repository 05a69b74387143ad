//! input command - load an input script into the session

use clap::{value_parser, Arg, ArgMatches};
use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::ChainCommand;
use crate::cli::dispatch::CommandResult;
use crate::core::session::Session;
use crate::script;

pub struct InputCommand;

impl ChainCommand for InputCommand {
    fn parser(&self) -> clap::Command {
        clap::Command::new("input")
            .about("Read input data from a TOML script file")
            .long_about(
                "Reads input data from the TOML script FILE.\n\n\
                 The script must define two entry points:\n\n\
                 profile:   table describing the entry stock for the first pass\n\
                 sequence:  array of unit tables (roll-pass or transport) defining the pass sequence",
            )
            .arg(
                Arg::new("file")
                    .short('f')
                    .long("file")
                    .help("File to load from")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .default_value("input.toml"),
            )
    }

    fn run(&self, args: &ArgMatches, session: &mut Session) -> CommandResult {
        let file = args
            .get_one::<PathBuf>("file")
            .expect("file has a default value");

        info!("Reading input from: {}", file.display());

        let input = script::load(file).map_err(|err| {
            tracing::error!(error = %err, "Error during reading of input file.");
            anyhow::Error::new(err)
        })?;

        info!(
            "Loaded in profile: {} stock, diameter {} m at {} K",
            input.in_profile.shape, input.in_profile.diameter, input.in_profile.temperature,
        );
        info!("Loaded pass sequence of {} units.", input.sequence.len());

        session.load(input.in_profile, input.sequence);

        info!("Finished reading input.");
        Ok(())
    }
}
