//! edit command - open a file in the operator's text editor

use std::env;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Context as _;
use clap::{value_parser, Arg, ArgMatches};
use tracing::info;

use crate::cli::commands::ChainCommand;
use crate::cli::dispatch::CommandResult;
use crate::core::session::Session;

pub struct EditCommand;

impl ChainCommand for EditCommand {
    fn parser(&self) -> clap::Command {
        clap::Command::new("edit")
            .about("Open and edit a specified file in a text editor")
            .arg(
                Arg::new("file")
                    .short('f')
                    .long("file")
                    .help("File to edit")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .required(true),
            )
    }

    fn run(&self, args: &ArgMatches, _session: &mut Session) -> CommandResult {
        let file = args.get_one::<PathBuf>("file").expect("file is required");

        let editor = env::var("VISUAL")
            .or_else(|_| env::var("EDITOR"))
            .map_err(|_| anyhow::anyhow!("no editor configured; set $VISUAL or $EDITOR"))?;

        let status = Command::new(&editor)
            .arg(file)
            .status()
            .with_context(|| format!("failed to launch editor '{editor}'"))?;

        if !status.success() {
            return Err(anyhow::anyhow!("editor exited with {status}").into());
        }

        info!("File successfully edited: {}", file.display());
        Ok(())
    }
}
