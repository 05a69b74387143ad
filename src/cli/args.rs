//! cli::args
//!
//! Global command-line options, parsed with clap derive.
//!
//! # Global Flags
//!
//! - `-c` / `--config-file <FILE>`: the local configuration layer
//! - `--global-config` / `--no-global-config`: toggle the global layer
//! - `-p` / `--plugin <NAME>`: plugin to activate (repeatable, before
//!   configuration-declared plugins)
//! - `-d` / `--dir <DIR>`: change the working directory (created if missing)
//!
//! Everything after the global flags is the subcommand chain; each subcommand
//! parses its own arguments (see [`crate::cli::dispatch`]).

use clap::Parser;
use std::path::PathBuf;

/// Rollmill - CLI front end for rolling-mill pass-sequence simulations
#[derive(Parser, Debug)]
#[command(name = "rollmill")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The local configuration TOML file
    #[arg(short = 'c', long, value_name = "FILE", default_value = "config.toml")]
    pub config_file: PathBuf,

    /// Use the global configuration layer (default)
    #[arg(short = 'C', long, overrides_with = "no_global_config")]
    pub global_config: bool,

    /// Skip the global configuration layer
    #[arg(long)]
    pub no_global_config: bool,

    /// Activate a plugin (may be given multiple times)
    #[arg(short = 'p', long = "plugin", value_name = "NAME")]
    pub plugins: Vec<String>,

    /// Change the working directory to the specified one
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Subcommand chain, e.g. `input solve` or `create-config -f mill.toml`
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub chain: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Whether the global configuration layer participates in the merge.
    pub fn use_global_config(&self) -> bool {
        !self.no_global_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_tokens_collect_after_global_flags() {
        let cli = Cli::parse_from([
            "rollmill", "-c", "mill.toml", "-p", "rollmill.report", "input", "-f", "in.toml",
            "solve",
        ]);
        assert_eq!(cli.config_file, PathBuf::from("mill.toml"));
        assert_eq!(cli.plugins, vec!["rollmill.report"]);
        assert_eq!(cli.chain, vec!["input", "-f", "in.toml", "solve"]);
    }

    #[test]
    fn global_config_defaults_on() {
        let cli = Cli::parse_from(["rollmill", "solve"]);
        assert!(cli.use_global_config());

        let cli = Cli::parse_from(["rollmill", "--no-global-config", "solve"]);
        assert!(!cli.use_global_config());
    }
}
