//! create commands - materialize starter files for a simulation project
//!
//! `create-config` and `create-input` write single files; `create-project`
//! composes them to scaffold a directory. None of them will silently
//! overwrite an existing target: the operator is asked, and declining aborts
//! the whole invocation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use tracing::info;

use crate::cli::commands::ChainCommand;
use crate::cli::dispatch::{CommandError, CommandResult};
use crate::core::session::Session;
use crate::core::templates;
use crate::plugin::{builtin, PluginDescriptor};
use crate::ui::prompts;

/// Refuse to overwrite `path` without confirmation.
fn guard_overwrite(path: &Path) -> CommandResult {
    if path.exists() {
        let overwrite = prompts::confirm(&format!(
            "File {} already exists, overwrite?",
            path.display()
        ))
        .context("failed to read confirmation")?;
        if !overwrite {
            return Err(CommandError::Aborted);
        }
    }
    Ok(())
}

fn write_config_file(
    path: &Path,
    include_plugins: bool,
    include_constants: bool,
    available: &[PluginDescriptor],
) -> CommandResult {
    guard_overwrite(path)?;

    let plugins: Vec<String> = if include_plugins {
        available
            .iter()
            .filter(|descriptor| descriptor.name != builtin::CORE)
            .map(|descriptor| descriptor.name.to_string())
            .collect()
    } else {
        Vec::new()
    };

    let constants: BTreeMap<String, toml::Table> = if include_constants {
        available
            .iter()
            .filter_map(|descriptor| {
                descriptor
                    .registry
                    .as_ref()
                    .map(|registry| (descriptor.name.to_string(), registry.snapshot()))
            })
            .collect()
    } else {
        BTreeMap::new()
    };

    let rendered = templates::render_config(&plugins, &constants);
    fs::write(path, rendered)
        .with_context(|| format!("failed to write config file '{}'", path.display()))?;

    info!("Created config file: {}", path.display());
    Ok(())
}

fn write_input_file(path: &Path) -> CommandResult {
    guard_overwrite(path)?;

    fs::write(path, templates::SAMPLE_INPUT)
        .with_context(|| format!("failed to write input file '{}'", path.display()))?;

    info!("Created input file: {}", path.display());
    Ok(())
}

/// Write a standard configuration file usable with the `-c` option.
pub struct CreateConfig {
    available: Vec<PluginDescriptor>,
}

impl CreateConfig {
    pub fn new(available: Vec<PluginDescriptor>) -> Self {
        Self { available }
    }
}

impl ChainCommand for CreateConfig {
    fn parser(&self) -> clap::Command {
        clap::Command::new("create-config")
            .about("Create a standard config file that can be used with the -c option")
            .arg(
                Arg::new("file")
                    .short('f')
                    .long("file")
                    .help("File to write to")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .default_value("config.toml"),
            )
            .arg(
                Arg::new("no-include-plugins")
                    .long("no-include-plugins")
                    .help("Do not include the list of installed plugins")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("no-include-config-constants")
                    .long("no-include-config-constants")
                    .help("Do not include the config constant tables of installed plugins")
                    .action(ArgAction::SetTrue),
            )
    }

    fn run(&self, args: &ArgMatches, _session: &mut Session) -> CommandResult {
        let file = args
            .get_one::<PathBuf>("file")
            .expect("file has a default value");
        write_config_file(
            file,
            !args.get_flag("no-include-plugins"),
            !args.get_flag("no-include-config-constants"),
            &self.available,
        )
    }
}

/// Write the sample input script loadable with the `input` command.
pub struct CreateInput;

impl ChainCommand for CreateInput {
    fn parser(&self) -> clap::Command {
        clap::Command::new("create-input")
            .about("Create a sample input script that can be loaded with the input command")
            .arg(
                Arg::new("file")
                    .short('f')
                    .long("file")
                    .help("File to write to")
                    .value_name("FILE")
                    .value_parser(value_parser!(PathBuf))
                    .default_value("input.toml"),
            )
    }

    fn run(&self, args: &ArgMatches, _session: &mut Session) -> CommandResult {
        let file = args
            .get_one::<PathBuf>("file")
            .expect("file has a default value");
        write_input_file(file)
    }
}

/// Scaffold a simulation project directory.
pub struct CreateProject {
    available: Vec<PluginDescriptor>,
}

impl CreateProject {
    pub fn new(available: Vec<PluginDescriptor>) -> Self {
        Self { available }
    }
}

impl ChainCommand for CreateProject {
    fn parser(&self) -> clap::Command {
        clap::Command::new("create-project")
            .about("Create a new simulation project directory with config.toml and input.toml")
            .long_about(
                "Creates a new simulation project in the directory given by -d/--dir.\n\
                 The directory is created if it does not exist. This is a shortcut for\n\
                 running create-config and create-input against that directory.",
            )
            .arg(
                Arg::new("dir")
                    .short('d')
                    .long("dir")
                    .help("Path to the project directory")
                    .value_name("DIR")
                    .value_parser(value_parser!(PathBuf))
                    .default_value("."),
            )
    }

    fn run(&self, args: &ArgMatches, _session: &mut Session) -> CommandResult {
        let dir = args
            .get_one::<PathBuf>("dir")
            .expect("dir has a default value");

        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create project directory '{}'", dir.display()))?;

        write_config_file(&dir.join("config.toml"), true, true, &self.available)?;
        write_input_file(&dir.join("input.toml"))?;

        info!("Created project in: {}", dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MergedConfig;
    use crate::plugin::PluginHost;
    use tempfile::TempDir;

    fn available() -> Vec<PluginDescriptor> {
        PluginHost::builtin().available()
    }

    #[test]
    fn config_file_lists_plugins_and_constants() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        write_config_file(&path, true, true, &available()).unwrap();

        let written: toml::Table = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written["rollmill"]["plugins"][0].as_str(),
            Some(builtin::REPORT)
        );
        assert!(written["rollmill"]["core"]
            .as_table()
            .unwrap()
            .contains_key("DEFAULT_MAX_ITERATION_COUNT"));
    }

    #[test]
    fn excludes_are_honored() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        write_config_file(&path, false, false, &available()).unwrap();

        let written: toml::Table = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let mill = written["rollmill"].as_table().unwrap();
        assert_eq!(mill["plugins"].as_array().unwrap().len(), 0);
        assert!(!mill.contains_key("core"));
    }

    #[test]
    fn create_project_materializes_both_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("proj");
        let command = CreateProject::new(available());
        let matches = command
            .parser()
            .get_matches_from(["create-project", "-d", dir.to_str().unwrap()]);
        let mut session = Session::new(MergedConfig::default());
        command.run(&matches, &mut session).unwrap();

        assert!(dir.join("config.toml").exists());
        assert!(dir.join("input.toml").exists());
    }
}
