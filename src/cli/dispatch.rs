//! cli::dispatch
//!
//! Chain-capable command dispatch.
//!
//! Tokens after the global flags are segmented into subcommand invocations: a
//! token matching a registered command name opens a new segment, everything
//! else belongs to the segment in progress. Each segment is parsed by the
//! command's own clap parser and run against the shared session; the first
//! failure aborts the remaining chain.
//!
//! The `shell` command is handled by the dispatcher itself because it re-enters
//! the dispatcher for every line (see [`crate::cli::commands::shell`]).

use anyhow::bail;
use thiserror::Error;

use crate::cli::commands::{shell, CommandRegistry};
use crate::core::paths::AppPaths;
use crate::core::session::Session;

/// Outcome classes of a subcommand.
///
/// `Fatal` terminates the process with a non-zero status even when raised
/// inside the interactive shell. `Aborted` is the clean stop used when the
/// operator declines a confirmation. `Failed` aborts the remaining chain; at
/// the top level it yields a non-zero exit, inside the shell it is reported
/// and the loop continues.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Fatal(String),

    #[error("aborted")]
    Aborted,

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

pub type CommandResult = Result<(), CommandError>;

/// One resolved subcommand invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub args: Vec<String>,
}

/// Runs subcommand chains against a shared session.
pub struct Dispatcher {
    registry: CommandRegistry,
    paths: AppPaths,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, paths: AppPaths) -> Self {
        Self { registry, paths }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    fn is_known(&self, name: &str) -> bool {
        name == shell::NAME || self.registry.contains(name)
    }

    /// Split raw tokens into an ordered list of subcommand segments.
    pub fn resolve_chain(&self, tokens: &[String]) -> anyhow::Result<Vec<Segment>> {
        let mut segments: Vec<Segment> = Vec::new();
        for token in tokens {
            if self.is_known(token) {
                segments.push(Segment {
                    name: token.clone(),
                    args: Vec::new(),
                });
            } else if let Some(current) = segments.last_mut() {
                current.args.push(token.clone());
            } else {
                bail!("unknown command '{token}'; see 'rollmill --help'");
            }
        }
        Ok(segments)
    }

    /// Resolve and run a chain of subcommands against the session.
    ///
    /// Commands run strictly in order; the first error aborts the remainder.
    pub fn run_chain(
        &self,
        tokens: &[String],
        session: &mut Session,
        in_shell: bool,
    ) -> CommandResult {
        let segments = self.resolve_chain(tokens).map_err(CommandError::Failed)?;
        for segment in segments {
            self.run_segment(&segment, session, in_shell)?;
        }
        Ok(())
    }

    fn run_segment(
        &self,
        segment: &Segment,
        session: &mut Session,
        in_shell: bool,
    ) -> CommandResult {
        if segment.name == shell::NAME {
            if in_shell {
                return Err(anyhow::anyhow!("already inside the shell").into());
            }
            let matches = match self.parse_segment(shell::parser(), segment)? {
                Some(matches) => matches,
                None => return Ok(()),
            };
            return shell::run(self, &matches, session);
        }

        let command = self
            .registry
            .get(&segment.name)
            .ok_or_else(|| anyhow::anyhow!("unknown command '{}'", segment.name))?;
        let matches = match self.parse_segment(command.parser(), segment)? {
            Some(matches) => matches,
            None => return Ok(()),
        };
        command.run(&matches, session)
    }

    /// Parse a segment's arguments with the command's own parser.
    ///
    /// Returns `Ok(None)` when clap already handled the invocation itself
    /// (`--help`/`--version`).
    fn parse_segment(
        &self,
        parser: clap::Command,
        segment: &Segment,
    ) -> Result<Option<clap::ArgMatches>, CommandError> {
        let argv = std::iter::once(segment.name.clone()).chain(segment.args.iter().cloned());
        match parser.try_get_matches_from(argv) {
            Ok(matches) => Ok(Some(matches)),
            Err(err)
                if matches!(
                    err.kind(),
                    clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
                ) =>
            {
                let _ = err.print();
                Ok(None)
            }
            Err(err) => Err(CommandError::Failed(err.into())),
        }
    }

    /// One-line-per-command overview for the top-level help text.
    pub fn command_overview(&self) -> String {
        let mut lines: Vec<String> = self
            .registry
            .parsers()
            .map(|parser| {
                let about = parser
                    .get_about()
                    .map(|about| about.to_string())
                    .unwrap_or_default();
                format!("  {:<16}{}", parser.get_name(), about)
            })
            .collect();
        lines.push(format!(
            "  {:<16}{}",
            shell::NAME,
            "Open an interactive shell (REPL) for chained commands"
        ));
        lines.sort();
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{register_builtins, CommandRegistry};
    use crate::core::config::MergedConfig;
    use crate::core::templates::SAMPLE_INPUT;
    use crate::plugin::{builtin, PluginHost};
    use tempfile::TempDir;

    fn dispatcher() -> Dispatcher {
        let mut host = PluginHost::builtin();
        let mut registry = CommandRegistry::new();
        host.activate(
            &[builtin::CORE.to_string(), builtin::REPORT.to_string()],
            &mut registry,
        )
        .unwrap();
        register_builtins(&mut registry, &host).unwrap();
        Dispatcher::new(registry, AppPaths::new(std::env::temp_dir().join("rollmill")))
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    #[test]
    fn chain_splits_on_command_names() {
        let dispatcher = dispatcher();
        let segments = dispatcher
            .resolve_chain(&tokens(&["input", "-f", "in.toml", "solve", "report"]))
            .unwrap();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].name, "input");
        assert_eq!(segments[0].args, vec!["-f", "in.toml"]);
        assert_eq!(segments[1].name, "solve");
        assert!(segments[1].args.is_empty());
        assert_eq!(segments[2].name, "report");
    }

    #[test]
    fn leading_unknown_token_is_an_error() {
        let dispatcher = dispatcher();
        assert!(dispatcher.resolve_chain(&tokens(&["frobnicate"])).is_err());
    }

    #[test]
    fn state_persists_across_chain_and_later_invocations() {
        let dispatcher = dispatcher();
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.toml");
        std::fs::write(&input, SAMPLE_INPUT).unwrap();

        let mut session = Session::new(MergedConfig::default());
        dispatcher
            .run_chain(
                &tokens(&["input", "-f", input.to_str().unwrap(), "solve"]),
                &mut session,
                false,
            )
            .unwrap();
        assert!(session.is_loaded());

        // A later independent solve reuses the loaded state.
        dispatcher
            .run_chain(&tokens(&["solve"]), &mut session, false)
            .unwrap();
    }

    #[test]
    fn solve_on_fresh_session_is_fatal() {
        let dispatcher = dispatcher();
        let mut session = Session::new(MergedConfig::default());
        let result = dispatcher.run_chain(&tokens(&["solve"]), &mut session, false);
        assert!(matches!(result, Err(CommandError::Fatal(_))));
    }

    #[test]
    fn failure_aborts_remaining_chain() {
        let dispatcher = dispatcher();
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");
        let sample = temp.path().join("input.toml");
        std::fs::write(&sample, SAMPLE_INPUT).unwrap();

        let mut session = Session::new(MergedConfig::default());
        // The failing `input` must prevent the later `input` from running.
        let result = dispatcher.run_chain(
            &tokens(&[
                "input",
                "-f",
                missing.to_str().unwrap(),
                "input",
                "-f",
                sample.to_str().unwrap(),
            ]),
            &mut session,
            false,
        );
        assert!(matches!(result, Err(CommandError::Failed(_))));
        assert!(!session.is_loaded());
    }

    #[test]
    fn overview_mentions_shell_and_builtins() {
        let dispatcher = dispatcher();
        let overview = dispatcher.command_overview();
        assert!(overview.contains("input"));
        assert!(overview.contains("solve"));
        assert!(overview.contains("shell"));
        assert!(overview.contains("report"));
    }
}
