//! shell command - interactive read-eval-print loop
//!
//! Each accepted line is tokenized into a subcommand chain and handed to the
//! dispatcher with the *same* session as every previous line: an `input` on
//! one line makes data visible to a `solve` on a later line. Setup (config
//! merge, plugin activation, propagation) ran once at process start and is
//! never repeated here.
//!
//! The loop terminates on the `exit` command or end-of-input. A failed chain
//! is reported and the loop continues; only the solve precondition failure
//! still terminates the whole process.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgMatches};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::dispatch::{CommandError, CommandResult, Dispatcher};
use crate::core::session::Session;
use crate::ui::output;

pub const NAME: &str = "shell";

/// Argument parser for the shell command.
pub fn parser() -> clap::Command {
    clap::Command::new(NAME)
        .about("Open a shell (REPL) for interactive usage; state is kept between lines")
        .arg(
            Arg::new("history-file")
                .long("history-file")
                .help("File to read/write the shell history to")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
}

/// Run the interactive loop against the existing session.
pub fn run(dispatcher: &Dispatcher, args: &ArgMatches, session: &mut Session) -> CommandResult {
    let history = args
        .get_one::<PathBuf>("history-file")
        .cloned()
        .unwrap_or_else(|| dispatcher.paths().history_path());

    println!(
        "Launching interactive shell mode.\n\
         Enter subcommands as you wish, state is maintained between evaluations.\n\
         Global options (-c/--config-file, -p/--plugin, ...) do not work from here;\n\
         specify them when launching `rollmill shell`.\n\n\
         Type 'exit' to leave the shell."
    );

    let mut editor = DefaultEditor::new()
        .map_err(|err| anyhow::anyhow!("failed to initialize the line editor: {err}"))?;

    if history.exists() {
        // A corrupt or unreadable history file is not worth dying over.
        let _ = editor.load_history(&history);
    } else if let Some(parent) = history.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    loop {
        let line = match editor.readline("rollmill> ") {
            Ok(line) => line,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(err) => return Err(anyhow::anyhow!("readline error: {err}").into()),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let _ = editor.add_history_entry(line);
        let _ = editor.append_history(&history);

        let tokens = tokenize(line);
        if tokens.first().map(String::as_str) == Some("exit") {
            break;
        }

        match dispatcher.run_chain(&tokens, session, true) {
            Ok(()) => {}
            Err(CommandError::Aborted) => {}
            Err(fatal @ CommandError::Fatal(_)) => return Err(fatal),
            Err(CommandError::Failed(err)) => output::error(format!("{err:#}")),
        }
    }

    Ok(())
}

/// Split a shell line into tokens, honoring single and double quotes.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                } else {
                    current.push(ch);
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if in_token {
        tokens.push(current);
    }

    tokens
}
