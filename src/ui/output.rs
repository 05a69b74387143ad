//! ui::output
//!
//! Plain output helpers for messages that must reach the operator even
//! before (or without) the logging subsystem.

use std::fmt::Display;

/// Print an error message.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print an informational message.
pub fn note(message: impl Display) {
    println!("{}", message);
}
