//! ui::prompts
//!
//! Interactive confirmations.

use std::io::{self, Write};

/// Prompt for confirmation (yes/no).
///
/// Returns `Ok(true)` if the operator confirms, `Ok(false)` if they decline.
/// End-of-input counts as declining.
pub fn confirm(message: &str) -> io::Result<bool> {
    print!("{message} [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
