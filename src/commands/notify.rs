//! One-line success and error notices on the terminal

use colored::Colorize;

use crate::error::user_message;

/// Print a success notice to stdout.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an informational notice to stdout.
pub fn info(message: &str) {
    println!("{} {}", "•".cyan(), message);
}

/// Log `err` and print its user-facing message to stderr.
///
/// Returns the printed message.
pub fn error(err: &anyhow::Error, fallback: &str) -> String {
    tracing::error!(error = %err, "{}", fallback);
    let message = user_message(err, fallback);
    eprintln!("{} {}", "✗".red().bold(), message.red());
    message
}
