//! Colored diagnostics on standard error.
//!
//! Standard output belongs to the wrapped command, so everything errwarn
//! says itself goes to standard error.

use std::io::{self, Write};

use owo_colors::OwoColorize;

/// Prefix of every diagnostic line.
const PREFIX: &str = "errwarn:";

/// Print an error message.
pub fn print_error(message: &str) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{} {} {message}",
        PREFIX.bold(),
        "error:".red().bold(),
    );
    let _ = stderr.flush();
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{} {} {message}",
        PREFIX.bold(),
        "warning:".yellow().bold(),
    );
    let _ = stderr.flush();
}
