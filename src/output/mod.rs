//! Output module.
//!
//! Results go to stdout through the [`ResultEmitter`]; the helpers below
//! format the few messages printed outside the logging pipeline.

mod emitter;

pub use emitter::{ResultEmitter, SchemeFilter};

use console::style;

/// Print a fatal error to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").for_stderr().red().bold(), msg);
}

/// Format a count for log lines, bold when colours are enabled.
pub fn highlight(count: impl std::fmt::Display) -> String {
    style(count).for_stderr().bold().to_string()
}
