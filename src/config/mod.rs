//! Configuration management for tlscan.
//!
//! Built-in defaults are overridden by an optional XDG settings file,
//! which is in turn overridden by command-line flags.

mod options;
mod settings;

pub use options::ScanOptions;
pub use settings::{AppSettings, Paths};
