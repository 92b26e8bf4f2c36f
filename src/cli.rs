//! Command-line interface definitions for tlscan.
//!
//! Uses `clap` derive macros for declarative argument parsing.

use crate::catalog::InputSource;
use crate::config::{AppSettings, ScanOptions};
use crate::error::{ConfigResult, InputError, InputResult};
use crate::output::SchemeFilter;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Probe targets at the specified port for HTTPS/HTTP support and print a
/// URL if a connection can be established.
///
/// Input format is "host,port" or "ip,host,port", one target per line.
#[derive(Parser, Debug)]
#[command(name = "tlscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Probe targets for HTTPS/HTTP support", long_about = None)]
pub struct Args {
    /// Targets given directly, newline separated (stdin has precedence)
    #[arg(short = 't', long, value_name = "TARGETS")]
    pub target: Option<String>,

    /// File with a list of targets, one per line (stdin has precedence)
    #[arg(short = 'l', long = "target-list", value_name = "FILE")]
    pub target_list: Option<PathBuf>,

    /// Seconds to wait for a whole probe exchange to complete
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<f64>,

    /// Number of concurrent probes
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Output only TLS-enabled servers
    #[arg(long, conflicts_with = "http")]
    pub https: bool,

    /// Output only non-TLS-enabled servers
    #[arg(long)]
    pub http: bool,

    /// Custom User-Agent for probe requests
    #[arg(short = 'u', long = "user-agent", value_name = "UA")]
    pub user_agent: Option<String>,

    /// Do not colorize output
    #[arg(long)]
    pub no_color: bool,

    /// Do not show a progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Enable verbose output (per-probe failures)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a custom settings file
    #[arg(long, value_name = "PATH", env = "TLSCAN_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Merge settings and flags into the options for this run.
    pub fn options(&self) -> ConfigResult<ScanOptions> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };

        let mut options = ScanOptions::from_settings(&settings)
            .with_filter(SchemeFilter::from_flags(self.https, self.http));

        if let Some(secs) = self.timeout {
            options = options.with_timeout_secs(secs)?;
        }
        if let Some(concurrency) = self.concurrency {
            options = options.with_concurrency(concurrency);
        }
        if let Some(user_agent) = &self.user_agent {
            options = options.with_user_agent(user_agent.clone());
        }
        if self.no_color {
            options = options.without_color();
        }
        if self.no_progress {
            options = options.without_progress();
        }

        options.validate()?;
        Ok(options)
    }

    /// Pick the input source: piped stdin, then literal targets, then a file.
    pub fn input_source(&self) -> InputResult<InputSource> {
        select_source(
            stdin_is_piped(),
            self.target.as_deref(),
            self.target_list.as_deref(),
        )
    }

    /// Default log filter for the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "tlscan=debug,info"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}

/// Whether stdin is a pipe. Redirected files, `/dev/null` and terminals
/// are not treated as input.
#[cfg(unix)]
fn stdin_is_piped() -> bool {
    is_fifo(Path::new("/dev/stdin"))
}

#[cfg(not(unix))]
fn stdin_is_piped() -> bool {
    use std::io::IsTerminal;
    !std::io::stdin().is_terminal()
}

#[cfg(unix)]
fn is_fifo(path: &Path) -> bool {
    use std::os::unix::fs::FileTypeExt;
    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_fifo())
        .unwrap_or(false)
}

fn select_source(
    has_stdin: bool,
    target: Option<&str>,
    target_list: Option<&Path>,
) -> InputResult<InputSource> {
    if has_stdin {
        return Ok(InputSource::Stdin);
    }
    if let Some(text) = target.filter(|t| !t.is_empty()) {
        return Ok(InputSource::Literal(text.to_string()));
    }
    if let Some(path) = target_list {
        let meta = std::fs::metadata(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(InputError::NotAFile(path.to_path_buf()));
        }
        return Ok(InputSource::File(path.to_path_buf()));
    }
    Err(InputError::Missing)
}
