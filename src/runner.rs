//! Wires options, input, detection and output together for one run.

use crate::catalog::Catalog;
use crate::cli::Args;
use crate::output::{highlight, ResultEmitter};
use crate::progress::{
    BufferedConsole, Console, ConsoleWriter, DirectConsole, Multiplexer, NoopProgress, Progress,
};
use crate::scanner::{HttpDetector, ScanEngine};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Execute a scan as described by `args`.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let options = args.options().context("invalid configuration")?;

    if !options.color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // The multiplexer only makes sense when someone is watching stderr.
    let stderr_is_term = console::Term::stderr().is_term();
    let interactive = options.progress && stderr_is_term;
    let (console, progress) = if interactive {
        let buffered = Arc::new(BufferedConsole::stdio());
        let progress = Arc::new(Multiplexer::new(Arc::clone(&buffered)));
        (buffered as Arc<dyn Console>, progress as Arc<dyn Progress>)
    } else {
        (
            Arc::new(DirectConsole) as Arc<dyn Console>,
            Arc::new(NoopProgress) as Arc<dyn Progress>,
        )
    };

    init_logging(
        args.log_level(),
        log_ansi(options.color, stderr_is_term),
        Arc::clone(&console),
    );

    let source = args.input_source()?;
    let mut catalog = Catalog::load(source).await?;
    match catalog.total() {
        Some(0) => {
            warn!("No valid targets supplied.");
            return Ok(());
        }
        Some(total) => info!("Processing {} hosts.", highlight(total)),
        None => info!("Processing hosts from standard input."),
    }

    let detector = HttpDetector::new(options.detector_config())
        .context("could not initialise the HTTP client")?;
    let engine = ScanEngine::new(detector, Arc::clone(&progress), options.concurrency);
    let emitter = Arc::new(ResultEmitter::new(options.filter, Arc::clone(&console)));

    progress.start(catalog.total());
    let result = engine.run(&mut catalog, Arc::clone(&emitter)).await;
    progress.finish().await;
    let summary = result.context("failed to read targets")?;

    if !catalog.count_known() && catalog.duplicates() > 0 {
        info!(
            "Supplied input was automatically deduplicated ({} removed).",
            catalog.duplicates()
        );
    }
    info!(
        "Done: {} https, {} http, {} unreachable ({} printed).",
        highlight(summary.encrypted),
        highlight(summary.plaintext),
        summary.unreachable + summary.failed,
        emitter.printed()
    );

    Ok(())
}

/// Escape codes in log lines only when colour is on and stderr is a terminal.
fn log_ansi(color: bool, stderr_is_term: bool) -> bool {
    color && stderr_is_term
}

/// Install the global subscriber, writing through `console`.
fn init_logging(level: &str, ansi: bool, console: Arc<dyn Console>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleWriter::new(console))
        .with_ansi(ansi)
        .without_time()
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirected_stderr_gets_plain_logs() {
        assert!(log_ansi(true, true));
        assert!(!log_ansi(true, false));
        assert!(!log_ansi(false, true));
    }
}
