//! `tracing` writer that routes log events through a [`Console`].

use super::console::Console;
use std::io;
use std::sync::Arc;

/// Sends formatted log events to the console's diagnostic surface.
///
/// The fmt subscriber formats a whole event before writing it, so each
/// event arrives here in one piece.
#[derive(Clone)]
pub struct ConsoleWriter {
    console: Arc<dyn Console>,
}

impl ConsoleWriter {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self { console }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.console.write_err(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::console::tests::SharedBuf;
    use crate::progress::BufferedConsole;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn test_events_land_in_capture() {
        let err = SharedBuf::default();
        let console = Arc::new(BufferedConsole::new(
            Box::new(SharedBuf::default()),
            Box::new(err.clone()),
        ));
        console.begin_capture();

        let subscriber = tracing_subscriber::fmt()
            .with_writer(ConsoleWriter::new(console.clone()))
            .without_time()
            .with_target(false)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("Unsupported input format: x");
        });

        assert!(err.contents().is_empty());
        let (_, captured) = console.take_captured().unwrap();
        assert!(captured.contains("WARN"));
        assert!(captured.ends_with("Unsupported input format: x\n"));
    }

    #[test]
    fn test_make_writer_shares_console() {
        let err = SharedBuf::default();
        let console = Arc::new(BufferedConsole::new(
            Box::new(SharedBuf::default()),
            Box::new(err.clone()),
        ));
        let writer = ConsoleWriter::new(console);
        io::Write::write_all(&mut writer.make_writer(), b"hello\n").unwrap();
        assert_eq!(err.contents(), "hello\n");
    }
}
