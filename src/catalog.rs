//! Target catalog.
//!
//! Turns raw input lines into deduplicated [`Target`]s. Rewindable sources
//! (files, literal strings) are read twice: a counting pass that fixes the
//! total before any probe starts, then a yielding pass. Streams such as
//! piped stdin are yielded as they arrive with an unknown total.

use crate::error::{InputError, InputResult};
use crate::types::{Target, TargetError};
use std::collections::HashSet;
use std::io::{self, Cursor, SeekFrom};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncSeek, AsyncSeekExt, BufReader};
use tracing::{info, warn};

type LineReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// Where target lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Piped standard input (cannot be rewound).
    Stdin,
    /// Targets given directly on the command line, newline separated.
    Literal(String),
    /// A file with one target per line.
    File(PathBuf),
}

/// What happened to a single input line.
#[derive(Debug)]
enum Admission {
    Blank,
    Malformed(TargetError),
    Duplicate,
    Fresh(Target),
}

/// Parse and deduplication state shared by both passes.
#[derive(Debug, Default)]
struct Dedup {
    seen: HashSet<String>,
    duplicates: u64,
    malformed: u64,
}

impl Dedup {
    fn admit(&mut self, line: &[u8]) -> Admission {
        if line.is_empty() {
            return Admission::Blank;
        }
        let target = match Target::parse_bytes(line) {
            Ok(target) => target,
            Err(e) => {
                self.malformed += 1;
                return Admission::Malformed(e);
            }
        };
        if !self.seen.insert(target.canonical_key()) {
            self.duplicates += 1;
            return Admission::Duplicate;
        }
        Admission::Fresh(target)
    }
}

/// Counts gathered by the counting pass of a rewindable source.
#[derive(Debug, Clone, Copy)]
struct Tally {
    total: u64,
    duplicates: u64,
    malformed: u64,
}

/// Read one line into `buf` without its `\n` or `\r\n` terminator.
///
/// Returns `false` at end of input. Content is not decoded here.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

/// Lazily yields unique, well-formed targets.
pub struct Catalog {
    reader: LineReader,
    line: Vec<u8>,
    dedup: Dedup,
    tally: Option<Tally>,
}

impl Catalog {
    /// Open `source` and, when it can be rewound, count its targets.
    pub async fn load(source: InputSource) -> InputResult<Self> {
        match source {
            InputSource::Stdin => Ok(Self::streaming(BufReader::new(tokio::io::stdin()))),
            InputSource::Literal(text) => Self::counted(Cursor::new(text.into_bytes())).await,
            InputSource::File(path) => {
                let file = File::open(&path)
                    .await
                    .map_err(|source| InputError::Open { path, source })?;
                Self::counted(BufReader::new(file)).await
            }
        }
    }

    /// Catalog over a live stream; the total is unknown.
    pub fn streaming<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        Self {
            reader: Box::new(reader),
            line: Vec::new(),
            dedup: Dedup::default(),
            tally: None,
        }
    }

    /// Catalog over a rewindable reader: count first, then rewind.
    pub async fn counted<R>(mut reader: R) -> InputResult<Self>
    where
        R: AsyncBufRead + AsyncSeek + Send + Unpin + 'static,
    {
        let mut dedup = Dedup::default();
        let mut total = 0;
        let mut line = Vec::new();
        while read_line(&mut reader, &mut line).await? {
            match dedup.admit(&line) {
                Admission::Fresh(_) => total += 1,
                Admission::Malformed(e) => warn!("{}", e),
                Admission::Blank | Admission::Duplicate => {}
            }
        }

        if dedup.duplicates > 0 {
            info!(
                "Supplied input was automatically deduplicated ({} removed).",
                dedup.duplicates
            );
        }

        reader
            .seek(SeekFrom::Start(0))
            .await
            .map_err(InputError::Rewind)?;

        let mut catalog = Self::streaming(reader);
        catalog.tally = Some(Tally {
            total,
            duplicates: dedup.duplicates,
            malformed: dedup.malformed,
        });
        Ok(catalog)
    }

    /// Whether the total was computed before enumeration.
    pub fn count_known(&self) -> bool {
        self.tally.is_some()
    }

    /// Number of targets that will be yielded, if known up front.
    pub fn total(&self) -> Option<u64> {
        self.tally.map(|t| t.total)
    }

    /// Duplicate lines dropped so far (or in total, for counted input).
    pub fn duplicates(&self) -> u64 {
        self.tally.map_or(self.dedup.duplicates, |t| t.duplicates)
    }

    /// Malformed lines skipped so far (or in total, for counted input).
    pub fn malformed(&self) -> u64 {
        self.tally.map_or(self.dedup.malformed, |t| t.malformed)
    }

    /// Next unique target, or `None` at end of input.
    pub async fn next(&mut self) -> InputResult<Option<Target>> {
        while read_line(&mut self.reader, &mut self.line).await? {
            match self.dedup.admit(&self.line) {
                Admission::Fresh(target) => return Ok(Some(target)),
                // Counted input already reported these lines.
                Admission::Malformed(e) if self.tally.is_none() => warn!("{}", e),
                _ => {}
            }
        }
        Ok(None)
    }
}
