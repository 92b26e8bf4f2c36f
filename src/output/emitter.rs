//! Result emitter.
//!
//! Prints one URL per reachable target on the primary output surface,
//! filtered by scheme and deduplicated on the printed line.

use crate::progress::{lock, Console};
use crate::scanner::{Classification, OutcomeHandler, ScanOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Which classifications get printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeFilter {
    #[default]
    All,
    EncryptedOnly,
    PlaintextOnly,
}

impl SchemeFilter {
    /// Filter implied by the `--https` / `--http` flags.
    pub fn from_flags(only_https: bool, only_http: bool) -> Self {
        match (only_https, only_http) {
            (true, false) => Self::EncryptedOnly,
            (false, true) => Self::PlaintextOnly,
            _ => Self::All,
        }
    }

    pub fn accepts(self, classification: Classification) -> bool {
        match (self, classification) {
            (_, Classification::Unreachable) => false,
            (Self::All, _) => true,
            (Self::EncryptedOnly, c) => c == Classification::Encrypted,
            (Self::PlaintextOnly, c) => c == Classification::Plaintext,
        }
    }
}

impl fmt::Display for SchemeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::EncryptedOnly => write!(f, "https only"),
            Self::PlaintextOnly => write!(f, "http only"),
        }
    }
}

/// Prints accepted outcomes at most once per display line.
pub struct ResultEmitter {
    filter: SchemeFilter,
    /// Lines already printed. Also serializes the writes themselves.
    ledger: Mutex<HashSet<String>>,
    console: Arc<dyn Console>,
}

impl ResultEmitter {
    pub fn new(filter: SchemeFilter, console: Arc<dyn Console>) -> Self {
        Self {
            filter,
            ledger: Mutex::new(HashSet::new()),
            console,
        }
    }

    /// Print `outcome` if it passes the filter and was not printed before.
    ///
    /// Returns whether a line was written.
    pub fn emit(&self, outcome: &ScanOutcome) -> bool {
        if !self.filter.accepts(outcome.classification) {
            return false;
        }
        let Some(line) = outcome.url() else {
            return false;
        };

        let mut ledger = lock(&self.ledger);
        if ledger.contains(&line) {
            return false;
        }
        self.console.write_out(&format!("{}\n", line));
        ledger.insert(line);
        true
    }

    /// Number of distinct lines printed so far.
    pub fn printed(&self) -> usize {
        lock(&self.ledger).len()
    }
}

impl OutcomeHandler for ResultEmitter {
    fn handle(&self, outcome: ScanOutcome) {
        if let Some(error) = &outcome.error {
            debug!(endpoint = %outcome.target, %error, "no responder");
        }
        self.emit(&outcome);
    }
}
