//! Detector trait abstraction.
//!
//! Defines the interface every protocol detector implements, along with
//! the outcome types that flow from the engine to the output layer.

use crate::error::ProbeError;
use crate::types::Target;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URL scheme reported for a reachable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Https,
    Http,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport capability detected for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// An HTTP exchange completed over TLS.
    Encrypted,
    /// TLS failed but a plaintext HTTP exchange completed.
    Plaintext,
    /// Neither attempt completed.
    Unreachable,
}

impl Classification {
    /// Scheme to print, or `None` when nothing answered.
    pub fn scheme(self) -> Option<Scheme> {
        match self {
            Self::Encrypted => Some(Scheme::Https),
            Self::Plaintext => Some(Scheme::Http),
            Self::Unreachable => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encrypted => write!(f, "encrypted"),
            Self::Plaintext => write!(f, "plaintext"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Result of probing one target. Created once, never mutated.
#[derive(Debug)]
pub struct ScanOutcome {
    pub target: Target,
    pub classification: Classification,
    pub error: Option<ProbeError>,
}

impl ScanOutcome {
    /// A successful detection.
    pub fn detected(target: Target, classification: Classification) -> Self {
        Self {
            target,
            classification,
            error: None,
        }
    }

    /// A target that could not be classified.
    pub fn unreachable(target: Target, error: ProbeError) -> Self {
        Self {
            target,
            classification: Classification::Unreachable,
            error: Some(error),
        }
    }

    /// Display line for this outcome, if it is reachable.
    pub fn url(&self) -> Option<String> {
        self.classification
            .scheme()
            .map(|scheme| self.target.url(scheme.as_str()))
    }
}

/// Trait for protocol detector implementations.
///
/// Implementations must absorb every per-target failure into the returned
/// outcome; the engine never sees an error from `detect`.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Classify a single target.
    async fn detect(&self, target: Target) -> ScanOutcome;
}

/// Receives outcomes as scan tasks complete.
///
/// Called concurrently from many tasks, in completion order.
pub trait OutcomeHandler: Send + Sync {
    fn handle(&self, outcome: ScanOutcome);
}
