//! # tlscan - HTTPS/HTTP endpoint detection at scale
//!
//! tlscan takes a list of `host,port` or `ip,host,port` targets, probes each
//! one for an HTTP responder over TLS and then over plaintext, and prints
//! `https://host:port` or `http://host:port` for whatever answered.
//!
//! ## Features
//!
//! - **Bounded concurrency**: a fixed number of probes in flight, with backpressure
//! - **Virtual hosts**: probe a literal IP while presenting the hostname as SNI and `Host`
//! - **Lenient detection**: any TLS handshake and any status code count, redirects are not followed
//! - **Live progress**: a progress bar that coexists with concurrent log output
//! - **Deduplication**: of input targets and of printed URLs
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tlscan::catalog::{Catalog, InputSource};
//! use tlscan::output::{ResultEmitter, SchemeFilter};
//! use tlscan::progress::{DirectConsole, NoopProgress};
//! use tlscan::scanner::{DetectorConfig, HttpDetector, ScanEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut catalog = Catalog::load(InputSource::Literal("example.com,443".into())).await?;
//!     let detector = HttpDetector::new(DetectorConfig::default())?;
//!     let engine = ScanEngine::new(detector, Arc::new(NoopProgress), 20);
//!     let emitter = Arc::new(ResultEmitter::new(SchemeFilter::All, Arc::new(DirectConsole)));
//!
//!     engine.run(&mut catalog, emitter).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - the parsed [`Target`]
//! - [`catalog`] - input enumeration, counting and deduplication
//! - [`scanner`] - the detector trait, the HTTP(S) detector and the scan engine
//! - [`progress`] - console sinks and the live progress multiplexer
//! - [`output`] - filtered, deduplicated result printing
//! - [`config`] - scan options and the settings file
//! - [`error`] - error types

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod progress;
pub mod runner;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{ConfigError, InputError, ProbeError};
pub use scanner::{Classification, Detector, ScanEngine, ScanOutcome};
pub use types::{Target, TargetError};
