//! HTTP(S) protocol detector.
//!
//! Attempts a request over TLS first and falls back to plaintext HTTP on
//! the same host and port. Any completed exchange counts, whatever the
//! status code, and certificates are never validated.

use crate::error::ProbeError;
use crate::progress::lock;
use crate::scanner::traits::{Classification, Detector, ScanOutcome, Scheme};
use crate::types::Target;
use async_trait::async_trait;
use reqwest::header::{CONNECTION, HOST};
use reqwest::{redirect, Client, ClientBuilder};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Default User-Agent sent with every probe.
pub const DEFAULT_USER_AGENT: &str = concat!("tlscan/", env!("CARGO_PKG_VERSION"));

/// Pinned clients kept for reuse before the cache is reset.
const PINNED_CLIENT_LIMIT: usize = 256;

/// Settings shared by every probe.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Budget for a whole exchange: connect, handshake, request and body.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DetectorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Detects HTTPS/HTTP responders with reqwest.
///
/// Targets without a literal IP share one client. Targets with an IP get
/// a client whose resolver pins the hostname to that IP, so the hostname
/// still drives SNI and the URL. Building one loads a fresh TLS config, so
/// pinned clients are cached per hostname and IP (the resolver ignores the
/// port) up to [`PINNED_CLIENT_LIMIT`].
pub struct HttpDetector {
    config: DetectorConfig,
    client: Client,
    pinned: Mutex<HashMap<(String, IpAddr), Client>>,
}

impl HttpDetector {
    /// Create a detector. Fails only if the TLS backend cannot initialise.
    pub fn new(config: DetectorConfig) -> Result<Self, ProbeError> {
        let client = client_builder(&config).build()?;
        Ok(Self {
            config,
            client,
            pinned: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    fn client_for(&self, target: &Target) -> Result<Client, ProbeError> {
        let Some(addr) = target.pinned_addr().map_err(ProbeError::InvalidAddress)? else {
            return Ok(self.client.clone());
        };

        let key = (target.host().to_string(), addr.ip());
        if let Some(client) = lock(&self.pinned).get(&key) {
            return Ok(client.clone());
        }

        let client = client_builder(&self.config)
            .resolve(target.host(), addr)
            .build()?;
        let mut pinned = lock(&self.pinned);
        if pinned.len() >= PINNED_CLIENT_LIMIT {
            pinned.clear();
        }
        pinned.insert(key, client.clone());
        Ok(client)
    }

    /// Number of pinned clients currently cached.
    pub fn pinned_clients(&self) -> usize {
        lock(&self.pinned).len()
    }

    /// Run one request and drain the body. `Ok` means an HTTP exchange completed.
    async fn attempt(
        &self,
        client: &Client,
        scheme: Scheme,
        target: &Target,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/", target.url(scheme.as_str()));
        let mut request = client.get(url).header(CONNECTION, "close");
        if target.ip().is_some() {
            request = request.header(HOST, target.host_header());
        }

        let mut response = request.send().await?;
        // The body is irrelevant; a failed drain does not undo the exchange.
        // Chunks are dropped as they arrive so large bodies are never held.
        while let Ok(Some(_)) = response.chunk().await {}
        Ok(())
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn detect(&self, target: Target) -> ScanOutcome {
        let client = match self.client_for(&target) {
            Ok(client) => client,
            Err(e) => return ScanOutcome::unreachable(target, e),
        };

        match self.attempt(&client, Scheme::Https, &target).await {
            Ok(()) => return ScanOutcome::detected(target, Classification::Encrypted),
            Err(e) => debug!(endpoint = %target, error = %e, "https attempt failed"),
        }

        match self.attempt(&client, Scheme::Http, &target).await {
            Ok(()) => ScanOutcome::detected(target, Classification::Plaintext),
            Err(e) => {
                debug!(endpoint = %target, error = %e, "http attempt failed");
                ScanOutcome::unreachable(target, ProbeError::NoResponder)
            }
        }
    }
}

fn client_builder(config: &DetectorConfig) -> ClientBuilder {
    Client::builder()
        .danger_accept_invalid_certs(true)
        .redirect(redirect::Policy::none())
        .timeout(config.timeout)
        .pool_max_idle_per_host(0)
        .user_agent(config.user_agent.as_str())
}
