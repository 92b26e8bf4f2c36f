//! Probe target parsing.
//!
//! Input lines take one of two shapes:
//! - `host,port`
//! - `ip,host,port` (probe `ip`, present `host` as SNI and `Host` header)
//!
//! Fields are kept byte-exact; nothing is trimmed or case-folded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// A single endpoint to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    ip: Option<String>,
    host: String,
    port: String,
}

/// Error type for target parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Input line is not valid UTF-8: {0}")]
    NotUtf8(String),
}

impl Target {
    /// Create a target probed through its hostname.
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            ip: None,
            host: host.into(),
            port: port.into(),
        }
    }

    /// Create a target probed through a literal IP on behalf of `host`.
    pub fn with_ip(ip: impl Into<String>, host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            ip: Some(ip.into()),
            host: host.into(),
            port: port.into(),
        }
    }

    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, TargetError> {
        let fields: Vec<&str> = line.split(',').collect();
        match fields.as_slice() {
            [host, port] => Ok(Self::new(*host, *port)),
            [ip, host, port] => Ok(Self::with_ip(*ip, *host, *port)),
            _ => Err(TargetError::UnsupportedFormat(line.to_string())),
        }
    }

    /// Parse one raw input line, rejecting invalid UTF-8.
    pub fn parse_bytes(line: &[u8]) -> Result<Self, TargetError> {
        let line = std::str::from_utf8(line)
            .map_err(|_| TargetError::NotUtf8(String::from_utf8_lossy(line).into_owned()))?;
        Self::parse(line)
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Key used to deduplicate input lines.
    pub fn canonical_key(&self) -> String {
        format!("{}:{}:{}", self.ip.as_deref().unwrap_or(""), self.host, self.port)
    }

    /// URL printed for this target once a scheme has been detected.
    pub fn url(&self, scheme: &str) -> String {
        format!("{}://{}:{}", scheme, self.host, self.port)
    }

    /// Value for the `Host` header when the connection goes to a literal IP.
    ///
    /// The port suffix is omitted for 80 and 443 regardless of scheme.
    pub fn host_header(&self) -> String {
        match self.port.as_str() {
            "80" | "443" => self.host.clone(),
            port => format!("{}:{}", self.host, port),
        }
    }

    /// Socket address to dial instead of resolving the hostname.
    ///
    /// Returns `Ok(None)` when no IP was supplied.
    pub fn pinned_addr(&self) -> Result<Option<SocketAddr>, String> {
        let Some(ip) = self.ip.as_deref() else {
            return Ok(None);
        };
        let ip: IpAddr = ip
            .parse()
            .map_err(|_| format!("'{}' is not an IP address", ip))?;
        let port: u16 = self
            .port
            .parse()
            .map_err(|_| format!("'{}' is not a port number", self.port))?;
        Ok(Some(SocketAddr::new(ip, port)))
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ip {
            Some(ip) => write!(f, "{}:{} ({})", self.host, self.port, ip),
            None => write!(f, "{}:{}", self.host, self.port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_port() {
        let target = Target::parse("example.com,8080").unwrap();
        assert_eq!(target.ip(), None);
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.port(), "8080");
    }

    #[test]
    fn test_parse_ip_host_port() {
        let target: Target = "93.184.216.34,example.com,443".parse().unwrap();
        assert_eq!(target.ip(), Some("93.184.216.34"));
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.port(), "443");
    }

    #[test]
    fn test_parse_rejects_other_field_counts() {
        assert!(Target::parse("example.com").is_err());
        assert!(Target::parse("a,b,c,d").is_err());
        assert_eq!(
            Target::parse("x").unwrap_err().to_string(),
            "Unsupported input format: x"
        );
    }

    #[test]
    fn test_parse_bytes() {
        assert_eq!(
            Target::parse_bytes(b"a.test,80").unwrap(),
            Target::new("a.test", "80")
        );
        assert!(matches!(
            Target::parse_bytes(b"\xff\xfe,81"),
            Err(TargetError::NotUtf8(_))
        ));
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        let target = Target::parse(" host ,80").unwrap();
        assert_eq!(target.host(), " host ");
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(Target::new("h", "80").canonical_key(), ":h:80");
        assert_eq!(Target::with_ip("1.2.3.4", "h", "80").canonical_key(), "1.2.3.4:h:80");
        assert_ne!(
            Target::new("Host", "80").canonical_key(),
            Target::new("host", "80").canonical_key()
        );
    }

    #[test]
    fn test_url_uses_hostname() {
        let target = Target::with_ip("10.0.0.1", "example.com", "8443");
        assert_eq!(target.url("https"), "https://example.com:8443");
    }

    #[test]
    fn test_host_header() {
        assert_eq!(Target::new("a.test", "443").host_header(), "a.test");
        assert_eq!(Target::new("a.test", "80").host_header(), "a.test");
        assert_eq!(Target::new("a.test", "8080").host_header(), "a.test:8080");
    }

    #[test]
    fn test_pinned_addr() {
        assert_eq!(Target::new("a.test", "80").pinned_addr(), Ok(None));

        let addr = Target::with_ip("127.0.0.1", "a.test", "8080")
            .pinned_addr()
            .unwrap()
            .unwrap();
        assert_eq!(addr, "127.0.0.1:8080".parse().unwrap());

        assert!(Target::with_ip("not-an-ip", "a.test", "80").pinned_addr().is_err());
        assert!(Target::with_ip("127.0.0.1", "a.test", "http").pinned_addr().is_err());
    }
}
