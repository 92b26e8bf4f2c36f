//! Resolved scan options.

use super::settings::AppSettings;
use crate::error::{ConfigError, ConfigResult};
use crate::output::SchemeFilter;
use crate::scanner::DetectorConfig;
use std::time::Duration;

/// Everything a scan run needs to know, after merging flags and settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Budget for one probe exchange.
    pub timeout: Duration,
    /// Maximum probes in flight.
    pub concurrency: usize,
    pub filter: SchemeFilter,
    pub user_agent: String,
    pub color: bool,
    pub progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default())
    }
}

impl ScanOptions {
    /// Options seeded from the settings file.
    ///
    /// Timeouts that are not positive and finite fall back to the default
    /// here; [`ScanOptions::validate`] catches values set later.
    pub fn from_settings(settings: &AppSettings) -> Self {
        let timeout = Duration::try_from_secs_f64(settings.timeout_secs)
            .unwrap_or(Duration::from_secs(10));
        Self {
            timeout,
            concurrency: settings.concurrency,
            filter: SchemeFilter::All,
            user_agent: settings.user_agent.clone(),
            color: settings.color,
            progress: settings.progress,
        }
    }

    /// Set the timeout from fractional seconds.
    pub fn with_timeout_secs(mut self, secs: f64) -> ConfigResult<Self> {
        self.timeout = Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::InvalidValue {
            field: "timeout",
            reason: e.to_string(),
        })?;
        Ok(self)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_filter(mut self, filter: SchemeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.progress = false;
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Detector settings derived from these options.
    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig::default()
            .with_timeout(self.timeout)
            .with_user_agent(self.user_agent.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ScanOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.concurrency, 20);
        assert_eq!(options.filter, SchemeFilter::All);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let options = ScanOptions::default()
            .with_timeout_secs(2.5)
            .unwrap()
            .with_concurrency(50)
            .with_filter(SchemeFilter::EncryptedOnly)
            .with_user_agent("ua")
            .without_color()
            .without_progress();

        assert_eq!(options.timeout, Duration::from_millis(2500));
        assert_eq!(options.concurrency, 50);
        assert_eq!(options.filter, SchemeFilter::EncryptedOnly);
        assert!(!options.color);
        assert!(!options.progress);

        let detector = options.detector_config();
        assert_eq!(detector.timeout, Duration::from_millis(2500));
        assert_eq!(detector.user_agent, "ua");
    }

    #[test]
    fn test_invalid_values() {
        assert!(ScanOptions::default().with_timeout_secs(-1.0).is_err());
        assert!(ScanOptions::default().with_timeout_secs(f64::NAN).is_err());
        assert!(ScanOptions::default().with_concurrency(0).validate().is_err());
        assert!(ScanOptions::default()
            .with_timeout_secs(0.0)
            .unwrap()
            .validate()
            .is_err());
    }

    #[test]
    fn test_bad_settings_timeout_falls_back() {
        let settings = AppSettings {
            timeout_secs: -3.0,
            ..AppSettings::default()
        };
        assert_eq!(
            ScanOptions::from_settings(&settings).timeout,
            Duration::from_secs(10)
        );
    }
}
