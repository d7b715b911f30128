//! Wizard configuration
//!
//! Loaded from the environment (and a `.env` file when present). Every setting
//! has a default so a host can start with no configuration at all; only a
//! malformed value is an error.

use std::time::Duration;
use tracing::info;
use url::Url;

use crate::error::ConfigError;
use crate::locale::Locale;
use crate::wizard::ReferencePolicy;

pub const ENV_SUBMIT_URL: &str = "LEAD_SUBMIT_URL";
pub const ENV_SUBMIT_TIMEOUT_SECS: &str = "LEAD_SUBMIT_TIMEOUT_SECS";
pub const ENV_DEFAULT_LOCALE: &str = "LEAD_DEFAULT_LOCALE";
pub const ENV_EVENT_BUFFER: &str = "LEAD_EVENT_BUFFER";
pub const ENV_REFERENCE_POLICY: &str = "LEAD_REFERENCE_POLICY";

#[derive(Debug, Clone, PartialEq)]
pub struct WizardConfig {
    /// Lead submission endpoint. `None` when the host supplies its own submitter.
    pub submit_url: Option<Url>,
    pub submit_timeout: Duration,
    pub default_locale: Locale,
    /// Capacity of the channel event sink
    pub event_buffer_size: usize,
    pub reference_policy: ReferencePolicy,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            submit_url: None,
            submit_timeout: Duration::from_secs(15),
            default_locale: Locale::Ar,
            event_buffer_size: 1024,
            reference_policy: ReferencePolicy::FreshPerAttempt,
        }
    }
}

impl WizardConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let config = Self::from_lookup(|var| std::env::var(var).ok())?;
        info!(
            submit_url = config.submit_url.as_ref().map(Url::as_str).unwrap_or("<none>"),
            locale = %config.default_locale,
            policy = ?config.reference_policy,
            "wizard configuration loaded"
        );
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let submit_url = get(ENV_SUBMIT_URL)
            .map(|raw| {
                Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl { url: raw, source })
            })
            .transpose()?;

        let submit_timeout = match get(ENV_SUBMIT_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_SUBMIT_TIMEOUT_SECS,
                    reason: format!("expected a positive number of seconds, got '{}'", raw),
                })?,
            None => defaults.submit_timeout,
        };

        let default_locale = match get(ENV_DEFAULT_LOCALE) {
            Some(raw) => Locale::parse(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                var: ENV_DEFAULT_LOCALE,
                reason: format!("unsupported locale '{}'", raw),
            })?,
            None => defaults.default_locale,
        };

        let event_buffer_size = match get(ENV_EVENT_BUFFER) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: ENV_EVENT_BUFFER,
                    reason: format!("expected a positive integer, got '{}'", raw),
                })?,
            None => defaults.event_buffer_size,
        };

        let reference_policy = match get(ENV_REFERENCE_POLICY) {
            Some(raw) => ReferencePolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                var: ENV_REFERENCE_POLICY,
                reason: format!("expected 'fresh' or 'reuse', got '{}'", raw),
            })?,
            None => defaults.reference_policy,
        };

        Ok(Self {
            submit_url,
            submit_timeout,
            default_locale,
            event_buffer_size,
            reference_policy,
        })
    }
}
