use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.mailiam.dev";
pub const DEFAULT_SOURCE: &str = "wordpress";
pub const READ_TIMEOUT: Duration = Duration::from_secs(15);
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Process configuration for talking to the Mailiam service.
///
/// Unlike [`Settings`](crate::Settings), which the site owner edits at
/// runtime, this is fixed for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailiamConfig {
    /// Base URL of the Mailiam API.
    pub api_url: String,
    /// Public URL of the site, sent as `Origin` and `_site_url`.
    pub site_url: String,
    /// Value of the `_source` field attached to form submissions.
    pub source: String,
    /// Ceiling for GET and DELETE calls.
    pub read_timeout: Duration,
    /// Ceiling for POST calls.
    pub write_timeout: Duration,
}

impl MailiamConfig {
    pub fn new<S: Into<String>>(site_url: S) -> Self {
        Self {
            site_url: site_url.into(),
            ..Default::default()
        }
    }

    pub fn with_api_url<S: Into<String>>(mut self, api_url: S) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            api_url: std::env::var("MAILIAM_API_URL").unwrap_or(defaults.api_url),
            site_url: std::env::var("MAILIAM_SITE_URL").unwrap_or(defaults.site_url),
            source: std::env::var("MAILIAM_SOURCE").unwrap_or(defaults.source),
            read_timeout: secs_from_env("MAILIAM_READ_TIMEOUT_SECS")?
                .unwrap_or(defaults.read_timeout),
            write_timeout: secs_from_env("MAILIAM_WRITE_TIMEOUT_SECS")?
                .unwrap_or(defaults.write_timeout),
        })
    }

    /// Host part of the site URL, used as the form domain.
    pub fn site_domain(&self) -> Result<String, ConfigError> {
        reqwest::Url::parse(&self.site_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| ConfigError::InvalidSiteUrl(self.site_url.clone()))
    }
}

fn secs_from_env(name: &str) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

impl Default for MailiamConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            site_url: "http://localhost".to_string(),
            source: DEFAULT_SOURCE.to_string(),
            read_timeout: READ_TIMEOUT,
            write_timeout: WRITE_TIMEOUT,
        }
    }
}
