//! Builder pattern for constructing Mailiam instances
//!
//! This module provides a type-safe builder for creating [`Mailiam`] instances
//! with compile-time validation that a settings store was chosen.
//!
//! # Example
//!
//! ```rust,no_run
//! use mailiam::{MailiamBuilder, MailiamConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Settings persisted to a JSON file
//! let mailiam = MailiamBuilder::new()
//!     .with_config(MailiamConfig::new("https://example.com"))
//!     .with_settings_file("/var/lib/mailiam/settings.json")?
//!     .with_mailer_from_env()?
//!     .build()?;
//!
//! // Or kept in memory
//! let mailiam = MailiamBuilder::new()
//!     .with_memory_settings()
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::Arc;

use mailiam_core::{
    JsonFileSettingsStore, MailiamConfig, MemorySettingsStore, Settings, SettingsStore,
};
use mailiam_mailer::MailerConfig;

use crate::Mailiam;

/// Errors that can occur when building a Mailiam instance.
#[derive(Debug, thiserror::Error)]
pub enum MailiamBuilderError {
    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The HTTP client could not be created
    #[error("Client construction failed: {0}")]
    Client(String),

    /// Failed to configure the default transport
    #[error("Mailer configuration failed: {0}")]
    MailerConfiguration(String),
}

/// Marker type indicating no settings store has been configured yet.
///
/// This is the initial state of [`MailiamBuilder`].
pub struct NoStore;

/// Marker type indicating a settings store has been configured.
pub struct WithStore<S: SettingsStore> {
    store: Arc<S>,
}

/// A type-safe builder for constructing [`Mailiam`] instances.
///
/// # Type States
///
/// - [`NoStore`]: Initial state, a settings store must be configured
/// - [`WithStore<S>`]: Store configured, ready to build
///
/// Process configuration should be set before the store, because file and
/// memory stores derive their install-time defaults (the site domain) from it.
pub struct MailiamBuilder<Store> {
    store: Store,
    config: MailiamConfig,
    mailer_config: Option<MailerConfig>,
}

impl Default for MailiamBuilder<NoStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl MailiamBuilder<NoStore> {
    /// Create a new builder with default configuration.
    ///
    /// # Defaults
    ///
    /// - API URL: `https://api.mailiam.dev`
    /// - Site URL: `http://localhost`
    /// - Timeouts: 15s for reads, 30s for writes
    /// - Default transport: none
    pub fn new() -> Self {
        Self {
            store: NoStore,
            config: MailiamConfig::default(),
            mailer_config: None,
        }
    }

    /// Use a caller-provided settings store.
    pub fn with_settings_store<S: SettingsStore>(self, store: Arc<S>) -> MailiamBuilder<WithStore<S>> {
        MailiamBuilder {
            store: WithStore { store },
            config: self.config,
            mailer_config: self.mailer_config,
        }
    }

    /// Persist settings as JSON at `path`. A missing file starts from the
    /// defaults for the configured site.
    pub fn with_settings_file<P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<MailiamBuilder<WithStore<JsonFileSettingsStore>>, MailiamBuilderError> {
        let defaults = self.site_defaults()?;
        let store = Arc::new(JsonFileSettingsStore::with_defaults(path, defaults));
        Ok(self.with_settings_store(store))
    }

    /// Keep settings in memory, starting from the defaults for the configured
    /// site when its URL has a host.
    pub fn with_memory_settings(self) -> MailiamBuilder<WithStore<MemorySettingsStore>> {
        let defaults = self.site_defaults().unwrap_or_default();
        let store = Arc::new(MemorySettingsStore::new(defaults));
        self.with_settings_store(store)
    }

    fn site_defaults(&self) -> Result<Settings, MailiamBuilderError> {
        Settings::for_site(&self.config)
            .map_err(|e| MailiamBuilderError::InvalidConfiguration(e.to_string()))
    }
}

impl<Store> MailiamBuilder<Store> {
    pub fn with_config(mut self, config: MailiamConfig) -> Self {
        self.config = config;
        self
    }

    /// Read the process configuration from `MAILIAM_*` environment variables.
    pub fn with_config_from_env(mut self) -> Result<Self, MailiamBuilderError> {
        self.config = MailiamConfig::from_env()
            .map_err(|e| MailiamBuilderError::InvalidConfiguration(e.to_string()))?;
        Ok(self)
    }

    pub fn with_api_url<U: Into<String>>(mut self, api_url: U) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    /// Configure the transport mail falls back to when the API does not
    /// take it.
    pub fn with_mailer(mut self, config: MailerConfig) -> Self {
        self.mailer_config = Some(config);
        self
    }

    /// Configure the default transport from `MAILER_*` environment variables.
    /// See [`MailerConfig::from_env`].
    pub fn with_mailer_from_env(mut self) -> Result<Self, MailiamBuilderError> {
        let config = MailerConfig::from_env()
            .map_err(|e| MailiamBuilderError::MailerConfiguration(e.to_string()))?;
        self.mailer_config = Some(config);
        Ok(self)
    }
}

impl<S: SettingsStore> MailiamBuilder<WithStore<S>> {
    /// Build the Mailiam instance.
    pub fn build(self) -> Result<Mailiam<S>, MailiamBuilderError> {
        check_api_url(&self.config.api_url)?;

        let mailiam = Mailiam::new(self.config, self.store.store)
            .map_err(|e| MailiamBuilderError::Client(e.to_string()))?;

        Ok(mailiam.with_mailer_config(self.mailer_config))
    }
}

fn check_api_url(api_url: &str) -> Result<(), MailiamBuilderError> {
    if api_url.starts_with("http://") || api_url.starts_with("https://") {
        Ok(())
    } else {
        Err(MailiamBuilderError::InvalidConfiguration(format!(
            "API URL must start with http:// or https://: {api_url}"
        )))
    }
}
