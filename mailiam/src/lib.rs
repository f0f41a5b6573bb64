//! # Mailiam
//!
//! Mailiam connects a site to the Mailiam email service. It covers three
//! things:
//!
//! - contact form submissions, forwarded with a domain-scoped public key
//! - transactional email sent programmatically with a server-side usage key
//! - optional interception of the site's outgoing mail, which is sent through
//!   the API first and falls back to the default transport when the API
//!   cannot take it
//!
//! [`Mailiam`] ties those together with a [`SettingsStore`] and re-reads the
//! settings for every operation, so changes made through the setup methods
//! apply immediately.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mailiam::{FormField, FormSubmission, MailiamBuilder, MailiamConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mailiam = MailiamBuilder::new()
//!         .with_config(MailiamConfig::new("https://example.com"))
//!         .with_settings_file("mailiam.json")?
//!         .build()?;
//!
//!     mailiam.configure_automatic("mlm_sk_...").await?;
//!
//!     let response = mailiam
//!         .submit_form(&FormSubmission {
//!             form_id: "contact".to_string(),
//!             fields: vec![FormField::new("email", "ana@example.com")],
//!         })
//!         .await?;
//!     println!("{}", response.message);
//!
//!     Ok(())
//! }
//! ```
pub mod builder;

use std::sync::Arc;

use mailiam_core::validation::sanitize_text_field;
use mailiam_mailer::{Email, Mailer};
use serde_json::Value;

pub use builder::{MailiamBuilder, MailiamBuilderError, NoStore, WithStore};

/// Re-export core types from mailiam_core
pub use mailiam_core::{
    ApiKeySummary, ClientError, ConfigError, CreatedKey, EmailMessage, Error, FormError,
    FormField, FormResponse, FormService, FormSubmission, JsonFileSettingsStore, MailRouter,
    MailiamClient, MailiamConfig, MemorySettingsStore, PassThroughReason, RouteDecision,
    RoutingMailer, SendEmailRequest, SettingsStore, SetupError, SetupService, Settings,
    StorageError, TransactionalService, ValidationError,
};

/// Re-export the message model and default transports
pub use mailiam_mailer::{MailerConfig, MailerError, TemplateVars, TransportConfig};

/// The entry point for a host integrating Mailiam.
///
/// Holds the process configuration, the API client and the services built on
/// it. Settings live in `S` and are loaded fresh on each call.
pub struct Mailiam<S: SettingsStore> {
    store: Arc<S>,
    config: MailiamConfig,
    mailer_config: Option<MailerConfig>,
    client: MailiamClient,
    form_service: FormService,
    transactional_service: TransactionalService,
    setup_service: SetupService,
}

impl<S: SettingsStore> Mailiam<S> {
    pub fn new(config: MailiamConfig, store: Arc<S>) -> Result<Self, Error> {
        let client = MailiamClient::new(&config)?;

        Ok(Self {
            form_service: FormService::new(client.clone(), &config),
            transactional_service: TransactionalService::new(client.clone()),
            setup_service: SetupService::new(client.clone(), config.clone()),
            store,
            config,
            mailer_config: None,
            client,
        })
    }

    pub(crate) fn with_mailer_config(mut self, config: Option<MailerConfig>) -> Self {
        self.mailer_config = config;
        self
    }

    pub fn config(&self) -> &MailiamConfig {
        &self.config
    }

    pub fn client(&self) -> &MailiamClient {
        &self.client
    }

    pub fn store(&self) -> Arc<S> {
        self.store.clone()
    }

    pub async fn settings(&self) -> Result<Settings, Error> {
        Ok(self.store.load().await?)
    }

    /// Whether forms can be submitted.
    pub async fn is_configured(&self) -> Result<bool, Error> {
        Ok(self.settings().await?.is_configured())
    }

    /// Whether transactional email can be sent.
    pub async fn has_transactional(&self) -> Result<bool, Error> {
        Ok(self.settings().await?.has_transactional())
    }

    // ------------------------------------------------------------------
    // Forms and transactional email
    // ------------------------------------------------------------------

    pub async fn submit_form(&self, submission: &FormSubmission) -> Result<FormResponse, Error> {
        let settings = self.settings().await?;
        Ok(self.form_service.submit(&settings, submission).await?)
    }

    pub async fn send_email(&self, request: &SendEmailRequest) -> Result<Value, Error> {
        let settings = self.settings().await?;
        self.transactional_service.send(&settings, request).await
    }

    // ------------------------------------------------------------------
    // Outgoing mail
    // ------------------------------------------------------------------

    /// Decides whether `email` was taken by the API. On
    /// [`RouteDecision::SentViaApi`] the caller must not deliver it again.
    pub async fn route_outgoing(&self, email: &Email) -> Result<RouteDecision, Error> {
        let settings = self.settings().await?;
        Ok(self.router().route(&settings, email).await)
    }

    pub fn router(&self) -> MailRouter {
        MailRouter::new(self.client.clone())
    }

    /// Wraps `fallback` so mail goes through the API first.
    pub fn mailer<M: Mailer>(&self, fallback: M) -> RoutingMailer<S, M> {
        RoutingMailer::new(self.router(), self.store.clone(), fallback)
    }

    /// Like [`Mailiam::mailer`] with the transport described by the
    /// configured [`MailerConfig`] as the fallback. Call it from inside a
    /// tokio runtime when the transport is SMTP.
    pub fn default_mailer(&self) -> Result<RoutingMailer<S, Box<dyn Mailer>>, Error> {
        let config = self.mailer_config.as_ref().ok_or_else(|| {
            MailerError::Config("No default transport configured".to_string())
        })?;
        Ok(self.mailer(config.build_transport()?))
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    pub async fn configure_manual(
        &self,
        public_key: Option<&str>,
        usage_key: Option<&str>,
    ) -> Result<Settings, Error> {
        let settings = self.settings().await?;
        let updated = self
            .setup_service
            .configure_manual(&settings, public_key, usage_key)
            .await?;
        self.persist(updated).await
    }

    pub async fn configure_automatic(&self, setup_key: &str) -> Result<Settings, Error> {
        let settings = self.settings().await?;
        let updated = self
            .setup_service
            .configure_automatic(&settings, setup_key)
            .await?;
        self.persist(updated).await
    }

    pub async fn update_usage_key(&self, usage_key: &str) -> Result<Settings, Error> {
        let settings = self.settings().await?;
        let updated = self
            .setup_service
            .update_usage_key(&settings, usage_key)
            .await?;
        self.persist(updated).await
    }

    /// Replaces the visitor-facing messages. `None` leaves a message as is.
    pub async fn update_messages(
        &self,
        success: Option<&str>,
        error: Option<&str>,
    ) -> Result<Settings, Error> {
        let success = success.map(sanitize_text_field);
        let error = error.map(sanitize_text_field);

        let updated = self
            .settings()
            .await?
            .with_messages(success.as_deref(), error.as_deref());
        self.persist(updated).await
    }

    pub async fn set_email_override(&self, enabled: bool) -> Result<Settings, Error> {
        let updated = self.settings().await?.with_email_override(enabled);
        self.persist(updated).await
    }

    pub async fn regenerate_public_key(&self) -> Result<Settings, Error> {
        let settings = self.settings().await?;
        let updated = self.setup_service.regenerate_public_key(&settings).await?;
        self.persist(updated).await
    }

    pub async fn test_public_key(&self) -> Result<(), Error> {
        let settings = self.settings().await?;
        Ok(self.setup_service.test_public_key(&settings).await?)
    }

    pub async fn send_test_email(&self, to: &str, site_name: &str) -> Result<(), Error> {
        let settings = self.settings().await?;
        Ok(self
            .setup_service
            .send_test_email(&settings, to, site_name)
            .await?)
    }

    // ------------------------------------------------------------------
    // Key management
    // ------------------------------------------------------------------

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKeySummary>, Error> {
        let settings = self.settings().await?;
        let api_key = settings.api_key().ok_or(ConfigError::MissingApiKey)?;
        Ok(self.client.list_api_keys(api_key).await?)
    }

    pub async fn delete_api_key(&self, key_id: &str) -> Result<bool, Error> {
        let settings = self.settings().await?;
        let api_key = settings.api_key().ok_or(ConfigError::MissingApiKey)?;
        Ok(self.client.delete_api_key(api_key, key_id).await?)
    }

    async fn persist(&self, settings: Settings) -> Result<Settings, Error> {
        self.store.save(&settings).await?;
        tracing::debug!(
            configured = settings.is_configured(),
            transactional = settings.has_transactional(),
            email_override = settings.email_override_enabled,
            "Persisted Mailiam settings"
        );
        Ok(settings)
    }
}
