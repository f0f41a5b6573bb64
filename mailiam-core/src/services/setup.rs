use crate::client::MailiamClient;
use crate::config::MailiamConfig;
use crate::error::{ConfigError, SetupError, ValidationError};
use crate::router::extract_message;
use crate::settings::Settings;
use crate::validation::{sanitize_text_field, validate_public_key, validate_usage_key};
use mailiam_mailer::{AskamaTemplateEngine, TemplateContext, TestEmail};

/// Admin operations that change which keys the site uses.
///
/// Each operation takes the current settings and, on success, returns the
/// record to persist. On error nothing should be saved.
#[derive(Debug, Clone)]
pub struct SetupService {
    client: MailiamClient,
    config: MailiamConfig,
}

impl SetupService {
    pub fn new(client: MailiamClient, config: MailiamConfig) -> Self {
        Self { client, config }
    }

    /// Stores keys the owner copied from the dashboard.
    ///
    /// Blank keys are skipped. A public key resets the domain to the site
    /// host; a usage key is also used as the admin key.
    pub async fn configure_manual(
        &self,
        settings: &Settings,
        public_key: Option<&str>,
        usage_key: Option<&str>,
    ) -> Result<Settings, SetupError> {
        let mut updated = settings.clone();

        if let Some(public_key) = clean_key(public_key) {
            validate_public_key(&public_key)?;
            self.client
                .test_api_key(&public_key)
                .await
                .map_err(SetupError::InvalidPublicKey)?;

            updated.domain = self.config.site_domain()?;
            updated.public_key = Some(public_key);
        }

        if let Some(usage_key) = clean_key(usage_key) {
            validate_usage_key(&usage_key)?;
            self.client
                .test_api_key(&usage_key)
                .await
                .map_err(SetupError::InvalidUsageKey)?;

            updated.api_key = Some(usage_key.clone());
            updated.usage_key = Some(usage_key);
        }

        tracing::info!(domain = %updated.domain, "Mailiam keys configured manually");
        Ok(updated)
    }

    /// Uses an admin key to mint a public key for this site.
    pub async fn configure_automatic(
        &self,
        settings: &Settings,
        setup_key: &str,
    ) -> Result<Settings, SetupError> {
        let Some(setup_key) = clean_key(Some(setup_key)) else {
            return Err(ValidationError::MissingField("setup_key".to_string()).into());
        };

        self.client
            .test_api_key(&setup_key)
            .await
            .map_err(SetupError::InvalidApiKey)?;

        let domain = self.config.site_domain()?;
        let created = self
            .client
            .create_public_key(&setup_key, &domain)
            .await
            .map_err(SetupError::CreatePublicKey)?;

        tracing::info!(%domain, key_id = %created.key_id, "Created Mailiam public key");

        Ok(Settings {
            domain,
            api_key: Some(setup_key),
            public_key: Some(created.key),
            public_key_id: Some(created.key_id),
            ..settings.clone()
        })
    }

    /// Sets the key used for transactional email. A blank key removes it.
    pub async fn update_usage_key(
        &self,
        settings: &Settings,
        usage_key: &str,
    ) -> Result<Settings, SetupError> {
        let Some(usage_key) = clean_key(Some(usage_key)) else {
            return Ok(Settings {
                usage_key: None,
                ..settings.clone()
            });
        };

        if validate_usage_key(&usage_key).is_err() {
            return Err(ValidationError::ServerKeyRequired.into());
        }

        self.client
            .test_api_key(&usage_key)
            .await
            .map_err(SetupError::InvalidUsageKey)?;

        Ok(Settings {
            usage_key: Some(usage_key),
            ..settings.clone()
        })
    }

    /// Replaces the public key with a fresh one.
    ///
    /// Deleting the old key is best effort; a failure there is only logged.
    pub async fn regenerate_public_key(&self, settings: &Settings) -> Result<Settings, SetupError> {
        let api_key = settings.api_key().ok_or(ConfigError::MissingApiKey)?;

        if let Some(old_key_id) = settings.public_key_id() {
            if let Err(e) = self.client.delete_api_key(api_key, old_key_id).await {
                tracing::warn!(error = %e, key_id = old_key_id, "Could not delete old public key");
            }
        }

        let domain = match settings.domain() {
            Some(domain) => domain.to_string(),
            None => self.config.site_domain()?,
        };

        let created = self
            .client
            .create_public_key(api_key, &domain)
            .await
            .map_err(SetupError::CreatePublicKey)?;

        tracing::info!(%domain, key_id = %created.key_id, "Regenerated Mailiam public key");

        Ok(Settings {
            domain,
            public_key: Some(created.key),
            public_key_id: Some(created.key_id),
            ..settings.clone()
        })
    }

    pub async fn test_public_key(&self, settings: &Settings) -> Result<(), SetupError> {
        let public_key = settings.public_key().ok_or(ConfigError::MissingPublicKey)?;
        self.client.test_api_key(public_key).await?;
        Ok(())
    }

    /// Sends the built-in test email to `to` with the usage key.
    pub async fn send_test_email(
        &self,
        settings: &Settings,
        to: &str,
        site_name: &str,
    ) -> Result<(), SetupError> {
        let usage_key = settings.usage_key().ok_or(ConfigError::MissingUsageKey)?;

        let domain = match settings.domain() {
            Some(domain) => domain.to_string(),
            None => self.config.site_domain()?,
        };

        let context = TemplateContext {
            site_name: site_name.to_string(),
            site_url: self.config.site_url.clone(),
        };
        let email = TestEmail::build(
            &AskamaTemplateEngine::new(),
            &format!("noreply@{domain}"),
            to,
            &context,
        )
        .await?;

        self.client
            .send_transactional_email(usage_key, &extract_message(&email))
            .await
            .map_err(SetupError::TestEmail)?;

        tracing::info!(%to, "Mailiam test email sent");
        Ok(())
    }
}

fn clean_key(key: Option<&str>) -> Option<String> {
    key.map(sanitize_text_field).filter(|k| !k.is_empty())
}
