use crate::client::{FormPayload, MailiamClient};
use crate::config::MailiamConfig;
use crate::error::{ConfigError, FormError};
use crate::settings::Settings;
use crate::validation::{HONEYPOT_FIELD, sanitize_key, sanitize_text_field};
use serde::{Deserialize, Serialize};

/// A raw form post as it arrives from the browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub form_id: String,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl FormField {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// What the visitor sees after submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormResponse {
    pub success: bool,
    pub message: String,
}

impl FormResponse {
    pub fn success<S: Into<String>>(message: S) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<&FormError> for FormResponse {
    fn from(error: &FormError) -> Self {
        Self::failure(error.user_message())
    }
}

/// Validates, sanitizes and forwards form submissions.
#[derive(Debug, Clone)]
pub struct FormService {
    client: MailiamClient,
    site_url: String,
    source: String,
}

impl FormService {
    pub fn new(client: MailiamClient, config: &MailiamConfig) -> Self {
        Self {
            client,
            site_url: config.site_url.clone(),
            source: config.source.clone(),
        }
    }

    /// Builds the payload sent to the API.
    ///
    /// Field names are sanitized as keys and values as single-line text.
    /// An empty honeypot is dropped, a filled one rejects the whole
    /// submission. The context fields are added last and win over posted
    /// fields with the same name.
    pub fn build_payload(&self, submission: &FormSubmission) -> Result<FormPayload, FormError> {
        let mut payload = FormPayload::new();

        for field in &submission.fields {
            let name = sanitize_key(&field.name);
            let value = sanitize_text_field(&field.value);

            if name == HONEYPOT_FIELD {
                if value.is_empty() {
                    continue;
                }
                return Err(FormError::Spam);
            }

            if name.is_empty() {
                continue;
            }

            payload.insert(name, value);
        }

        payload.insert("_form_id".to_string(), sanitize_key(&submission.form_id));
        payload.insert("_source".to_string(), self.source.clone());
        payload.insert("_site_url".to_string(), self.site_url.clone());

        Ok(payload)
    }

    pub async fn submit(
        &self,
        settings: &Settings,
        submission: &FormSubmission,
    ) -> Result<FormResponse, FormError> {
        let (Some(public_key), Some(domain)) = (settings.public_key(), settings.domain()) else {
            return Err(ConfigError::FormsNotConfigured.into());
        };

        let payload = match self.build_payload(submission) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::info!(form_id = %submission.form_id, "Honeypot triggered, dropping submission");
                return Err(e);
            }
        };

        match self.client.submit_form(domain, &payload, public_key).await {
            Ok(_) => Ok(FormResponse::success(settings.success_message.clone())),
            Err(e) => {
                tracing::error!(error = %e, form_id = %submission.form_id, "Form submission failed");
                Err(FormError::Rejected {
                    message: settings.error_message.clone(),
                    source: e,
                })
            }
        }
    }
}
