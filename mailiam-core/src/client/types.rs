use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sanitized form fields plus the `_form_id`, `_source` and `_site_url`
/// context fields.
pub type FormPayload = BTreeMap<String, String>;

/// Permissions granted to public keys minted for a site.
pub const PUBLIC_KEY_PERMISSIONS: &[&str] = &["forms:send"];

/// Requests per window allowed for minted public keys.
pub const PUBLIC_KEY_RATE_LIMIT: u32 = 100;

/// A transactional email in the shape `/v1/send` expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
}

impl EmailMessage {
    pub fn new<F, T, S>(from: F, to: T, subject: S) -> Self
    where
        F: Into<String>,
        T: Into<String>,
        S: Into<String>,
    {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    pub fn with_html<S: Into<String>>(mut self, html: S) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Checks the fields the service requires.
    ///
    /// `from`, `to` and `subject` must be non-blank and at least one of
    /// `html`/`text` must be non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("from", &self.from),
            ("to", &self.to),
            ("subject", &self.subject),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(name.to_string()));
            }
        }

        let has_html = self.html.as_deref().is_some_and(|h| !h.is_empty());
        let has_text = self.text.as_deref().is_some_and(|t| !t.is_empty());
        if !has_html && !has_text {
            return Err(ValidationError::MissingContent);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePublicKeyRequest<'a> {
    pub name: String,
    #[serde(rename = "type")]
    pub key_type: &'static str,
    pub domain: &'a str,
    pub permissions: &'static [&'static str],
    pub rate_limit: u32,
}

impl<'a> CreatePublicKeyRequest<'a> {
    pub fn for_domain(domain: &'a str) -> Self {
        Self {
            name: format!("WordPress - {domain}"),
            key_type: "public",
            domain,
            permissions: PUBLIC_KEY_PERMISSIONS,
            rate_limit: PUBLIC_KEY_RATE_LIMIT,
        }
    }
}

/// A freshly minted public key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedKey {
    pub key: String,
    pub key_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateKeyResponse {
    pub api_key: CreatedKey,
}

/// One entry of the key listing. Only `keyId` is guaranteed; everything the
/// service adds beyond the known fields is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySummary {
    pub key_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub key_type: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListKeysResponse {
    Bare(Vec<ApiKeySummary>),
    Wrapped {
        #[serde(alias = "keys", rename = "apiKeys")]
        api_keys: Vec<ApiKeySummary>,
    },
}

impl ListKeysResponse {
    pub fn into_keys(self) -> Vec<ApiKeySummary> {
        match self {
            ListKeysResponse::Bare(keys) | ListKeysResponse::Wrapped { api_keys: keys } => keys,
        }
    }
}
