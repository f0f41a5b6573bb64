use crate::config::MailiamConfig;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent.";
pub const DEFAULT_ERROR_MESSAGE: &str =
    "Sorry, there was an error sending your message. Please try again.";

/// The persisted configuration record.
///
/// Written only by the settings save path ([`SetupService`](crate::services::SetupService)
/// and the facade's update methods); everything else reads it. Empty strings
/// count as absent for every key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub domain: String,
    /// Admin or usage key used to mint public keys.
    pub api_key: Option<String>,
    pub public_key: Option<String>,
    pub public_key_id: Option<String>,
    pub usage_key: Option<String>,
    pub email_override_enabled: bool,
    pub success_message: String,
    pub error_message: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: String::new(),
            api_key: None,
            public_key: None,
            public_key_id: None,
            usage_key: None,
            email_override_enabled: false,
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            error_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

impl Settings {
    /// Install-time defaults for the configured site.
    pub fn for_site(config: &MailiamConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            domain: config.site_domain()?,
            ..Default::default()
        })
    }

    pub fn api_key(&self) -> Option<&str> {
        non_empty(&self.api_key)
    }

    pub fn public_key(&self) -> Option<&str> {
        non_empty(&self.public_key)
    }

    pub fn public_key_id(&self) -> Option<&str> {
        non_empty(&self.public_key_id)
    }

    pub fn usage_key(&self) -> Option<&str> {
        non_empty(&self.usage_key)
    }

    pub fn domain(&self) -> Option<&str> {
        Some(self.domain.as_str()).filter(|d| !d.is_empty())
    }

    /// Forms can be submitted once a public key exists.
    pub fn is_configured(&self) -> bool {
        self.public_key().is_some()
    }

    /// Transactional sends need a usage key.
    pub fn has_transactional(&self) -> bool {
        self.usage_key().is_some()
    }

    pub fn with_messages(mut self, success: Option<&str>, error: Option<&str>) -> Self {
        if let Some(success) = success {
            self.success_message = success.trim().to_string();
        }
        if let Some(error) = error {
            self.error_message = error.trim().to_string();
        }
        self
    }

    pub fn with_email_override(mut self, enabled: bool) -> Self {
        self.email_override_enabled = enabled;
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.success_message, DEFAULT_SUCCESS_MESSAGE);
        assert_eq!(settings.error_message, DEFAULT_ERROR_MESSAGE);
        assert!(!settings.email_override_enabled);
        assert!(!settings.is_configured());
        assert!(!settings.has_transactional());
    }

    #[test]
    fn test_for_site() {
        let config = MailiamConfig::new("https://shop.example.com/");
        let settings = Settings::for_site(&config).unwrap();
        assert_eq!(settings.domain, "shop.example.com");
    }

    #[test]
    fn test_empty_keys_are_absent() {
        let settings = Settings {
            public_key: Some(String::new()),
            usage_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(settings.public_key(), None);
        assert_eq!(settings.usage_key(), None);
        assert!(!settings.is_configured());
        assert!(!settings.has_transactional());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"domain":"example.com","usage_key":"mlm_sk_abc"}"#).unwrap();
        assert_eq!(settings.usage_key(), Some("mlm_sk_abc"));
        assert_eq!(settings.success_message, DEFAULT_SUCCESS_MESSAGE);
    }

    #[test]
    fn test_with_messages() {
        let settings = Settings::default()
            .with_messages(Some(" Thanks! "), None)
            .with_email_override(true);
        assert_eq!(settings.success_message, "Thanks!");
        assert_eq!(settings.error_message, DEFAULT_ERROR_MESSAGE);
        assert!(settings.email_override_enabled);
    }
}
