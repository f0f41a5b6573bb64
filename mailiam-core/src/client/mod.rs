//! HTTP client for the Mailiam API.
//!
//! Every operation performs exactly one request and never retries. Non-success
//! answers become [`ClientError::Api`] (or [`ClientError::InvalidKey`] for key
//! checks) carrying the service's `error` message when it sent one; failures
//! before a response arrives become [`ClientError::Transport`].

mod types;

pub use types::{
    ApiKeySummary, CreatedKey, EmailMessage, FormPayload, PUBLIC_KEY_PERMISSIONS,
    PUBLIC_KEY_RATE_LIMIT,
};

use crate::config::MailiamConfig;
use crate::error::ClientError;
use reqwest::{Method, RequestBuilder, StatusCode, Url, header};
use serde_json::Value;
use std::time::Duration;
use types::{CreateKeyResponse, CreatePublicKeyRequest, ListKeysResponse};

/// Header carrying the API key on every authenticated call.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Stateless wrapper around the Mailiam REST endpoints.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct MailiamClient {
    http: reqwest::Client,
    api_url: String,
    base_url: Url,
    site_url: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl MailiamClient {
    pub fn new(config: &MailiamConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mailiam-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Transport {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        let api_url = config.api_url.trim_end_matches('/').to_string();
        let base_url = Url::parse(&api_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ClientError::Transport {
                message: format!("Invalid API URL: {}", config.api_url),
            })?;

        Ok(Self {
            http,
            api_url,
            base_url,
            site_url: config.site_url.clone(),
            read_timeout: config.read_timeout,
            write_timeout: config.write_timeout,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Mints a domain-scoped public key allowed to submit forms.
    pub async fn create_public_key(
        &self,
        admin_key: &str,
        domain: &str,
    ) -> Result<CreatedKey, ClientError> {
        let request = self
            .request(Method::POST, &["v1", "apikeys"], self.write_timeout)
            .header(API_KEY_HEADER, admin_key)
            .json(&CreatePublicKeyRequest::for_domain(domain));

        let (status, body) = self.execute(request, "create_public_key").await?;
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            return Err(api_error(status, &body, "Failed to create public key"));
        }

        serde_json::from_value::<CreateKeyResponse>(body)
            .map(|response| response.api_key)
            .map_err(|e| ClientError::Api {
                status: status.as_u16(),
                message: format!("Unexpected create key response: {e}"),
            })
    }

    /// Checks a key by listing keys with it. Only a 200 counts as valid.
    pub async fn test_api_key(&self, key: &str) -> Result<bool, ClientError> {
        let request = self
            .request(Method::GET, &["v1", "apikeys"], self.read_timeout)
            .header(API_KEY_HEADER, key);

        let (status, body) = self.execute(request, "test_api_key").await?;
        if status == StatusCode::OK {
            return Ok(true);
        }

        Err(ClientError::InvalidKey {
            status: status.as_u16(),
            message: error_message(&body).unwrap_or_else(|| "Invalid API key".to_string()),
        })
    }

    pub async fn list_api_keys(&self, admin_key: &str) -> Result<Vec<ApiKeySummary>, ClientError> {
        let request = self
            .request(Method::GET, &["v1", "apikeys"], self.read_timeout)
            .header(API_KEY_HEADER, admin_key);

        let (status, body) = self.execute(request, "list_api_keys").await?;
        if status != StatusCode::OK {
            return Err(api_error(status, &body, "Failed to list API keys"));
        }

        serde_json::from_value::<ListKeysResponse>(body)
            .map(ListKeysResponse::into_keys)
            .map_err(|e| ClientError::Api {
                status: status.as_u16(),
                message: format!("Unexpected key listing response: {e}"),
            })
    }

    pub async fn delete_api_key(&self, admin_key: &str, key_id: &str) -> Result<bool, ClientError> {
        let request = self
            .request(Method::DELETE, &["v1", "apikeys", key_id], self.read_timeout)
            .header(API_KEY_HEADER, admin_key);

        let (status, body) = self.execute(request, "delete_api_key").await?;
        if matches!(status, StatusCode::OK | StatusCode::NO_CONTENT) {
            return Ok(true);
        }

        Err(api_error(status, &body, "Failed to delete API key"))
    }

    /// Posts a form payload to the domain's send endpoint.
    ///
    /// The public key header is only attached when the key is non-empty.
    /// `Origin` always carries the site URL; the service checks it against
    /// the key's domain.
    pub async fn submit_form(
        &self,
        domain: &str,
        payload: &FormPayload,
        public_key: &str,
    ) -> Result<Value, ClientError> {
        let mut request = self
            .request(Method::POST, &["v1", domain, "send"], self.write_timeout)
            .header(header::ORIGIN, &self.site_url)
            .json(payload);

        if !public_key.is_empty() {
            request = request.header(API_KEY_HEADER, public_key);
        }

        let (status, body) = self.execute(request, "submit_form").await?;
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            return Err(api_error(status, &body, "Failed to submit form"));
        }

        Ok(body)
    }

    /// Sends one transactional email.
    ///
    /// The message is validated first; an invalid message fails with
    /// [`ClientError::Validation`] without touching the network.
    pub async fn send_transactional_email(
        &self,
        usage_key: &str,
        email: &EmailMessage,
    ) -> Result<Value, ClientError> {
        email.validate()?;

        let request = self
            .request(Method::POST, &["v1", "send"], self.write_timeout)
            .header(API_KEY_HEADER, usage_key)
            .json(email);

        let (status, body) = self.execute(request, "send_transactional_email").await?;
        if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
            return Err(api_error(status, &body, "Failed to send email"));
        }

        Ok(body)
    }

    /// Path segments are percent-encoded, so ids and domains cannot step
    /// outside their endpoint.
    fn request(&self, method: Method, segments: &[&str], timeout: Duration) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(segments))
            .timeout(timeout)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<(StatusCode, Value), ClientError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(error = ?e, operation, "Mailiam API request failed");
            transport_error(&e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(error = ?e, operation, %status, "Failed to read Mailiam API response");
            transport_error(&e)
        })?;

        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        tracing::debug!(operation, %status, "Mailiam API responded");

        Ok((status, body))
    }
}

fn transport_error(error: &reqwest::Error) -> ClientError {
    let message = if error.is_timeout() {
        "Request timed out".to_string()
    } else {
        error.to_string()
    };
    ClientError::Transport { message }
}

fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::Null => None,
        Value::String(_) => None,
        other => Some(other.to_string()),
    }
}

fn api_error(status: StatusCode, body: &Value, fallback: &str) -> ClientError {
    ClientError::Api {
        status: status.as_u16(),
        message: error_message(body).unwrap_or_else(|| fallback.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(&json!({"error": "Domain not allowed"})),
            Some("Domain not allowed".to_string())
        );
        assert_eq!(error_message(&json!({"error": ""})), None);
        assert_eq!(error_message(&json!({"message": "nope"})), None);
        assert_eq!(error_message(&Value::Null), None);
    }

    #[test]
    fn test_api_error_fallback() {
        let error = api_error(StatusCode::BAD_GATEWAY, &Value::Null, "Failed to send email");
        assert_eq!(
            error,
            ClientError::Api {
                status: 502,
                message: "Failed to send email".to_string()
            }
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = MailiamConfig::default().with_api_url("https://api.mailiam.dev/");
        let client = MailiamClient::new(&config).unwrap();
        assert_eq!(client.api_url(), "https://api.mailiam.dev");
        assert_eq!(
            client.endpoint(&["v1", "send"]).as_str(),
            "https://api.mailiam.dev/v1/send"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let config = MailiamConfig::default().with_api_url("https://gateway.example.com/mailiam/");
        let client = MailiamClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(&["v1", "apikeys"]).as_str(),
            "https://gateway.example.com/mailiam/v1/apikeys"
        );
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = MailiamClient::new(&MailiamConfig::default()).unwrap();
        assert_eq!(
            client.endpoint(&["v1", "apikeys", "../send"]).as_str(),
            "https://api.mailiam.dev/v1/apikeys/..%2Fsend"
        );
        assert_eq!(
            client.endpoint(&["v1", "a.com/x?y", "send"]).as_str(),
            "https://api.mailiam.dev/v1/a.com%2Fx%3Fy/send"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let config = MailiamConfig::default().with_api_url("not a url");
        assert!(matches!(
            MailiamClient::new(&config),
            Err(ClientError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn test_validation_happens_before_network() {
        // Nothing listens on this port, so a request would be a transport error.
        let config = MailiamConfig::default().with_api_url("http://127.0.0.1:9");
        let client = MailiamClient::new(&config).unwrap();

        let result = client
            .send_transactional_email("mlm_sk_test", &EmailMessage::new("a@b.com", "", "Hi"))
            .await;

        assert_eq!(
            result,
            Err(ClientError::Validation(
                crate::error::ValidationError::MissingField("to".to_string())
            ))
        );
    }
}
