mod common;

use common::MockApi;
use mailiam_core::{ClientError, EmailMessage, FormPayload, MailiamClient};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_create_public_key() {
    let api = MockApi::start().await;
    api.respond(
        "POST /v1/apikeys",
        201,
        json!({"apiKey": {"key": "mlm_pk_new", "keyId": "key_1"}}),
    );
    let client = MailiamClient::new(&api.config()).unwrap();

    let created = client
        .create_public_key("mlm_sk_admin", "example.com")
        .await
        .unwrap();

    assert_eq!(created.key, "mlm_pk_new");
    assert_eq!(created.key_id, "key_1");

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].header("x-api-key"), Some("mlm_sk_admin"));
    assert_eq!(
        requests[0].body,
        json!({
            "name": "WordPress - example.com",
            "type": "public",
            "domain": "example.com",
            "permissions": ["forms:send"],
            "rateLimit": 100
        })
    );
}

#[tokio::test]
async fn test_create_public_key_error_message() {
    let api = MockApi::start().await;
    api.respond("POST /v1/apikeys", 403, json!({"error": "Forbidden"}));
    let client = MailiamClient::new(&api.config()).unwrap();

    let error = client
        .create_public_key("mlm_sk_admin", "example.com")
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ClientError::Api {
            status: 403,
            message: "Forbidden".to_string()
        }
    );
}

#[tokio::test]
async fn test_test_api_key_is_idempotent() {
    let api = MockApi::start().await;
    api.respond("GET /v1/apikeys", 200, json!([]));
    let client = MailiamClient::new(&api.config()).unwrap();

    assert_eq!(client.test_api_key("mlm_sk_abc").await, Ok(true));
    assert_eq!(client.test_api_key("mlm_sk_abc").await, Ok(true));
    assert_eq!(api.request_count(), 2);
}

#[tokio::test]
async fn test_test_api_key_invalid() {
    let api = MockApi::start().await;
    api.respond("GET /v1/apikeys", 401, serde_json::Value::Null);
    let client = MailiamClient::new(&api.config()).unwrap();

    let error = client.test_api_key("mlm_sk_bad").await.unwrap_err();
    assert_eq!(
        error,
        ClientError::InvalidKey {
            status: 401,
            message: "Invalid API key".to_string()
        }
    );
}

#[tokio::test]
async fn test_list_and_delete_keys() {
    let api = MockApi::start().await;
    api.respond(
        "GET /v1/apikeys",
        200,
        json!({"apiKeys": [{"keyId": "key_1", "type": "public", "domain": "example.com"}]}),
    );
    api.respond("DELETE /v1/apikeys/key_1", 204, serde_json::Value::Null);
    let client = MailiamClient::new(&api.config()).unwrap();

    let keys = client.list_api_keys("mlm_sk_admin").await.unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].domain.as_deref(), Some("example.com"));

    assert_eq!(client.delete_api_key("mlm_sk_admin", "key_1").await, Ok(true));
    assert_eq!(api.requests()[1].path, "/v1/apikeys/key_1");
}

#[tokio::test]
async fn test_delete_key_id_stays_in_its_segment() {
    let api = MockApi::start().await;
    api.respond("POST /v1/send", 200, json!({"success": true}));
    let client = MailiamClient::new(&api.config()).unwrap();

    let result = client.delete_api_key("mlm_sk_admin", "../send").await;

    assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));
    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "DELETE");
    assert_eq!(requests[0].path, "/v1/apikeys/..%2Fsend");
}

#[tokio::test]
async fn test_submit_form_headers() {
    let api = MockApi::start().await;
    api.respond("POST /v1/example.com/send", 200, json!({"success": true}));
    let client = MailiamClient::new(&api.config()).unwrap();

    let payload = FormPayload::from([("name".to_string(), "Ana".to_string())]);
    client
        .submit_form("example.com", &payload, "mlm_pk_abc")
        .await
        .unwrap();
    client.submit_form("example.com", &payload, "").await.unwrap();

    let requests = api.requests();
    assert_eq!(requests[0].header("x-api-key"), Some("mlm_pk_abc"));
    assert_eq!(requests[0].header("origin"), Some("https://example.com"));
    assert_eq!(requests[0].body, json!({"name": "Ana"}));

    assert_eq!(requests[1].header("x-api-key"), None);
    assert_eq!(requests[1].header("origin"), Some("https://example.com"));
}

#[tokio::test]
async fn test_send_transactional_email_service_unavailable() {
    let api = MockApi::start().await;
    api.respond("POST /v1/send", 503, json!({"error": "Service unavailable"}));
    let client = MailiamClient::new(&api.config()).unwrap();

    let message = EmailMessage::new("a@b.com", "c@d.com", "Hi").with_text("Hello");
    let error = client
        .send_transactional_email("mlm_sk_abc", &message)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert_eq!(error.message(), "Service unavailable");
}

#[tokio::test]
async fn test_invalid_message_never_reaches_the_service() {
    let api = MockApi::start().await;
    let client = MailiamClient::new(&api.config()).unwrap();

    let message = EmailMessage::new("a@b.com", "c@d.com", "Hi");
    let result = client.send_transactional_email("mlm_sk_abc", &message).await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_write_timeout_is_a_transport_error() {
    let api = MockApi::start().await;
    api.respond_after(
        "POST /v1/send",
        Duration::from_secs(5),
        200,
        json!({"success": true}),
    );

    let mut config = api.config();
    config.write_timeout = Duration::from_millis(200);
    let client = MailiamClient::new(&config).unwrap();

    let message = EmailMessage::new("a@b.com", "c@d.com", "Hi").with_text("Hello");
    let error = client
        .send_transactional_email("mlm_sk_abc", &message)
        .await
        .unwrap_err();

    assert_eq!(
        error,
        ClientError::Transport {
            message: "Request timed out".to_string()
        }
    );
    assert_eq!(error.status(), None);
}
