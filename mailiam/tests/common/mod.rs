//! In-process stand-in for the Mailiam API.
#![allow(dead_code)]

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use mailiam::MailiamConfig;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct Canned {
    status: u16,
    body: Value,
    delay: Option<Duration>,
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<HashMap<String, Canned>>,
}

pub struct MockApi {
    pub url: String,
    state: Arc<MockState>,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("Mock API has no address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock API stopped");
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Config pointing at this server for a site at `https://example.com`.
    pub fn config(&self) -> MailiamConfig {
        MailiamConfig::new("https://example.com").with_api_url(&self.url)
    }

    /// Sets the answer for `"METHOD /path"`. Unknown routes answer 404.
    pub fn respond(&self, route: &str, status: u16, body: Value) {
        self.state.responses.lock().unwrap().insert(
            route.to_string(),
            Canned {
                status,
                body,
                delay: None,
            },
        );
    }

    pub fn respond_after(&self, route: &str, delay: Duration, status: u16, body: Value) {
        self.state.responses.lock().unwrap().insert(
            route.to_string(),
            Canned {
                status,
                body,
                delay: Some(delay),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let route = format!("{method} {path}");

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let canned = state.responses.lock().unwrap().get(&route).cloned();
    let Some(canned) = canned else {
        return (StatusCode::NOT_FOUND, axum::Json(json!({"error": "Not found"}))).into_response();
    };

    if let Some(delay) = canned.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(canned.status).unwrap();
    if canned.body.is_null() {
        status.into_response()
    } else {
        (status, axum::Json(canned.body)).into_response()
    }
}
