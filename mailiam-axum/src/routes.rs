use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use mailiam::{Error, FormError, FormResponse, FormSubmission, Mailiam, SettingsStore};

use crate::{error::Result, types::HealthResponse};

pub struct AppState<S: SettingsStore> {
    pub mailiam: Arc<Mailiam<S>>,
}

impl<S: SettingsStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            mailiam: self.mailiam.clone(),
        }
    }
}

pub fn create_router<S: SettingsStore>(mailiam: Arc<Mailiam<S>>) -> Router {
    let state = AppState { mailiam };

    Router::new()
        .route("/health", get(health_handler))
        .route("/forms/submit", post(submit_form_handler::<S>))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Spam answers 400, configuration and remote failures 500. The body is
/// always `{ success, message }` so the browser can show `message` as is.
async fn submit_form_handler<S: SettingsStore>(
    State(state): State<AppState<S>>,
    payload: std::result::Result<Json<FormSubmission>, JsonRejection>,
) -> Result<Response> {
    let Json(submission) = payload?;

    match state.mailiam.submit_form(&submission).await {
        Ok(response) => Ok((StatusCode::OK, Json(response)).into_response()),
        Err(Error::Form(error)) => {
            let status = match error {
                FormError::Spam => StatusCode::BAD_REQUEST,
                FormError::NotConfigured(_) | FormError::Rejected { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            Ok((status, Json(FormResponse::from(&error))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}
