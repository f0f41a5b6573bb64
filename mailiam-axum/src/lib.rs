//! # Mailiam Axum Integration
//!
//! Axum routes that accept contact form posts from a site's pages and
//! forward them through [`Mailiam`].
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/health` | GET | Liveness check with the crate version |
//! | `/forms/submit` | POST | `{ form_id, fields: [{ name, value }] }` to `{ success, message }` |
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use mailiam::MailiamBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mailiam = MailiamBuilder::new()
//!         .with_config_from_env()?
//!         .with_settings_file("mailiam.json")?
//!         .build()?;
//!
//!     let app = Router::new().nest("/mailiam", mailiam_axum::routes(Arc::new(mailiam)));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

mod error;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use routes::{AppState, create_router};
pub use types::HealthResponse;

use axum::Router;
use mailiam::{Mailiam, SettingsStore};
use std::sync::Arc;

/// Create the Mailiam routes for your Axum application.
///
/// The returned router can be nested at any path.
pub fn routes<S: SettingsStore>(mailiam: Arc<Mailiam<S>>) -> Router {
    create_router(mailiam)
}
