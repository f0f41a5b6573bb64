//! Standalone form endpoint.
//!
//! Reads `MAILIAM_*` configuration from the environment, keeps settings in
//! the JSON file at `MAILIAM_SETTINGS_PATH` and listens on
//! `MAILIAM_BIND_ADDR`. Log output is controlled with `RUST_LOG`.

use std::sync::Arc;

use mailiam::MailiamBuilder;
use tracing_subscriber::EnvFilter;

const DEFAULT_SETTINGS_PATH: &str = "mailiam-settings.json";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings_path =
        std::env::var("MAILIAM_SETTINGS_PATH").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
    let bind_addr =
        std::env::var("MAILIAM_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let mailiam = MailiamBuilder::new()
        .with_config_from_env()?
        .with_settings_file(&settings_path)?
        .build()?;

    if !mailiam.is_configured().await? {
        tracing::warn!(%settings_path, "No public key configured, form submissions will fail");
    }

    let app = mailiam_axum::routes(Arc::new(mailiam));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, %settings_path, "Mailiam server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
