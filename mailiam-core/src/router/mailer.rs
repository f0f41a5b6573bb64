use crate::router::{MailRouter, RouteDecision};
use crate::storage::SettingsStore;
use async_trait::async_trait;
use mailiam_mailer::{Email, Mailer, MailerError};
use std::sync::Arc;

/// A [`Mailer`] that tries the Mailiam API first and falls back to a
/// default transport.
///
/// Settings are re-read from the store for every message. If they cannot be
/// loaded the message goes straight to the fallback.
pub struct RoutingMailer<S: SettingsStore, M: Mailer> {
    router: MailRouter,
    store: Arc<S>,
    fallback: M,
}

impl<S: SettingsStore, M: Mailer> RoutingMailer<S, M> {
    pub fn new(router: MailRouter, store: Arc<S>, fallback: M) -> Self {
        Self {
            router,
            store,
            fallback,
        }
    }

    pub fn fallback(&self) -> &M {
        &self.fallback
    }
}

#[async_trait]
impl<S: SettingsStore, M: Mailer> Mailer for RoutingMailer<S, M> {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        let settings = match self.store.load().await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Could not load Mailiam settings, using default transport");
                return self.fallback.send_email(email).await;
            }
        };

        match self.router.route(&settings, &email).await {
            RouteDecision::SentViaApi => Ok(()),
            RouteDecision::PassThrough(_) => self.fallback.send_email(email).await,
        }
    }
}
