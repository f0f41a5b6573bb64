//! Outgoing mail interception.
//!
//! [`MailRouter`] looks at an immutable snapshot of a message that is about to
//! be delivered and decides whether the Mailiam API takes it. The router never
//! touches the message itself: on [`RouteDecision::SentViaApi`] the host is
//! expected to suppress its default delivery (see
//! [`Email::clear_delivery_state`]), on [`RouteDecision::PassThrough`] it
//! delivers as usual. [`RoutingMailer`] packages that contract as a
//! [`Mailer`](mailiam_mailer::Mailer).

mod mailer;

pub use mailer::RoutingMailer;

use crate::client::{EmailMessage, MailiamClient};
use crate::error::ClientError;
use crate::settings::Settings;
use mailiam_mailer::Email;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Delivered by the API; the default transport must not send it again.
    SentViaApi,
    /// The default transport should deliver the untouched message.
    PassThrough(PassThroughReason),
}

impl RouteDecision {
    pub fn is_handled(&self) -> bool {
        matches!(self, RouteDecision::SentViaApi)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassThroughReason {
    OverrideDisabled,
    NoUsageKey,
    ApiFailed(ClientError),
}

#[derive(Debug, Clone)]
pub struct MailRouter {
    client: MailiamClient,
}

impl MailRouter {
    pub fn new(client: MailiamClient) -> Self {
        Self { client }
    }

    /// Decides how `email` is delivered. Never fails: every API error turns
    /// into a pass-through so delivery is not blocked by the remote service.
    pub async fn route(&self, settings: &Settings, email: &Email) -> RouteDecision {
        if !settings.email_override_enabled {
            return RouteDecision::PassThrough(PassThroughReason::OverrideDisabled);
        }

        let Some(usage_key) = settings.usage_key() else {
            return RouteDecision::PassThrough(PassThroughReason::NoUsageKey);
        };

        let message = extract_message(email);

        match self.client.send_transactional_email(usage_key, &message).await {
            Ok(_) => {
                tracing::debug!(subject = %message.subject, "Email sent via Mailiam API");
                RouteDecision::SentViaApi
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    subject = %message.subject,
                    "Mailiam API failed, falling back to default transport"
                );
                RouteDecision::PassThrough(PassThroughReason::ApiFailed(error))
            }
        }
    }
}

/// Builds the API message from an outgoing email.
///
/// Takes the first To and first Reply-To address, every Cc and Bcc address,
/// and the body according to content type: HTML plus optional alternative
/// text, or text only. Attachments are not forwarded.
pub fn extract_message(email: &Email) -> EmailMessage {
    let (html, text) = if email.is_html() {
        (
            email.html_body.clone(),
            email.text_body.clone().filter(|alt| !alt.is_empty()),
        )
    } else {
        (None, email.text_body.clone())
    };

    if email.has_attachments() {
        tracing::warn!(
            count = email.attachments.len(),
            "Email has attachments, which are not forwarded to the Mailiam API"
        );
    }

    EmailMessage {
        from: email.display_from(),
        to: email.to.first().cloned().unwrap_or_default(),
        subject: email.subject.clone(),
        html,
        text,
        reply_to: email.reply_to.first().cloned(),
        cc: email.cc.clone(),
        bcc: email.bcc.clone(),
    }
}
