use crate::client::{EmailMessage, MailiamClient};
use crate::error::{ConfigError, Error};
use crate::settings::Settings;
use mailiam_mailer::{TemplateVars, render_template};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Arguments of a programmatic transactional send.
///
/// When `template` is set and `data` is non-empty, `subject`, `html` and
/// `text` are rendered with `{{name}}` substitution before sending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SendEmailRequest {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
    pub reply_to: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub cc: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub bcc: Vec<String>,
    pub template: Option<String>,
    pub data: TemplateVars,
}

impl SendEmailRequest {
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

    pub fn html<S: Into<String>>(mut self, html: S) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn template<S: Into<String>>(mut self, name: S, data: TemplateVars) -> Self {
        self.template = Some(name.into());
        self.data = data;
        self
    }

    fn uses_template(&self) -> bool {
        self.template.as_deref().is_some_and(|t| !t.is_empty()) && !self.data.is_empty()
    }
}

/// Accepts either a single address or a list, as hosts pass both.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(address)) if address.is_empty() => Vec::new(),
        Some(OneOrMany::One(address)) => vec![address],
        Some(OneOrMany::Many(addresses)) => addresses,
    })
}

#[derive(Debug, Clone)]
pub struct TransactionalService {
    client: MailiamClient,
}

impl TransactionalService {
    pub fn new(client: MailiamClient) -> Self {
        Self { client }
    }

    /// Turns a request into the wire message, rendering templates and
    /// leaving out empty optional fields.
    pub fn prepare(&self, request: &SendEmailRequest) -> EmailMessage {
        let render = |value: &str| {
            if request.uses_template() {
                render_template(value, &request.data)
            } else {
                value.to_string()
            }
        };
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| render(v))
        };

        EmailMessage {
            from: request.from.clone(),
            to: request.to.clone(),
            subject: render(&request.subject),
            html: non_empty(&request.html),
            text: non_empty(&request.text),
            reply_to: request.reply_to.clone().filter(|r| !r.is_empty()),
            cc: request.cc.clone(),
            bcc: request.bcc.clone(),
        }
    }

    pub async fn send(&self, settings: &Settings, request: &SendEmailRequest) -> Result<Value, Error> {
        let Some(usage_key) = settings.usage_key() else {
            return Err(ConfigError::TransactionalNotConfigured.into());
        };

        let message = self.prepare(request);
        self.client
            .send_transactional_email(usage_key, &message)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, to = %message.to, "Mailiam send error");
                e.into()
            })
    }
}
