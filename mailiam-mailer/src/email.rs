use crate::MailerError;
use serde::{Deserialize, Serialize};

/// A file attached to an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new<F, C>(filename: F, content_type: C, content: Vec<u8>) -> Self
    where
        F: Into<String>,
        C: Into<String>,
    {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content,
        }
    }
}

/// An outgoing email as composed by the host application.
///
/// `html_body` being present means the message is `text/html`, with
/// `text_body` acting as the alternative plain-text part. Without an HTML
/// body the message is plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub from: String,
    pub from_name: Option<String>,
    pub reply_to: Vec<String>,
    pub subject: String,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Email {
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }

    pub fn validate(&self) -> Result<(), MailerError> {
        if self.to.is_empty() {
            return Err(MailerError::Builder(
                "At least one recipient is required".to_string(),
            ));
        }

        if self.from.is_empty() {
            return Err(MailerError::Builder("From address is required".to_string()));
        }

        if self.subject.is_empty() {
            return Err(MailerError::Builder("Subject is required".to_string()));
        }

        if !self.is_html() && !has_content(&self.text_body) {
            return Err(MailerError::Builder(
                "Either HTML or text body is required".to_string(),
            ));
        }

        Ok(())
    }

    /// The sender formatted for display, `Name <address>` when a name is set.
    pub fn display_from(&self) -> String {
        match self.from_name.as_deref() {
            Some(name) if !name.trim().is_empty() => format!("{} <{}>", name, self.from),
            _ => self.from.clone(),
        }
    }

    pub fn is_html(&self) -> bool {
        has_content(&self.html_body)
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Drops every recipient, reply-to and attachment.
    ///
    /// Used by hosts that hand the same message to their default transport
    /// after it was delivered elsewhere, so that transport has nothing to do.
    pub fn clear_delivery_state(&mut self) {
        self.to.clear();
        self.cc.clear();
        self.bcc.clear();
        self.reply_to.clear();
        self.attachments.clear();
    }

    pub fn has_recipients(&self) -> bool {
        !(self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty())
    }
}

fn has_content(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

#[derive(Debug, Default)]
pub struct EmailBuilder {
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    from: Option<String>,
    from_name: Option<String>,
    reply_to: Vec<String>,
    subject: Option<String>,
    html_body: Option<String>,
    text_body: Option<String>,
    attachments: Vec<Attachment>,
}

impl EmailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to<S: Into<String>>(mut self, email: S) -> Self {
        self.to.push(email.into());
        self
    }

    pub fn to_multiple<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.to.extend(emails.into_iter().map(Into::into));
        self
    }

    pub fn cc<S: Into<String>>(mut self, email: S) -> Self {
        self.cc.push(email.into());
        self
    }

    pub fn bcc<S: Into<String>>(mut self, email: S) -> Self {
        self.bcc.push(email.into());
        self
    }

    pub fn from<S: Into<String>>(mut self, email: S) -> Self {
        self.from = Some(email.into());
        self
    }

    pub fn from_name<S: Into<String>>(mut self, name: S) -> Self {
        self.from_name = Some(name.into());
        self
    }

    pub fn reply_to<S: Into<String>>(mut self, email: S) -> Self {
        self.reply_to.push(email.into());
        self
    }

    pub fn subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn html_body<S: Into<String>>(mut self, html: S) -> Self {
        self.html_body = Some(html.into());
        self
    }

    pub fn text_body<S: Into<String>>(mut self, text: S) -> Self {
        self.text_body = Some(text.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn build(self) -> Result<Email, MailerError> {
        let email = Email {
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            from: self
                .from
                .ok_or_else(|| MailerError::Builder("From address is required".to_string()))?,
            from_name: self.from_name,
            reply_to: self.reply_to,
            subject: self
                .subject
                .ok_or_else(|| MailerError::Builder("Subject is required".to_string()))?,
            html_body: self.html_body,
            text_body: self.text_body,
            attachments: self.attachments,
        };

        email.validate()?;
        Ok(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_builder() {
        let email = Email::builder()
            .from("sender@example.com")
            .from_name("Shop")
            .to("recipient@example.com")
            .reply_to("support@example.com")
            .subject("Test Subject")
            .text_body("Test content")
            .build()
            .unwrap();

        assert_eq!(email.from, "sender@example.com");
        assert_eq!(email.to, vec!["recipient@example.com"]);
        assert_eq!(email.reply_to, vec!["support@example.com"]);
        assert_eq!(email.subject, "Test Subject");
        assert_eq!(email.text_body, Some("Test content".to_string()));
        assert!(!email.is_html());
    }

    #[test]
    fn test_email_validation() {
        let result = Email::builder()
            .from("sender@example.com")
            .subject("Test")
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_empty_bodies_are_rejected() {
        let result = Email::builder()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Test")
            .html_body("")
            .text_body("")
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_display_from() {
        let mut email = Email {
            from: "orders@shop.test".to_string(),
            ..Default::default()
        };
        assert_eq!(email.display_from(), "orders@shop.test");

        email.from_name = Some("Shop".to_string());
        assert_eq!(email.display_from(), "Shop <orders@shop.test>");

        email.from_name = Some("  ".to_string());
        assert_eq!(email.display_from(), "orders@shop.test");
    }

    #[test]
    fn test_serialized_email_fields() {
        let email = Email::builder()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Hello")
            .text_body("Hi")
            .build()
            .unwrap();

        let value = serde_json::to_value(&email).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec![
                "attachments",
                "bcc",
                "cc",
                "from",
                "from_name",
                "html_body",
                "reply_to",
                "subject",
                "text_body",
                "to",
            ]
        );
    }

    #[test]
    fn test_clear_delivery_state() {
        let mut email = Email::builder()
            .from("sender@example.com")
            .to("a@example.com")
            .cc("b@example.com")
            .bcc("c@example.com")
            .reply_to("d@example.com")
            .subject("Hello")
            .html_body("<p>Hi</p>")
            .attachment(Attachment::new("a.txt", "text/plain", b"a".to_vec()))
            .build()
            .unwrap();

        email.clear_delivery_state();

        assert!(!email.has_recipients());
        assert!(email.reply_to.is_empty());
        assert!(!email.has_attachments());
        assert_eq!(email.subject, "Hello");
        assert_eq!(email.html_body.as_deref(), Some("<p>Hi</p>"));
    }
}
