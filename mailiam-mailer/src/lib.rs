//! Email message model and default transports for Mailiam.
//!
//! [`Email`] is the snapshot of an outgoing message that the mail router
//! inspects. The lettre-backed transports implement [`Mailer`] and act as
//! the default delivery path whenever a message is not handled by the
//! Mailiam API. [`render_template`] provides the `{{var}}` substitution
//! used by transactional sends.
pub mod config;
pub mod email;
pub mod email_types;
pub mod error;
pub mod mailer;
pub mod templates;
pub mod transports;

pub use config::{MailerConfig, TransportConfig};
pub use email::{Attachment, Email, EmailBuilder};
pub use email_types::TestEmail;
pub use error::MailerError;
pub use mailer::Mailer;
pub use templates::{
    AskamaTemplateEngine, TemplateContext, TemplateEngine, TemplateVars, render_template,
};
pub use transports::{FileTransport, SendmailTransport, SmtpTransport};

pub mod prelude {
    pub use crate::{
        AskamaTemplateEngine, Attachment, Email, EmailBuilder, FileTransport, Mailer,
        MailerConfig, MailerError, SendmailTransport, SmtpTransport, TemplateContext,
        TemplateEngine, TemplateVars, TestEmail, render_template,
    };
}
