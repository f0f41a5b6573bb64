use crate::{Email, MailerError};
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};

/// Converts an [`Email`] into a lettre [`Message`] shared by every transport.
pub(crate) fn build_message(email: Email) -> Result<Message, MailerError> {
    let from: Mailbox = email.display_from().parse()?;
    let mut message_builder = Message::builder().from(from).subject(email.subject);

    for to in email.to {
        message_builder = message_builder.to(to.parse()?);
    }

    for cc in email.cc {
        message_builder = message_builder.cc(cc.parse()?);
    }

    for bcc in email.bcc {
        message_builder = message_builder.bcc(bcc.parse()?);
    }

    for reply_to in email.reply_to {
        message_builder = message_builder.reply_to(reply_to.parse()?);
    }

    let html = email.html_body.filter(|html| !html.is_empty());
    let text = email.text_body.filter(|text| !text.is_empty());

    let body = match (html, text) {
        (Some(html), Some(text)) => Body::Multi(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(text))
                .singlepart(SinglePart::html(html)),
        ),
        (Some(html), None) => Body::Single(SinglePart::html(html)),
        (None, Some(text)) => Body::Single(SinglePart::plain(text)),
        (None, None) => {
            return Err(MailerError::Builder("No email body provided".to_string()));
        }
    };

    if email.attachments.is_empty() {
        let message = match body {
            Body::Multi(multipart) => message_builder.multipart(multipart)?,
            Body::Single(part) => message_builder.singlepart(part)?,
        };
        return Ok(message);
    }

    let mut mixed = match body {
        Body::Multi(multipart) => MultiPart::mixed().multipart(multipart),
        Body::Single(part) => MultiPart::mixed().singlepart(part),
    };

    for attachment in email.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            MailerError::Builder(format!(
                "Invalid content type for attachment {}: {e}",
                attachment.filename
            ))
        })?;
        mixed = mixed.singlepart(
            Attachment::new(attachment.filename).body(attachment.content, content_type),
        );
    }

    Ok(message_builder.multipart(mixed)?)
}

enum Body {
    Multi(MultiPart),
    Single(SinglePart),
}
