use crate::{
    Email, MailerError,
    templates::{TemplateContext, TemplateEngine},
};

/// The message sent when an administrator checks that a usage key can send
/// transactional email.
pub struct TestEmail;

impl TestEmail {
    pub async fn build<T: TemplateEngine>(
        engine: &T,
        from: &str,
        to: &str,
        context: &TemplateContext,
    ) -> Result<Email, MailerError> {
        let vars = context.to_vars();

        let html_body = engine.render_html("test_email", &vars).await?;
        let text_body = engine.render_text("test_email", &vars).await?;

        Email::builder()
            .from(from)
            .to(to)
            .subject(format!("Mailiam Test Email - {}", context.site_name))
            .html_body(html_body)
            .text_body(text_body)
            .build()
    }
}
