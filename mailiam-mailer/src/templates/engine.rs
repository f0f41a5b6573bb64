use crate::{MailerError, templates::TemplateVars};
use askama::Template;
use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex pattern"));

static BLANK_LINES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("Invalid blank line regex pattern"));

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>.*?</title>").expect("Invalid title regex pattern"));

#[async_trait]
pub trait TemplateEngine: Send + Sync {
    async fn render_html(&self, template_name: &str, vars: &TemplateVars)
    -> Result<String, MailerError>;

    async fn render_text(&self, template_name: &str, vars: &TemplateVars)
    -> Result<String, MailerError>;
}

/// Renders the compiled-in askama templates.
#[derive(Debug, Clone, Default)]
pub struct AskamaTemplateEngine;

impl AskamaTemplateEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TemplateEngine for AskamaTemplateEngine {
    async fn render_html(
        &self,
        template_name: &str,
        vars: &TemplateVars,
    ) -> Result<String, MailerError> {
        match template_name {
            "test_email" => Ok(crate::templates::TestEmailTemplate::from_vars(vars)?.render()?),
            other => Err(MailerError::UnknownTemplate(other.to_string())),
        }
    }

    async fn render_text(
        &self,
        template_name: &str,
        vars: &TemplateVars,
    ) -> Result<String, MailerError> {
        let html = self.render_html(template_name, vars).await?;
        Ok(html_to_text(&html))
    }
}

/// Rough plain-text rendition of an HTML body for the alternative part.
pub fn html_to_text(html: &str) -> String {
    let text = TITLE_REGEX.replace_all(html, "");
    let text = text
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</div>", "\n")
        .replace("</h1>", "\n\n")
        .replace("</h2>", "\n\n")
        .replace("</h3>", "\n\n");

    let text = TAG_REGEX.replace_all(&text, "");
    let text = BLANK_LINES_REGEX.replace_all(&text, "\n\n");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_test_email() {
        let engine = AskamaTemplateEngine::new();
        let vars = TemplateVars::new()
            .insert("site_name", "Ana's Bakery")
            .insert("site_url", "https://bakery.test");

        let html = engine.render_html("test_email", &vars).await.unwrap();
        assert!(html.contains("Test Email Successful!"));
        assert!(html.contains("https://bakery.test"));

        let text = engine.render_text("test_email", &vars).await.unwrap();
        assert!(text.starts_with("Test Email Successful!"));
        assert!(!text.contains('<'));
    }

    #[tokio::test]
    async fn test_unknown_template() {
        let engine = AskamaTemplateEngine::new();
        let result = engine.render_html("order_completed", &TemplateVars::new()).await;

        assert!(matches!(result, Err(MailerError::UnknownTemplate(name)) if name == "order_completed"));
    }

    #[tokio::test]
    async fn test_missing_site_name() {
        let engine = AskamaTemplateEngine::new();
        let result = engine.render_html("test_email", &TemplateVars::new()).await;

        assert!(matches!(result, Err(MailerError::Builder(_))));
    }

    #[test]
    fn test_html_to_text() {
        let text = html_to_text("<h1>Hi</h1><p>First<br>line</p><p>Second</p>");
        assert_eq!(text, "Hi\n\nFirst\nline\n\nSecond");
    }
}
