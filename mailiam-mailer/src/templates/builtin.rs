use crate::{MailerError, templates::TemplateVars};
use askama::Template;
use serde::{Deserialize, Serialize};

/// Site details shared by the built-in templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    pub site_name: String,
    pub site_url: String,
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self {
            site_name: "Your Site".to_string(),
            site_url: "https://example.com".to_string(),
        }
    }
}

impl TemplateContext {
    pub fn to_vars(&self) -> TemplateVars {
        TemplateVars::new()
            .insert("site_name", self.site_name.as_str())
            .insert("site_url", self.site_url.as_str())
    }
}

#[derive(Template)]
#[template(
    source = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Mailiam Test Email - {{ site_name }}</title>
</head>
<body>
    <h1>Test Email Successful!</h1>
    <p>This is a test email from your site (<strong>{{ site_name }}</strong>) using Mailiam.</p>
    <p>Your usage key is working correctly and you can now send transactional emails.</p>
    <div class="footer">
        <p>Sent from <a href="{{ site_url }}">{{ site_url }}</a></p>
    </div>
</body>
</html>
"#,
    ext = "html"
)]
pub struct TestEmailTemplate {
    pub site_name: String,
    pub site_url: String,
}

impl TestEmailTemplate {
    pub fn from_vars(vars: &TemplateVars) -> Result<Self, MailerError> {
        let site_name = vars
            .get("site_name")
            .ok_or_else(|| MailerError::Builder("site_name is required".to_string()))?
            .to_string();

        Ok(Self {
            site_name,
            site_url: vars.get("site_url").unwrap_or_default().to_string(),
        })
    }
}
