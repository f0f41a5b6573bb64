mod builtin;
mod engine;
mod placeholder;

pub use builtin::{TemplateContext, TestEmailTemplate};
pub use engine::{AskamaTemplateEngine, TemplateEngine, html_to_text};
pub use placeholder::{TemplateVars, render_template};
