use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Key and form-input validation for Mailiam.
///
/// Key prefixes tell the two key families apart: public keys are safe to
/// expose to browsers and may only submit forms, server keys can send
/// arbitrary transactional email and manage other keys.
pub const PUBLIC_KEY_PREFIX: &str = "mlm_pk_";
pub const SERVER_KEY_PREFIX: &str = "mlm_sk_";

/// Reserved honeypot field name in form payloads.
pub const HONEYPOT_FIELD: &str = "pooh-bear";

static SCRIPT_STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)[^>]*>.*?</(?:script|style)>")
        .expect("Invalid script/style regex pattern")
});

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex pattern"));

static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t ]+").expect("Invalid whitespace regex pattern"));

static OCTET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[a-fA-F0-9]{2}").expect("Invalid octet regex pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// `mlm_pk_*`, domain scoped, forms only
    Public,
    /// `mlm_sk_*`, admin or usage key
    Server,
}

/// Classifies an API key by its prefix.
///
/// # Examples
///
/// ```rust
/// use mailiam_core::validation::{KeyKind, key_kind};
///
/// assert_eq!(key_kind("mlm_pk_123"), Some(KeyKind::Public));
/// assert_eq!(key_kind("mlm_sk_123"), Some(KeyKind::Server));
/// assert_eq!(key_kind("sk_live_123"), None);
/// ```
pub fn key_kind(key: &str) -> Option<KeyKind> {
    if key.starts_with(PUBLIC_KEY_PREFIX) {
        Some(KeyKind::Public)
    } else if key.starts_with(SERVER_KEY_PREFIX) {
        Some(KeyKind::Server)
    } else {
        None
    }
}

pub fn validate_public_key(key: &str) -> Result<(), ValidationError> {
    match key_kind(key) {
        Some(KeyKind::Public) => Ok(()),
        _ => Err(ValidationError::InvalidPublicKey),
    }
}

pub fn validate_usage_key(key: &str) -> Result<(), ValidationError> {
    match key_kind(key) {
        Some(KeyKind::Server) => Ok(()),
        _ => Err(ValidationError::InvalidUsageKey),
    }
}

/// Sanitizes a form field name or form id.
///
/// Lowercases and keeps only ASCII letters, digits, `_` and `-`.
///
/// # Examples
///
/// ```rust
/// use mailiam_core::validation::sanitize_key;
///
/// assert_eq!(sanitize_key("Your Email!"), "youremail");
/// assert_eq!(sanitize_key("pooh-bear"), "pooh-bear");
/// ```
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect()
}

/// Sanitizes a single-line text value from a form.
///
/// - Removes `<script>`/`<style>` blocks and all other tags
/// - Collapses line breaks, tabs and runs of spaces into one space
/// - Removes percent-encoded octets
/// - Trims the result
///
/// # Examples
///
/// ```rust
/// use mailiam_core::validation::sanitize_text_field;
///
/// assert_eq!(sanitize_text_field("  <b>Hi</b>\n\tthere "), "Hi there");
/// ```
pub fn sanitize_text_field(value: &str) -> String {
    let value = SCRIPT_STYLE_REGEX.replace_all(value, "");
    let value = TAG_REGEX.replace_all(&value, "");
    let value = WHITESPACE_REGEX.replace_all(&value, " ");
    let mut value = value.trim().to_string();

    if OCTET_REGEX.is_match(&value) {
        value = OCTET_REGEX.replace_all(&value, "").to_string();
        value = WHITESPACE_REGEX.replace_all(value.trim(), " ").to_string();
    }

    value
}
