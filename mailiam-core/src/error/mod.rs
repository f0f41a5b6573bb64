use mailiam_mailer::MailerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("API client error: {0}")]
    Client(#[from] ClientError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Form error: {0}")]
    Form(#[from] FormError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Mailer error: {0}")]
    Mailer(#[from] MailerError),
}

/// Outcome of a failed call to the Mailiam API.
///
/// `Transport` means no HTTP response was received; the other variants carry
/// the status the service answered with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("{message} (status {status})")]
    InvalidKey { status: u16, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::InvalidKey { status, .. } => {
                Some(*status)
            }
            ClientError::Transport { .. } | ClientError::Validation(_) => None,
        }
    }

    /// The message without the status suffix.
    pub fn message(&self) -> String {
        match self {
            ClientError::Transport { message }
            | ClientError::Api { message, .. }
            | ClientError::InvalidKey { message, .. } => message.clone(),
            ClientError::Validation(e) => e.to_string(),
        }
    }
}

/// A local precondition that failed before any network call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Email must have either HTML or text content")]
    MissingContent,

    #[error("Public key must start with mlm_pk_")]
    InvalidPublicKey,

    #[error("Usage key must start with mlm_sk_")]
    InvalidUsageKey,

    #[error(
        "Usage key must be a server-side key (mlm_sk_*). Public keys (mlm_pk_*) cannot be used for transactional emails."
    )]
    ServerKeyRequired,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Mailiam is not properly configured.")]
    FormsNotConfigured,

    #[error(
        "Transactional emails not configured. Please add a usage API key in Settings > Mailiam."
    )]
    TransactionalNotConfigured,

    #[error("No public key configured")]
    MissingPublicKey,

    #[error("No usage key configured")]
    MissingUsageKey,

    #[error("No admin API key available to manage public keys")]
    MissingApiKey,

    #[error("Invalid site URL: {0}")]
    InvalidSiteUrl(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Spam detected.")]
    Spam,

    #[error(transparent)]
    NotConfigured(#[from] ConfigError),

    /// The remote call failed. `message` is the text meant for the visitor,
    /// `source` the detail meant for logs.
    #[error("Form submission failed: {source}")]
    Rejected {
        message: String,
        #[source]
        source: ClientError,
    },
}

impl FormError {
    pub fn user_message(&self) -> String {
        match self {
            FormError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Failures of the admin setup operations. The messages are the ones shown to
/// the site owner.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid public key: {}", .0.message())]
    InvalidPublicKey(#[source] ClientError),

    #[error("Invalid usage key: {}", .0.message())]
    InvalidUsageKey(#[source] ClientError),

    #[error("Invalid API key: {}", .0.message())]
    InvalidApiKey(#[source] ClientError),

    #[error("Failed to create public key: {}", .0.message())]
    CreatePublicKey(#[source] ClientError),

    #[error("Failed to send test email: {}", .0.message())]
    TestEmail(#[source] ClientError),

    #[error("Failed to build test email: {0}")]
    Template(#[from] MailerError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
