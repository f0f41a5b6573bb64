//! Core functionality for Mailiam
//!
//! This crate contains the pieces that talk to the Mailiam service:
//!
//! - [`MailiamClient`], one method per REST operation
//! - [`MailRouter`], which decides whether an outgoing [`Email`] goes through
//!   the API or the default transport, and [`RoutingMailer`] which applies that
//!   decision
//! - the form, transactional and setup services built on top of the client
//! - [`Settings`] and the [`SettingsStore`] trait they are persisted through
//!
//! Nothing here holds global state. Configuration is passed to constructors
//! and settings are passed to each operation.
//!
//! [`Email`]: mailiam_mailer::Email
pub mod client;
pub mod config;
pub mod error;
pub mod router;
pub mod services;
pub mod settings;
pub mod storage;
pub mod validation;

pub use client::{ApiKeySummary, CreatedKey, EmailMessage, FormPayload, MailiamClient};
pub use config::MailiamConfig;
pub use error::{
    ClientError, ConfigError, Error, FormError, SetupError, StorageError, ValidationError,
};
pub use router::{MailRouter, PassThroughReason, RouteDecision, RoutingMailer};
pub use services::{
    FormField, FormResponse, FormService, FormSubmission, SendEmailRequest, SetupService,
    TransactionalService,
};
pub use settings::Settings;
pub use storage::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
