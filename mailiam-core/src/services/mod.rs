//! Service layer for the operations a host exposes
//!
//! Services are stateless over [`Settings`](crate::Settings): they receive the
//! current record, call the API client and either return a result or, for the
//! setup operations, the updated record for the caller to persist.

pub mod form;
pub mod setup;
pub mod transactional;

pub use form::{FormField, FormResponse, FormService, FormSubmission};
pub use setup::SetupService;
pub use transactional::{SendEmailRequest, TransactionalService};
