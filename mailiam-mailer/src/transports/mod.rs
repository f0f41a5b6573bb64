mod blocking;
mod file;
mod message;
mod sendmail;
pub mod smtp;

pub use file::FileTransport;
pub use sendmail::SendmailTransport;
pub use smtp::{SmtpTransport, TlsConfig};

pub(crate) use message::build_message;
