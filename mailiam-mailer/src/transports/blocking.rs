use crate::MailerError;
use lettre::{Message, Transport};

/// Runs one of lettre's synchronous transports on the blocking pool.
pub(crate) async fn send_blocking<T>(transport: T, message: Message) -> Result<(), MailerError>
where
    T: Transport + Send + 'static,
    T::Error: Send + 'static,
    MailerError: From<T::Error>,
{
    tokio::task::spawn_blocking(move || transport.send(&message).map(|_| ()))
        .await
        .map_err(|e| MailerError::Builder(format!("Failed to send email: {e}")))??;

    Ok(())
}
