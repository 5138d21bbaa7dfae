use async_trait::async_trait;

use super::models::MailMessage;

/// Sends operational notifications, such as a deleted point of interest, to
/// the configured mailbox.
#[async_trait]
pub trait MailService: Send + Sync + 'static {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

#[derive(thiserror::Error, Debug)]
pub enum MailError {
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}
