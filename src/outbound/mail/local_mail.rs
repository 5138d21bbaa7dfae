use async_trait::async_trait;

use crate::domain::notification::{
    models::{MailAddress, MailMessage},
    ports::{MailError, MailService},
};

/// Development mail sender: writes the mail to the log instead of delivering it.
#[derive(Debug, Clone)]
pub struct LocalMailService {
    mail_to: MailAddress,
    mail_from: MailAddress,
}

impl LocalMailService {
    pub fn new(mail_to: MailAddress, mail_from: MailAddress) -> Self {
        Self { mail_to, mail_from }
    }
}

#[async_trait]
impl MailService for LocalMailService {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            mail_from = %self.mail_from,
            mail_to = %self.mail_to,
            subject = message.subject(),
            body = message.body(),
            "Mail sent with LocalMailService"
        );
        Ok(())
    }
}
