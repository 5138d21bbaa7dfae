use crate::configuration::CloudMailSettings;
use crate::domain::notification::{
    models::{MailAddress, MailMessage},
    ports::{MailError, MailService},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// Production mail sender backed by a Postmark-style HTTP API.
#[derive(Debug, Clone)]
pub struct CloudMailService {
    http_client: Client,
    base_url: String,
    mail_to: MailAddress,
    mail_from: MailAddress,
    authorization_token: Secret<String>,
}

impl CloudMailService {
    pub fn new(
        configuration: &CloudMailSettings,
        mail_to: MailAddress,
        mail_from: MailAddress,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder()
            .timeout(configuration.timeout())
            .build()
            .context("Failed to build the mail HTTP client")?;
        Ok(Self {
            http_client,
            base_url: configuration.base_url.clone(),
            mail_to,
            mail_from,
            authorization_token: configuration.authorization_token.clone(),
        })
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
}

#[async_trait]
impl MailService for CloudMailService {
    #[tracing::instrument(
        name = "Send a mail with CloudMailService",
        skip(self, message),
        fields(subject = message.subject())
    )]
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let url = format!("{}/email", self.base_url);
        let request_body = SendEmailRequest {
            from: self.mail_from.as_ref(),
            to: self.mail_to.as_ref(),
            subject: message.subject(),
            text_body: message.body(),
        };
        self.http_client
            .post(&url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await
            .context("Failed to reach the mail API")?
            .error_for_status()
            .context("The mail API rejected the request")?;

        Ok(())
    }
}
