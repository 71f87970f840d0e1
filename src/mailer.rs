//! Outgoing email over SMTP

use crate::config::SmtpConfig;
use async_trait::async_trait;
use mail_send::{mail_builder::MessageBuilder, Credentials, SmtpClientBuilder};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// A plain-text notification
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Failed to connect to SMTP server: {0}")]
    Connect(String),

    #[error("Failed to send email: {0}")]
    Send(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

pub fn smtp_mailer(config: &SmtpConfig) -> Arc<dyn Mailer> {
    Arc::new(SmtpMailer {
        config: config.clone(),
    })
}

pub struct SmtpMailer {
    config: SmtpConfig,
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = MessageBuilder::new()
            .from((self.config.from_name.as_str(), self.config.from_address.as_str()))
            .to(email.to.as_str())
            .subject(email.subject.as_str())
            .text_body(email.body.as_str());

        let mut client = SmtpClientBuilder::new(self.config.host.as_str(), self.config.port)
            .implicit_tls(self.config.implicit_tls);
        if !self.config.username.is_empty() {
            client = client.credentials(Credentials::new(
                self.config.username.as_str(),
                self.config.password.as_str(),
            ));
        }

        client
            .connect()
            .await
            .map_err(|e| MailError::Connect(e.to_string()))?
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        info!("Email sent to {}: {}", email.to, email.subject);
        Ok(())
    }
}
