//! Invoice notification gateway.
//!
//! Sends invoice emails with file attachments over SMTP via lettre. The
//! [`NotificationGateway`] trait is the seam the customer service talks to,
//! so tests can substitute a stub transport.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use gardu_core::EmailList;

use crate::config::EmailConfig;
use crate::services::storage::StagedFile;

/// Errors that can occur when sending an invoice notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid attachment content type.
    #[error("Invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    /// A staged attachment could not be read from disk.
    #[error("Failed to read attachment {path}: {source}")]
    Attachment {
        /// Path of the unreadable staged file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Transport seam for sending invoice emails.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Send one invoice email to every address in `to`, with each staged
    /// file attached.
    async fn send_invoice(
        &self,
        to: &EmailList,
        subject: &str,
        body: &str,
        attachments: &[StagedFile],
    ) -> Result<(), NotificationError>;
}

/// SMTP-backed notification gateway.
#[derive(Clone)]
pub struct SmtpNotificationGateway {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotificationGateway {
    /// Create a new gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl NotificationGateway for SmtpNotificationGateway {
    async fn send_invoice(
        &self,
        to: &EmailList,
        subject: &str,
        body: &str,
        attachments: &[StagedFile],
    ) -> Result<(), NotificationError> {
        let mut parts = Vec::with_capacity(attachments.len());
        for staged in attachments {
            let contents =
                tokio::fs::read(&staged.path)
                    .await
                    .map_err(|source| NotificationError::Attachment {
                        path: staged.path.clone(),
                        source,
                    })?;
            parts.push((staged.file_name.clone(), contents));
        }

        let email = build_invoice_message(&self.from_address, to, subject, body, parts)?;

        self.mailer.send(email).await?;

        tracing::info!(
            to = %to,
            subject = %subject,
            attachments = attachments.len(),
            "Invoice email sent"
        );
        Ok(())
    }
}

/// Build the invoice message: a plain-text body plus one attachment per file.
fn build_invoice_message(
    from_address: &str,
    to: &EmailList,
    subject: &str,
    body: &str,
    attachments: Vec<(String, Vec<u8>)>,
) -> Result<Message, NotificationError> {
    let mut builder = Message::builder()
        .from(
            from_address
                .parse()
                .map_err(|_| NotificationError::InvalidAddress(from_address.to_string()))?,
        )
        .subject(subject);

    for address in to {
        let mailbox: Mailbox = address
            .as_str()
            .parse()
            .map_err(|_| NotificationError::InvalidAddress(address.to_string()))?;
        builder = builder.to(mailbox);
    }

    let mut multipart = MultiPart::mixed().singlepart(
        SinglePart::builder()
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string()),
    );

    let content_type = ContentType::parse("application/octet-stream")?;
    for (file_name, contents) in attachments {
        multipart = multipart.singlepart(
            Attachment::new(file_name).body(contents, content_type.clone()),
        );
    }

    Ok(builder.multipart(multipart)?)
}
