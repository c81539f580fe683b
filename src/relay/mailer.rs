//! Outbound lead mail — SMTP via lettre, or log-only when SMTP is off.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use super::store::LeadRecord;
use crate::config::{OwnerConfig, SmtpConfig};
use crate::error::MailError;

/// A plain-text email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
}

/// Delivers one email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Notification to the site owner about a new lead.
pub fn compose_admin_notice(record: &LeadRecord, owner: &OwnerConfig) -> OutgoingMail {
    let body = format!(
        "New Portfolio Interaction:\n\n\
         Name: {}\nEmail: {}\nCompany: {}\nRole: {}\nLooking For: {}\nDetails: {}",
        record.name, record.email, record.company, record.role, record.intent, record.details
    );
    OutgoingMail {
        to: owner.email.clone(),
        subject: format!("New Lead: {} - {}", record.name, record.company),
        body,
        reply_to: Some(record.email.clone()),
    }
}

/// Acknowledgment sent back to the visitor.
pub fn compose_acknowledgment(record: &LeadRecord, owner: &OwnerConfig) -> OutgoingMail {
    let body = format!(
        "Hi {},\n\nI have received your inquiry regarding {}. \
         My assistant is now available to answer your questions.\n\nBest,\n{}",
        record.name, record.intent, owner.name
    );
    OutgoingMail {
        to: record.email.clone(),
        subject: format!("Thank you for reaching out, {}", record.name),
        body,
        reply_to: Some(record.email.clone()),
    }
}

/// SMTP delivery.
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, mail: &OutgoingMail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.config.from_address)?)
            .to(parse_mailbox(&mail.to)?)
            .subject(mail.subject.as_str());
        if let Some(ref reply_to) = mail.reply_to {
            builder = builder.reply_to(parse_mailbox(reply_to)?);
        }
        builder
            .body(mail.body.clone())
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        let message = self.build_message(&mail)?;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || {
            let creds = Credentials::new(
                config.username.clone(),
                config.password.expose_secret().to_string(),
            );
            let transport = SmtpTransport::relay(&config.host)
                .map_err(|e| MailError::Send(format!("SMTP relay error: {e}")))?
                .port(config.port)
                .credentials(creds)
                .build();
            transport
                .send(&message)
                .map_err(|e| MailError::Send(e.to_string()))?;
            Ok::<(), MailError>(())
        })
        .await
        .map_err(|e| MailError::Send(format!("SMTP task panicked: {e}")))??;

        tracing::info!(to = %mail.to, "Email sent");
        Ok(())
    }
}

/// Stand-in used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        tracing::info!(
            to = %mail.to,
            subject = %mail.subject,
            "SMTP disabled, email not delivered"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::InvalidAddress {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
