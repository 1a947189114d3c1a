//! Outgoing mail: an SMTP transport for production and a log-only
//! transport for development setups without credentials.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::error::AuthError;

/// A rendered HTML email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, mail: OutgoingMail) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// SMTP settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".into(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_email: "noreply@inventory.com".into(),
            from_name: "Inventory System".into(),
        }
    }
}

impl SmtpConfig {
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    fn sender(&self) -> Result<Mailbox, AuthError> {
        let address = self
            .from_email
            .parse()
            .map_err(|e| AuthError::Mail(format!("invalid sender address: {e}")))?;
        Ok(Mailbox::new(Some(self.from_name.clone()), address))
    }
}

/// STARTTLS relay with username/password authentication.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, AuthError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AuthError::Mail(format!("SMTP relay setup: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.sender()?,
        })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AuthError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| AuthError::Mail(format!("invalid recipient: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject)
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body)
            .map_err(|e| AuthError::Mail(format!("message build: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthError::Mail(e.to_string()))?;

        info!(to = %mail.to, "Email sent");
        Ok(())
    }
}

/// Development transport: writes the message to the log instead of
/// sending it.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AuthError> {
        info!(
            to = %mail.to,
            subject = %mail.subject,
            body = %mail.html_body,
            "Email (development mode, not sent)"
        );
        Ok(())
    }
}

/// The transport picked at startup from the SMTP settings.
#[derive(Clone)]
pub enum ConfiguredMailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl ConfiguredMailer {
    /// SMTP when both credentials are set, the log transport otherwise.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, AuthError> {
        if config.has_credentials() {
            info!(host = %config.host, port = config.port, "Using SMTP mail transport");
            Ok(Self::Smtp(SmtpMailer::new(config)?))
        } else {
            info!("SMTP credentials not set; emails will be logged");
            Ok(Self::Log(LogMailer))
        }
    }
}

impl Mailer for ConfiguredMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), AuthError> {
        match self {
            Self::Smtp(m) => m.send(mail).await,
            Self::Log(m) => m.send(mail).await,
        }
    }
}
