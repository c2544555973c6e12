//! Mailer service
//!
//! Transactional email over async SMTP. Callers treat delivery as
//! best-effort: dispatch runs in a spawned task and failures are logged,
//! never returned to the requester.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;

use crate::core::config::MailConfig;

/// Errors that can occur when sending email
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the message
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid address
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Transactional email sender
#[derive(Clone)]
pub struct MailerService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl std::fmt::Debug for MailerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerService")
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

impl MailerService {
    pub fn new(config: &MailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
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

    /// Order confirmation, sent after the order write commits.
    pub async fn send_order_confirmation(
        &self,
        to: &str,
        name: &str,
        order_number: &str,
        amount: f64,
    ) -> Result<(), MailError> {
        let body = format!(
            "Hi {name},\n\n\
             Thank you for shopping with Don Maris Accessories!\n\
             Your order {order_number} (₦{amount:.2}) has been received and is being processed.\n\n\
             Don Maris Accessories"
        );
        self.send_plain(to, &format!("Order {order_number} confirmed"), &body)
            .await
    }

    /// Email-address verification link for a new signup.
    pub async fn send_verification_email(&self, to: &str, token: &str) -> Result<(), MailError> {
        let body = format!(
            "Welcome to Don Maris Accessories!\n\n\
             Use this token to verify your email address (valid for 24 hours):\n\n\
             {token}\n"
        );
        self.send_plain(to, "Verify your email address", &body).await
    }

    /// Password reset token.
    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<(), MailError> {
        let body = format!(
            "A password reset was requested for your account.\n\n\
             Use this token to set a new password (valid for 1 hour):\n\n\
             {token}\n\n\
             If you did not request this, you can ignore this message."
        );
        self.send_plain(to, "Reset your password", &body).await
    }

    async fn send_plain(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
