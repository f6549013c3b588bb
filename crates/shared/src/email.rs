//! Email delivery for one-time passwords.
//!
//! Uses `lettre` for SMTP transport. The [`OtpMailer`] trait is the seam the
//! auth service depends on, so tests can swap in a recording mailer.

use async_trait::async_trait;
use chrono::Duration;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::MultiPart,
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::info;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Delivers one-time passwords to users.
#[async_trait]
pub trait OtpMailer: Send + Sync {
    /// Sends `otp` to `to_email`, stating that it expires after `valid_for`.
    async fn send_otp(
        &self,
        to_email: &str,
        otp: &str,
        valid_for: Duration,
    ) -> Result<(), EmailError>;
}

/// Human wording for a code lifetime, e.g. `10 minutes` or `90 seconds`.
fn describe_lifetime(valid_for: Duration) -> String {
    let secs = valid_for.num_seconds().max(0);
    let (count, unit) = if secs >= 60 && secs % 60 == 0 {
        (secs / 60, "minute")
    } else {
        (secs, "second")
    };
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

const OTP_SUBJECT: &str = "Your Mudra-Plan Verification Code";

/// SMTP-backed email service.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    ///
    /// Without credentials the transport talks plain SMTP, which is what local
    /// mail catchers expect.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        if self.config.smtp_username.is_empty() {
            return Ok(
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.smtp_host)
                    .port(self.config.smtp_port)
                    .build(),
            );
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }

    /// Builds the OTP message without sending it.
    fn build_otp_message(
        &self,
        to_email: &str,
        otp: &str,
        valid_for: Duration,
    ) -> Result<Message, EmailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let lifetime = describe_lifetime(valid_for);

        let plain = format!(
            "Your Mudra-Plan one-time password is: {otp}\n\n\
             This code is valid for {lifetime}.\n\n\
             If you did not request this code, please ignore this email."
        );
        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto;">
  <h1 style="background-color: #059669; color: white; padding: 20px; text-align: center;">Mudra-Plan Email Verification</h1>
  <p style="text-align: center;">Your One-Time Password (OTP) is:</p>
  <p style="font-size: 42px; font-weight: bold; letter-spacing: 8px; text-align: center; color: #059669;">{otp}</p>
  <p style="text-align: center;">This code is valid for <strong>{lifetime}</strong>.</p>
  <p style="text-align: center; color: #777;">If you did not request this code, please ignore this email.</p>
</div>"#
        );

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?,
            )
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(OTP_SUBJECT)
            .multipart(MultiPart::alternative_plain_html(plain, html))
            .map_err(|e| EmailError::BuildError(e.to_string()))
    }
}

#[async_trait]
impl OtpMailer for EmailService {
    async fn send_otp(
        &self,
        to_email: &str,
        otp: &str,
        valid_for: Duration,
    ) -> Result<(), EmailError> {
        let email = self.build_otp_message(to_email, otp, valid_for)?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        info!(to = %to_email, "OTP email sent");
        Ok(())
    }
}
