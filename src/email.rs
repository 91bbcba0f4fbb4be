use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use rand::Rng;
use std::sync::Arc;

use crate::config::SmtpConfig;

/// generate_otp
///
/// Returns a 6-digit numeric one-time code (leading zeros allowed).
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    format!("{:06}", rng.gen_range(0..1_000_000))
}

/// Builds the plain-text and HTML bodies of the verification message.
/// Split out from the transport so the wording is testable without SMTP.
pub fn verification_bodies(username: &str, otp: &str) -> (String, String) {
    let text = format!(
        "Hi {username},\n\n\
         Welcome to Assemble! Please verify your email address using the OTP below:\n\n\
         OTP: {otp}\n\n\
         This OTP will expire in 10 minutes.\n\n\
         If you didn't request this, please ignore this email.\n\n\
         Best regards,\n\
         Assemble Team\n"
    );

    let html = format!(
        r#"<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #4F46E5;">Welcome to Assemble!</h2>
        <p>Hi {username},</p>
        <p>Please verify your email address using the OTP below:</p>
        <div style="background: #F3F4F6; padding: 20px; border-radius: 8px; text-align: center; margin: 20px 0;">
            <h1 style="color: #4F46E5; font-size: 36px; margin: 0; letter-spacing: 8px;">{otp}</h1>
        </div>
        <p style="color: #666; font-size: 14px;">This OTP will expire in 10 minutes.</p>
        <p style="color: #666; font-size: 14px;">If you didn't request this, please ignore this email.</p>
        <hr style="border: none; border-top: 1px solid #E5E7EB; margin: 30px 0;">
        <p style="color: #999; font-size: 12px;">Best regards,<br>Assemble Team</p>
    </div>
</body>
</html>"#
    );

    (text, html)
}

/// Mailer Contract
///
/// Abstracts the verification-mail side-channel so handlers and tests never
/// touch a real SMTP relay. Implementations must never propagate an error past
/// this boundary: a failed send is logged and reported as `false`.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_code(&self, to: &str, username: &str, otp: &str) -> bool;
}

/// MailerState
///
/// The concrete type used to share the mail collaborator across the application state.
pub type MailerState = Arc<dyn Mailer>;

/// SmtpMailer
///
/// The real implementation, sending a two-part (plain + HTML) message through
/// the relay described by the immutable `SmtpConfig` loaded at startup.
#[derive(Clone)]
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    async fn send(&self, to: &str, username: &str, otp: &str) -> Result<(), String> {
        if self.config.username.is_empty() || self.config.password.is_empty() {
            return Err("SMTP credentials not configured".to_string());
        }

        let from: Mailbox = self
            .config
            .from_email
            .parse()
            .map_err(|e| format!("Invalid from address: {}", e))?;
        let to: Mailbox = to
            .parse()
            .map_err(|e| format!("Invalid to address: {}", e))?;

        let (text, html) = verification_bodies(username, otp);

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject("Verify Your Email - Assemble Platform")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .map_err(|e| format!("Failed to build message: {}", e))?;

        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|e| format!("Invalid SMTP relay: {}", e))?
            .credentials(creds)
            .port(self.config.port)
            .build();

        mailer
            .send(message)
            .await
            .map_err(|e| format!("SMTP send failed: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification_code(&self, to: &str, username: &str, otp: &str) -> bool {
        match self.send(to, username, otp).await {
            Ok(()) => {
                tracing::info!("OTP email sent successfully to {}", to);
                true
            }
            Err(e) => {
                tracing::error!("Failed to send OTP email: {}", e);
                false
            }
        }
    }
}

/// MockMailer
///
/// Test double: records nothing, just succeeds or fails on demand.
#[derive(Clone)]
pub struct MockMailer {
    pub should_fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_verification_code(&self, _to: &str, _username: &str, _otp: &str) -> bool {
        !self.should_fail
    }
}
