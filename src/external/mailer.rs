use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP 邮件发送服务
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let from_address: Mailbox = config
            .from_email
            .parse()
            .map_err(|_| AppError::ConfigError("Invalid SMTP from address".to_string()))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::ConfigError(format!("Failed to build SMTP transport: {e}")))?;

        if let Some(port) = config.port {
            builder = builder.port(port);
        }
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from_address,
        })
    }

    pub async fn send(&self, to_email: &str, subject: &str, body: &str) -> AppResult<()> {
        let to_mailbox: Mailbox = to_email
            .parse()
            .map_err(|_| AppError::ValidationError("Invalid recipient email address".to_string()))?;

        let message = Message::builder()
            .from(self.from_address.clone())
            .to(to_mailbox)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| AppError::InternalError(format!("Failed to build email message: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}
