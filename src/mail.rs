//! Outbound email over an authenticated SMTP relay. Delivery is best-effort
//! plaintext; failures surface to the caller as internal errors.

use crate::config::Config;
use crate::error::AppError;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Builds the relay transport from configuration. No connection is made
    /// until the first send.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();
        let from = config.mail_from.parse::<Mailbox>()?;
        Ok(Self { transport, from })
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AppError> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(to.parse::<Mailbox>()?)
            .subject(subject)
            .body(body.to_string())?;
        self.transport.send(email).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "postgres://unused".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            jwt_secret: "secret".to_string(),
            access_token_ttl_hours: 1,
            refresh_token_ttl_days: 7,
            smtp_host: "smtp.example.com".to_string(),
            smtp_username: "mailer@example.com".to_string(),
            smtp_password: "hunter2".to_string(),
            mail_from: "Questlog <mailer@example.com>".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
        }
    }

    #[tokio::test]
    async fn test_mailer_builds_from_config() {
        assert!(Mailer::from_config(&config()).is_ok());
    }

    #[tokio::test]
    async fn test_mailer_rejects_malformed_sender() {
        let mut config = config();
        config.mail_from = "not an address".to_string();
        assert!(Mailer::from_config(&config).is_err());
    }
}
