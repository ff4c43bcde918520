//! SMTP email sender backed by lettre

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::EmailSender;

/// SMTP connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: Option<String>,
}

impl SmtpConfig {
    /// Build from `SMTP_*` environment variables. Returns `None` unless
    /// host, username, password and from-address are all present.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let username = std::env::var("SMTP_USERNAME").ok()?;
        let password = std::env::var("SMTP_PASSWORD").ok()?;
        let from_email = std::env::var("SMTP_FROM_EMAIL").ok()?;
        let port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(465);
        let from_name = std::env::var("SMTP_FROM_NAME").ok();

        Some(Self {
            host,
            port,
            username,
            password,
            from_email,
            from_name,
        })
    }
}

/// Sends login codes over SMTP.
pub struct SmtpEmailSender {
    transport: SmtpTransport,
    from: String,
}

impl SmtpEmailSender {
    pub fn new(config: SmtpConfig) -> Result<Self, String> {
        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| format!("SMTP relay setup failed: {}", e))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        let from = match &config.from_name {
            Some(name) => format!("{} <{}>", name, config.from_email),
            None => config.from_email.clone(),
        };

        Ok(Self { transport, from })
    }
}

impl EmailSender for SmtpEmailSender {
    fn send_otp(&self, email: &str, code: &str) -> Result<(), String> {
        let body = format!(
            "Your GoHire login code is: {}\n\n\
             The code is valid for 10 minutes. If you did not try to log in,\n\
             you can ignore this message.\n",
            code
        );

        let message = Message::builder()
            .from(self.from.parse().map_err(|e| format!("Bad from address: {}", e))?)
            .to(email.parse().map_err(|e| format!("Bad recipient address: {}", e))?)
            .subject("Your GoHire login code")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| format!("Failed to build email: {}", e))?;

        self.transport
            .send(&message)
            .map_err(|e| format!("SMTP send failed: {}", e))?;

        tracing::info!(email = %email, "Login code sent via SMTP");
        Ok(())
    }
}
