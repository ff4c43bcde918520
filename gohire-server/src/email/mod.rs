//! Email delivery for two-factor codes

pub mod console;
pub mod smtp;

pub use console::ConsoleEmailSender;
pub use smtp::{SmtpConfig, SmtpEmailSender};

/// Sends one-time login codes to users.
///
/// Implementations are synchronous; handlers call them from request context
/// and treat a failed send as a delivery error, leaving the stored challenge
/// in place so the user can retry.
pub trait EmailSender: Send + Sync {
    /// Send a two-factor code to the given address.
    fn send_otp(&self, email: &str, code: &str) -> Result<(), String>;
}

impl EmailSender for Box<dyn EmailSender> {
    fn send_otp(&self, email: &str, code: &str) -> Result<(), String> {
        (**self).send_otp(email, code)
    }
}
