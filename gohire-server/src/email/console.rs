//! Console email sender for development

use super::EmailSender;

/// Prints login codes to stdout instead of sending email.
pub struct ConsoleEmailSender;

impl EmailSender for ConsoleEmailSender {
    fn send_otp(&self, email: &str, code: &str) -> Result<(), String> {
        tracing::info!(email = %email, "Sending login code (console)");

        println!();
        println!("==============================================");
        println!("  GoHire login code");
        println!("  To:   {}", email);
        println!("  Code: {}", code);
        println!("  Valid for 10 minutes");
        println!("==============================================");
        println!();

        Ok(())
    }
}
