//! One-time password challenges for two-factor login
//!
//! A challenge is attached to a credential record when a login attempt
//! succeeds on the password. It is single-use and single-outstanding: a new
//! login overwrites any prior challenge. Verification takes an explicit
//! `now` so expiry is testable without a mocked clock.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Challenge lifetime in minutes.
pub const OTP_TTL_MINUTES: i64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("OTP not found. Please login again.")]
    Missing,

    #[error("OTP has expired. Please login again.")]
    Expired,

    #[error("Invalid OTP")]
    Mismatch,
}

/// A pending two-factor challenge: a 6-digit code and its expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Issue a fresh challenge expiring [`OTP_TTL_MINUTES`] from `now`.
    pub fn issue(now: DateTime<Utc>) -> Self {
        Self {
            code: generate_code(),
            expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check a submitted code against this challenge.
    ///
    /// Expiry is checked before the code, so an expired challenge fails with
    /// [`OtpError::Expired`] regardless of code correctness. The caller must
    /// clear the stored challenge on `Ok` and on `Expired`; on `Mismatch`
    /// the challenge stays stored so the user can retry until expiry.
    pub fn check(&self, submitted: &str, now: DateTime<Utc>) -> Result<(), OtpError> {
        if self.is_expired(now) {
            return Err(OtpError::Expired);
        }
        if self.code != submitted {
            return Err(OtpError::Mismatch);
        }
        Ok(())
    }
}

/// Verify a submitted code against an optionally stored challenge.
///
/// Convenience over [`OtpChallenge::check`] for callers holding the
/// `Option<OtpChallenge>` straight off a credential record.
pub fn verify(
    challenge: Option<&OtpChallenge>,
    submitted: &str,
    now: DateTime<Utc>,
) -> Result<(), OtpError> {
    match challenge {
        None => Err(OtpError::Missing),
        Some(c) => c.check(submitted, now),
    }
}

/// Generate a random 6-digit code in [100000, 999999].
pub fn generate_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_six_ascii_digits() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn issued_challenge_expires_after_ttl() {
        let now = Utc::now();
        let challenge = OtpChallenge::issue(now);

        assert!(!challenge.is_expired(now));
        assert!(!challenge.is_expired(now + Duration::minutes(OTP_TTL_MINUTES)));
        assert!(challenge.is_expired(now + Duration::minutes(OTP_TTL_MINUTES) + Duration::seconds(1)));
    }

    #[test]
    fn correct_code_verifies() {
        let now = Utc::now();
        let challenge = OtpChallenge::issue(now);

        assert_eq!(challenge.check(&challenge.code, now), Ok(()));
    }

    #[test]
    fn wrong_code_is_mismatch_and_retryable() {
        let now = Utc::now();
        let challenge = OtpChallenge::issue(now);
        let wrong = if challenge.code == "123456" { "654321" } else { "123456" };

        assert_eq!(challenge.check(wrong, now), Err(OtpError::Mismatch));
        // Challenge is unchanged; the correct code still passes.
        assert_eq!(challenge.check(&challenge.code, now), Ok(()));
    }

    #[test]
    fn expired_challenge_fails_even_with_correct_code() {
        let now = Utc::now();
        let challenge = OtpChallenge::issue(now);
        let later = now + Duration::minutes(11);

        assert_eq!(challenge.check(&challenge.code, later), Err(OtpError::Expired));
    }

    #[test]
    fn missing_challenge_reported() {
        assert_eq!(verify(None, "123456", Utc::now()), Err(OtpError::Missing));
    }
}
