//! GoHire Core Library
//!
//! Pure domain logic for the GoHire marketplace, free of any I/O:
//! - OTP challenges for two-factor login (issue, verify, expiry)
//! - Subscription plans and their catalogue names
//! - Money conversion between display amounts and processor minor units

pub mod money;
pub mod otp;
pub mod plan;

pub use otp::{OtpChallenge, OtpError, OTP_TTL_MINUTES};
pub use plan::Plan;
