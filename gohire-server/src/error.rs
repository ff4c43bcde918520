//! Service error types
//!
//! Every failure surfaces as an HTTP status plus one uniform JSON body:
//! `{"success": false, "kind": "<kind>", "message": "<text>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gohire_core::OtpError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    NotFound(String),

    #[error("OTP not found. Please login again.")]
    OtpMissing,

    #[error("OTP has expired. Please login again.")]
    OtpExpired,

    #[error("Invalid OTP")]
    OtpMismatch,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password must be at least 4 characters long")]
    PasswordTooShort,

    #[error("Password too long (maximum 80 characters)")]
    PasswordTooLong,

    #[error("You are already a premium member. No new payment is required.")]
    AlreadyPremium,

    #[error("Payment not confirmed yet (status: {status})")]
    PaymentNotConfirmed { status: String },

    #[error("A receipt for this transaction already exists")]
    DuplicateTransaction,

    #[error("Delivery failure: {0}")]
    Delivery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable discriminant carried in every error body.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::NotAuthenticated => "not_authenticated",
            ApiError::UserNotFound => "user_not_found",
            ApiError::NotFound(_) => "not_found",
            ApiError::OtpMissing => "otp_missing",
            ApiError::OtpExpired => "otp_expired",
            ApiError::OtpMismatch => "otp_mismatch",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::EmailAlreadyExists => "email_already_exists",
            ApiError::PasswordTooShort => "password_too_short",
            ApiError::PasswordTooLong => "password_too_long",
            ApiError::AlreadyPremium => "already_premium",
            ApiError::PaymentNotConfirmed { .. } => "payment_not_confirmed",
            ApiError::DuplicateTransaction => "duplicate_transaction",
            ApiError::Delivery(_) => "delivery_failure",
            ApiError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ApiError::UserNotFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::OtpMissing
            | ApiError::OtpExpired
            | ApiError::OtpMismatch
            | ApiError::InvalidInput(_)
            | ApiError::PasswordTooShort
            | ApiError::PasswordTooLong
            | ApiError::AlreadyPremium
            | ApiError::PaymentNotConfirmed { .. } => StatusCode::BAD_REQUEST,
            ApiError::EmailAlreadyExists | ApiError::DuplicateTransaction => StatusCode::CONFLICT,
            ApiError::Delivery(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Missing => ApiError::OtpMissing,
            OtpError::Expired => ApiError::OtpExpired,
            OtpError::Mismatch => ApiError::OtpMismatch,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ApiError::Delivery(msg) => {
                tracing::error!("Delivery failure: {}", msg);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = json!({
            "success": false,
            "kind": self.kind(),
            "message": message,
        });
        (self.status(), axum::Json(body)).into_response()
    }
}
