//! Admin authentication routes
//!
//! Admin logins always go through a second factor: a successful password
//! check issues a code by email, and only `verify-2fa` establishes a
//! session.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use gohire_core::{otp, OtpChallenge, OtpError};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_cookies::Cookies;

use super::session::{clear_session_cookie, get_session_id, require_admin, set_session_cookie};
use crate::crypto::verify_password;
use crate::email::EmailSender;
use crate::error::ApiError;
use crate::payment::PaymentProcessor;
use crate::state::AppState;
use crate::store::{DataStore, Principal, SessionStore};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

/// POST /api/admin/login
///
/// Checks credentials, then stores and emails a fresh one-time code. The
/// same 401 covers an unknown email and a wrong password.
pub async fn login<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    let admin = state
        .store
        .get_admin(&req.email)?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = verify_password(&req.password, &admin.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    // Store the challenge before sending so a delivery failure leaves a
    // retryable state rather than a dangling email.
    let challenge = OtpChallenge::issue(Utc::now());
    state
        .store
        .set_admin_otp(&admin.email, Some(challenge.clone()))?;

    state
        .email_sender
        .send_otp(&admin.email, &challenge.code)
        .map_err(ApiError::Delivery)?;

    tracing::info!(email = %admin.email, "Admin login code sent");

    Ok(Json(json!({
        "success": true,
        "require2FA": true,
        "email": admin.email,
        "message": "OTP sent to your email for 2-factor authentication",
    })))
}

/// POST /api/admin/verify-2fa
pub async fn verify_2fa<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    cookies: Cookies,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    if req.email.is_empty() || req.otp.is_empty() {
        return Err(ApiError::InvalidInput(
            "Email and OTP are required".to_string(),
        ));
    }

    let admin = state
        .store
        .get_admin(&req.email)?
        .ok_or(ApiError::UserNotFound)?;

    match otp::verify(admin.otp.as_ref(), &req.otp, Utc::now()) {
        Ok(()) => {
            state.store.set_admin_otp(&admin.email, None)?;
        }
        Err(e @ OtpError::Expired) => {
            // An expired code is dead either way; clear it so the stale
            // challenge cannot be retried.
            state.store.set_admin_otp(&admin.email, None)?;
            return Err(e.into());
        }
        // Mismatch keeps the challenge so the user can re-enter the code.
        Err(e) => return Err(e.into()),
    }

    let session = state.sessions.create(Principal::Admin {
        email: admin.email.clone(),
    })?;
    set_session_cookie(&cookies, &session);

    tracing::info!(email = %admin.email, "Admin logged in");

    Ok(Json(json!({
        "success": true,
        "message": "2FA verified. Login successful.",
        "user": {
            "email": admin.email,
            "isPremium": admin.is_premium,
        },
    })))
}

/// POST /api/admin/logout
pub async fn logout<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    if let Some(session_id) = get_session_id(&cookies) {
        state.sessions.delete(&session_id)?;
    }
    clear_session_cookie(&cookies);

    Ok(Json(json!({
        "success": true,
        "message": "Logout successful",
    })))
}

/// GET /api/admin/me
pub async fn me<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    cookies: Cookies,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    let (_session, email) = require_admin(state.sessions.as_ref(), &cookies)?;

    let admin = state
        .store
        .get_admin(&email)?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(json!({
        "success": true,
        "user": {
            "email": admin.email,
            "isPremium": admin.is_premium,
        },
    })))
}
