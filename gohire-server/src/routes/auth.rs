//! Applicant authentication routes

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use gohire_core::{otp, OtpChallenge, OtpError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_cookies::Cookies;

use super::session::{clear_session_cookie, get_session_id, require_applicant, set_session_cookie};
use crate::crypto::{hash_password, verify_password};
use crate::email::EmailSender;
use crate::error::ApiError;
use crate::payment::PaymentProcessor;
use crate::state::AppState;
use crate::store::{DataStore, Gender, NewUser, Principal, SessionStore, User};

const MIN_PASSWORD_LEN: usize = 4;
const MAX_PASSWORD_LEN: usize = 80;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub two_factor_enabled: bool,
}

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

/// Applicant fields safe to return to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Gender,
    pub two_factor_enabled: bool,
    pub college_name: Option<String>,
    pub skills: Option<String>,
    pub about: Option<String>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub portfolio_website: Option<String>,
    pub work_experience: Option<String>,
    pub achievements: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id.0,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            gender: user.gender,
            two_factor_enabled: user.two_factor_enabled,
            college_name: user.college_name,
            skills: user.skills,
            about: user.about,
            linkedin_profile: user.linkedin_profile,
            github_profile: user.github_profile,
            portfolio_website: user.portfolio_website,
            work_experience: user.work_experience,
            achievements: user.achievements,
            created_at: user.created_at,
        }
    }
}

/// POST /api/auth/signup
pub async fn signup<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    if req.first_name.is_empty()
        || req.last_name.is_empty()
        || req.email.is_empty()
        || req.phone.is_empty()
        || req.gender.is_empty()
        || req.password.is_empty()
        || req.confirm_password.is_empty()
    {
        return Err(ApiError::InvalidInput("All fields are required".to_string()));
    }

    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::PasswordTooShort);
    }
    if req.password.len() > MAX_PASSWORD_LEN {
        return Err(ApiError::PasswordTooLong);
    }
    if req.password != req.confirm_password {
        return Err(ApiError::InvalidInput("Passwords do not match".to_string()));
    }

    let gender = Gender::from_str(&req.gender.to_lowercase())
        .ok_or_else(|| ApiError::InvalidInput("Invalid gender".to_string()))?;

    let password_hash =
        hash_password(&req.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let user = state.store.create_user(NewUser {
        email: req.email,
        password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
        gender,
        two_factor_enabled: req.two_factor_enabled,
    })?;

    tracing::info!(email = %user.email, "Applicant signed up");

    Ok(Json(json!({
        "success": true,
        "message": "Signup successful! Please login.",
    })))
}

/// POST /api/auth/login
///
/// Establishes a session directly when two-factor is disabled for the
/// account; otherwise issues and emails a one-time code.
pub async fn login<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    cookies: Cookies,
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

    let user = state
        .store
        .get_user_by_email(&req.email)?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = verify_password(&req.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    if user.two_factor_enabled {
        let challenge = OtpChallenge::issue(Utc::now());
        state.store.set_user_otp(user.id, Some(challenge.clone()))?;

        state
            .email_sender
            .send_otp(&user.email, &challenge.code)
            .map_err(ApiError::Delivery)?;

        tracing::info!(email = %user.email, "Login code sent");

        return Ok(Json(json!({
            "success": true,
            "require2FA": true,
            "email": user.email,
            "message": "OTP sent to your email for 2-factor authentication",
        })));
    }

    let session = state
        .sessions
        .create(Principal::Applicant { user_id: user.id })?;
    set_session_cookie(&cookies, &session);

    tracing::info!(email = %user.email, "Applicant logged in");

    Ok(Json(json!({
        "success": true,
        "message": "Login successful!",
        "user": PublicUser::from(user),
    })))
}

/// POST /api/auth/verify-2fa
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

    let user = state
        .store
        .get_user_by_email(&req.email)?
        .ok_or(ApiError::UserNotFound)?;

    match otp::verify(user.otp.as_ref(), &req.otp, Utc::now()) {
        Ok(()) => {
            state.store.set_user_otp(user.id, None)?;
        }
        Err(e @ OtpError::Expired) => {
            state.store.set_user_otp(user.id, None)?;
            return Err(e.into());
        }
        // Mismatch keeps the challenge so the user can re-enter the code.
        Err(e) => return Err(e.into()),
    }

    let session = state
        .sessions
        .create(Principal::Applicant { user_id: user.id })?;
    set_session_cookie(&cookies, &session);

    tracing::info!(email = %user.email, "Applicant logged in via 2FA");

    Ok(Json(json!({
        "success": true,
        "message": "2FA verified. Login successful.",
        "user": PublicUser::from(user),
    })))
}

/// POST /api/auth/logout
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

/// GET /api/auth/me
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
    let (_session, user_id) = require_applicant(state.sessions.as_ref(), &cookies)?;

    let user = state.store.get_user(user_id)?.ok_or(ApiError::UserNotFound)?;

    Ok(Json(json!({
        "success": true,
        "user": PublicUser::from(user),
    })))
}
