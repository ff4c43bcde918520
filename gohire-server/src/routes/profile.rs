//! Applicant profile routes

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_cookies::Cookies;

use super::auth::PublicUser;
use super::session::require_applicant;
use crate::email::EmailSender;
use crate::error::ApiError;
use crate::payment::PaymentProcessor;
use crate::state::AppState;
use crate::store::{DataStore, ProfileUpdate, SessionStore};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub college_name: Option<String>,
    pub skills: Option<String>,
    pub about: Option<String>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub portfolio_website: Option<String>,
    pub work_experience: Option<String>,
    pub achievements: Option<String>,
}

/// GET /api/profile
pub async fn get_profile<D, S, E, P>(
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
    let is_premium = state.store.get_premium_by_email(&user.email)?.is_some();

    Ok(Json(json!({
        "success": true,
        "user": PublicUser::from(user),
        "isPremium": is_premium,
    })))
}

/// PUT /api/profile
///
/// Partial update; omitted fields keep their stored values.
pub async fn update_profile<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    cookies: Cookies,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    let (_session, user_id) = require_applicant(state.sessions.as_ref(), &cookies)?;

    if matches!(&req.first_name, Some(s) if s.is_empty())
        || matches!(&req.last_name, Some(s) if s.is_empty())
    {
        return Err(ApiError::InvalidInput("Name cannot be empty".to_string()));
    }

    let update = ProfileUpdate {
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
        college_name: req.college_name,
        skills: req.skills,
        about: req.about,
        linkedin_profile: req.linkedin_profile,
        github_profile: req.github_profile,
        portfolio_website: req.portfolio_website,
        work_experience: req.work_experience,
        achievements: req.achievements,
    };

    let user = state
        .store
        .update_profile(user_id, &update)?
        .ok_or(ApiError::UserNotFound)?;

    tracing::info!(email = %user.email, "Profile updated");

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": PublicUser::from(user),
    })))
}
