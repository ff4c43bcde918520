//! Payment routes
//!
//! `create-intent` opens a payment with the processor; `confirm` checks the
//! processor saw the money, writes the receipt, and grants premium. The
//! premium check runs before the processor is contacted, so an
//! already-premium user never triggers an outbound call.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use gohire_core::{money, Plan};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_cookies::Cookies;

use super::session::require_applicant;
use crate::email::EmailSender;
use crate::error::ApiError;
use crate::payment::{self, IntentMetadata, IntentStatus, PaymentProcessor};
use crate::state::AppState;
use crate::store::{DataStore, NewReceipt, PremiumUser, SessionStore};

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub amount: Option<f64>,
    pub plan: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub payment_intent_id: Option<String>,
    pub amount: Option<f64>,
    pub plan: Option<String>,
}

fn parse_plan(plan: &str) -> Result<Plan, ApiError> {
    Plan::from_str(plan).ok_or_else(|| ApiError::InvalidInput("Invalid plan".to_string()))
}

/// POST /api/payment/create-intent
pub async fn create_intent<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    cookies: Cookies,
    Json(req): Json<CreateIntentRequest>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor + 'static,
{
    let (_session, user_id) = require_applicant(state.sessions.as_ref(), &cookies)?;

    let (amount, plan) = match (req.amount, req.plan.as_deref()) {
        (Some(amount), Some(plan)) => (amount, plan),
        _ => {
            return Err(ApiError::InvalidInput(
                "Amount and plan are required".to_string(),
            ))
        }
    };
    if amount <= 0.0 {
        return Err(ApiError::InvalidInput(
            "Amount must be greater than zero".to_string(),
        ));
    }
    let plan = parse_plan(plan)?;

    let metadata = IntentMetadata {
        user_id: user_id.0,
        plan: plan.as_str().to_string(),
    };
    let intent = payment::create_intent(
        state.processor.clone(),
        money::to_minor_units(amount),
        "usd".to_string(),
        metadata,
    )
    .await
    .map_err(ApiError::Delivery)?;

    tracing::info!(user_id = user_id.0, intent = %intent.id, "Payment intent created");

    Ok(Json(json!({
        "success": true,
        "clientSecret": intent.client_secret,
        "paymentIntentId": intent.id,
    })))
}

/// POST /api/payment/confirm
pub async fn confirm<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    cookies: Cookies,
    Json(req): Json<ConfirmRequest>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor + 'static,
{
    let (_session, user_id) = require_applicant(state.sessions.as_ref(), &cookies)?;

    let intent_id = match req.payment_intent_id {
        Some(id) if !id.is_empty() => id,
        _ => {
            return Err(ApiError::InvalidInput(
                "Payment intent ID is required".to_string(),
            ))
        }
    };
    let (amount, plan) = match (req.amount, req.plan.as_deref()) {
        (Some(amount), Some(plan)) => (amount, plan),
        _ => {
            return Err(ApiError::InvalidInput(
                "Amount and plan are required".to_string(),
            ))
        }
    };
    let plan = parse_plan(plan)?;

    let user = state.store.get_user(user_id)?.ok_or(ApiError::UserNotFound)?;

    if state.store.get_premium_by_email(&user.email)?.is_some() {
        return Err(ApiError::AlreadyPremium);
    }

    let intent = payment::retrieve_intent(state.processor.clone(), intent_id)
        .await
        .map_err(ApiError::Delivery)?;

    if intent.status != IntentStatus::Succeeded {
        return Err(ApiError::PaymentNotConfirmed {
            status: intent.status.as_str().to_string(),
        });
    }

    // The unique transaction id makes a replayed confirmation fail here
    // instead of granting premium twice.
    let receipt = state.store.create_receipt(NewReceipt {
        user_id: user.id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        phone: user.phone.clone(),
        transaction_id: intent.id,
        amount,
        subscription_plan: plan.display_name().to_string(),
        payment_method: "Stripe".to_string(),
    })?;

    state.store.create_premium(PremiumUser {
        user_id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email.clone(),
        phone: user.phone,
        gender: user.gender,
        plan,
        member_since: Utc::now(),
    })?;

    tracing::info!(email = %user.email, transaction = %receipt.transaction_id, "Premium membership granted");

    Ok(Json(json!({
        "success": true,
        "message": "Payment processed successfully! You are now a premium member.",
        "receipt": receipt,
        "isPremium": true,
    })))
}

/// GET /api/payment/receipt
pub async fn receipt<D, S, E, P>(
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

    let receipt = state
        .store
        .latest_receipt(user_id)?
        .ok_or_else(|| ApiError::NotFound("No receipt found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "receipt": receipt,
    })))
}

/// GET /api/payment/subscription
///
/// Reports the plan and payment date from the most recent receipt.
pub async fn subscription<D, S, E, P>(
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

    let receipt = state
        .store
        .latest_receipt(user_id)?
        .ok_or_else(|| ApiError::NotFound("No active subscription".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "subscription": receipt.subscription_plan,
        "expiryDate": receipt.paid_at,
    })))
}
