//! HTTP routes

pub mod admin;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod payment;
pub mod profile;
pub mod session;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::email::EmailSender;
use crate::payment::PaymentProcessor;
use crate::state::AppState;
use crate::store::{DataStore, SessionStore};

/// Build the application router.
pub fn create_router<D, S, E, P>(state: Arc<AppState<D, S, E, P>>) -> Router
where
    D: DataStore + 'static,
    S: SessionStore + 'static,
    E: EmailSender + 'static,
    P: PaymentProcessor + 'static,
{
    Router::new()
        .route("/api/health", get(health::health))
        // Admin authentication
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/verify-2fa", post(admin::verify_2fa))
        .route("/api/admin/logout", post(admin::logout))
        .route("/api/admin/me", get(admin::me))
        // Applicant authentication
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify-2fa", post(auth::verify_2fa))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Profile
        .route("/api/profile", get(profile::get_profile).put(profile::update_profile))
        // Job and internship browsing
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job))
        .route("/api/internships", get(jobs::list_internships))
        // Payments
        .route("/api/payment/create-intent", post(payment::create_intent))
        .route("/api/payment/confirm", post(payment::confirm))
        .route("/api/payment/receipt", get(payment::receipt))
        .route("/api/payment/subscription", get(payment::subscription))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
