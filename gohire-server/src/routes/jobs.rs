//! Job and internship browsing
//!
//! Listings are public; no session is required to browse.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::email::EmailSender;
use crate::error::ApiError;
use crate::payment::PaymentProcessor;
use crate::state::AppState;
use crate::store::{DataStore, InternshipQuery, JobQuery, PageRequest, SessionStore};

#[derive(Debug, Deserialize, Default)]
pub struct JobListParams {
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct InternshipListParams {
    pub q: Option<String>,
    pub location: Option<String>,
    pub max_duration: Option<u32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/jobs
pub async fn list_jobs<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    Query(params): Query<JobListParams>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    let query = JobQuery {
        q: params.q,
        location: params.location,
        job_type: params.job_type,
    };
    let page = state
        .store
        .list_jobs(&query, PageRequest::new(params.page, params.per_page))?;

    Ok(Json(json!({
        "success": true,
        "jobs": page.items,
        "total": page.total,
        "page": page.page,
        "perPage": page.per_page,
        "totalPages": page.total_pages,
    })))
}

/// GET /api/jobs/:id
pub async fn get_job<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    let job = state
        .store
        .get_job(id)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "job": job,
    })))
}

/// GET /api/internships
pub async fn list_internships<D, S, E, P>(
    State(state): State<Arc<AppState<D, S, E, P>>>,
    Query(params): Query<InternshipListParams>,
) -> Result<Json<Value>, ApiError>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    let query = InternshipQuery {
        q: params.q,
        location: params.location,
        max_duration: params.max_duration,
    };
    let page = state
        .store
        .list_internships(&query, PageRequest::new(params.page, params.per_page))?;

    Ok(Json(json!({
        "success": true,
        "internships": page.items,
        "total": page.total,
        "page": page.page,
        "perPage": page.per_page,
        "totalPages": page.total_pages,
    })))
}
