//! Data models for GoHire storage

use chrono::{DateTime, Utc};
use gohire_core::{OtpChallenge, Plan};
use serde::{Deserialize, Serialize};

/// Unique applicant identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Unique session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// An applicant account with credential and profile fields.
///
/// The `otp` field is the single outstanding two-factor challenge; a new
/// login attempt overwrites it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Gender,
    pub two_factor_enabled: bool,
    pub otp: Option<OtpChallenge>,
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

/// Fields required to create an applicant account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub gender: Gender,
    pub two_factor_enabled: bool,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
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

/// An admin account, seeded from configuration.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password_hash: String,
    pub is_premium: bool,
    pub otp: Option<OtpChallenge>,
}

/// The identity a session represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Admin { email: String },
    Applicant { user_id: UserId },
}

/// A server-side session, referenced by an HttpOnly cookie.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub principal: Principal,
    pub created_at: DateTime<Utc>,
}

/// A payment receipt. Append-only; one per successful confirmation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: u64,
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub transaction_id: String,
    pub amount: f64,
    pub subscription_plan: String,
    pub payment_method: String,
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
}

/// Receipt fields before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub user_id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub transaction_id: String,
    pub amount: f64,
    pub subscription_plan: String,
    pub payment_method: String,
}

/// Existence of this record is the sole "is premium" predicate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumUser {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub plan: Plan,
    pub member_since: DateTime<Utc>,
}

/// A job posting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub salary: Option<i64>,
    pub description: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub salary: Option<i64>,
    pub description: String,
}

/// An internship posting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Internship {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub duration_months: u32,
    pub stipend: Option<i64>,
    pub description: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInternship {
    pub title: String,
    pub company: String,
    pub location: String,
    pub duration_months: u32,
    pub stipend: Option<i64>,
    pub description: String,
}

/// Filters for job browsing; empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    /// Free-text match against title and company (case-insensitive substring)
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

/// Filters for internship browsing.
#[derive(Debug, Clone, Default)]
pub struct InternshipQuery {
    pub q: Option<String>,
    pub location: Option<String>,
    pub max_duration: Option<u32>,
}

const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 50;

/// A 1-based page request, clamped to sane bounds.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> usize {
        ((self.page - 1) as usize) * (self.per_page as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page from a fully filtered, ordered result set.
    pub fn from_filtered(mut matching: Vec<T>, req: PageRequest) -> Self {
        let total = matching.len() as u64;
        let total_pages = ((total + req.per_page as u64 - 1) / req.per_page as u64) as u32;
        let items: Vec<T> = if req.offset() >= matching.len() {
            Vec::new()
        } else {
            matching.drain(..).skip(req.offset()).take(req.per_page as usize).collect()
        };
        Self {
            items,
            total,
            page: req.page,
            per_page: req.per_page,
            total_pages,
        }
    }
}
