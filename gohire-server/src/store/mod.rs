//! Storage abstractions for the GoHire service
//!
//! Every credential, billing and catalogue record lives behind these traits,
//! including the admin accounts the original deployment kept in a process
//! global. The in-memory store backs development and tests; the SQLite store
//! backs real deployments.

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::{InMemorySessionStore, InMemoryStore};
pub use models::*;
pub use sqlite::SqliteStore;

use gohire_core::OtpChallenge;

use crate::error::ApiError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, ApiError>;

/// Applicant accounts and profiles
pub trait UserStore: Send + Sync {
    /// Create an applicant; fails with `EmailAlreadyExists` on a duplicate
    /// email (emails are compared case-insensitively).
    fn create_user(&self, new: NewUser) -> StoreResult<User>;

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>>;

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Apply a partial profile update; returns the updated record, or `None`
    /// if the user does not exist.
    fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> StoreResult<Option<User>>;

    /// Store or clear the outstanding two-factor challenge.
    fn set_user_otp(&self, user_id: UserId, otp: Option<OtpChallenge>) -> StoreResult<()>;
}

/// Admin accounts, seeded at startup
pub trait AdminStore: Send + Sync {
    /// Insert or replace an admin account (seeding is idempotent).
    fn upsert_admin(&self, account: AdminAccount) -> StoreResult<()>;

    fn get_admin(&self, email: &str) -> StoreResult<Option<AdminAccount>>;

    fn set_admin_otp(&self, email: &str, otp: Option<OtpChallenge>) -> StoreResult<()>;
}

/// Server-side sessions
pub trait SessionStore: Send + Sync {
    fn create(&self, principal: Principal) -> StoreResult<Session>;

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>>;

    fn delete(&self, session_id: &SessionId) -> StoreResult<()>;
}

/// Receipts and premium membership records
pub trait BillingStore: Send + Sync {
    /// Persist a receipt; fails with `DuplicateTransaction` if the
    /// transaction id has been recorded before.
    fn create_receipt(&self, receipt: NewReceipt) -> StoreResult<Receipt>;

    /// Most recent receipt for a user, if any.
    fn latest_receipt(&self, user_id: UserId) -> StoreResult<Option<Receipt>>;

    fn get_premium_by_email(&self, email: &str) -> StoreResult<Option<PremiumUser>>;

    /// Create the premium record; fails with `AlreadyPremium` if one exists
    /// for the email (unique key, closes the pre-check race window).
    fn create_premium(&self, premium: PremiumUser) -> StoreResult<()>;
}

/// Job and internship catalogue
pub trait JobStore: Send + Sync {
    fn create_job(&self, job: NewJob) -> StoreResult<Job>;

    fn get_job(&self, job_id: u64) -> StoreResult<Option<Job>>;

    /// Filtered listing, newest first.
    fn list_jobs(&self, query: &JobQuery, page: PageRequest) -> StoreResult<Page<Job>>;

    fn create_internship(&self, internship: NewInternship) -> StoreResult<Internship>;

    fn list_internships(
        &self,
        query: &InternshipQuery,
        page: PageRequest,
    ) -> StoreResult<Page<Internship>>;
}

/// Everything a request handler needs from persistent storage.
pub trait DataStore: UserStore + AdminStore + BillingStore + JobStore {}

impl<T: UserStore + AdminStore + BillingStore + JobStore> DataStore for T {}
