//! In-memory storage implementations

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use gohire_core::OtpChallenge;
use uuid::Uuid;

use super::{
    AdminAccount, AdminStore, BillingStore, Internship, InternshipQuery, Job, JobQuery, JobStore,
    NewInternship, NewJob, NewReceipt, NewUser, Page, PageRequest, PremiumUser, Principal, Receipt,
    Session, SessionId, SessionStore, StoreResult, User, UserId, UserStore,
};
use crate::error::ApiError;

/// In-memory data store for development and tests
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    admins: RwLock<HashMap<String, AdminAccount>>,
    receipts: RwLock<Vec<Receipt>>,
    premium: RwLock<HashMap<String, PremiumUser>>,
    jobs: RwLock<HashMap<u64, Job>>,
    internships: RwLock<HashMap<u64, Internship>>,
    next_user_id: AtomicU64,
    next_receipt_id: AtomicU64,
    next_posting_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            admins: RwLock::new(HashMap::new()),
            receipts: RwLock::new(Vec::new()),
            premium: RwLock::new(HashMap::new()),
            jobs: RwLock::new(HashMap::new()),
            internships: RwLock::new(HashMap::new()),
            next_user_id: AtomicU64::new(1),
            next_receipt_id: AtomicU64::new(1),
            next_posting_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_text(haystacks: &[&str], needle: &Option<String>) -> bool {
    match needle {
        None => true,
        Some(q) => {
            let q = q.to_lowercase();
            haystacks.iter().any(|h| h.to_lowercase().contains(&q))
        }
    }
}

fn matches_eq(value: &str, wanted: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => value.eq_ignore_ascii_case(w),
    }
}

impl UserStore for InMemoryStore {
    fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let normalized = new.email.to_lowercase();
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == normalized) {
            return Err(ApiError::EmailAlreadyExists);
        }

        let id = UserId(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        let user = User {
            id,
            email: normalized,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            gender: new.gender,
            two_factor_enabled: new.two_factor_enabled,
            otp: None,
            college_name: None,
            skills: None,
            about: None,
            linkedin_profile: None,
            github_profile: None,
            portfolio_website: None,
            work_experience: None,
            achievements: None,
            created_at: Utc::now(),
        };
        users.insert(id, user.clone());
        Ok(user)
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&user_id).cloned())
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == normalized)
            .cloned())
    }

    fn update_profile(&self, user_id: UserId, update: &super::ProfileUpdate) -> StoreResult<Option<User>> {
        let mut users = self.users.write().unwrap();
        let Some(user) = users.get_mut(&user_id) else {
            return Ok(None);
        };

        if let Some(v) = &update.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &update.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &update.phone {
            user.phone = v.clone();
        }
        if let Some(v) = &update.college_name {
            user.college_name = Some(v.clone());
        }
        if let Some(v) = &update.skills {
            user.skills = Some(v.clone());
        }
        if let Some(v) = &update.about {
            user.about = Some(v.clone());
        }
        if let Some(v) = &update.linkedin_profile {
            user.linkedin_profile = Some(v.clone());
        }
        if let Some(v) = &update.github_profile {
            user.github_profile = Some(v.clone());
        }
        if let Some(v) = &update.portfolio_website {
            user.portfolio_website = Some(v.clone());
        }
        if let Some(v) = &update.work_experience {
            user.work_experience = Some(v.clone());
        }
        if let Some(v) = &update.achievements {
            user.achievements = Some(v.clone());
        }

        Ok(Some(user.clone()))
    }

    fn set_user_otp(&self, user_id: UserId, otp: Option<OtpChallenge>) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        if let Some(user) = users.get_mut(&user_id) {
            user.otp = otp;
            Ok(())
        } else {
            Err(ApiError::UserNotFound)
        }
    }
}

impl AdminStore for InMemoryStore {
    fn upsert_admin(&self, account: AdminAccount) -> StoreResult<()> {
        let key = account.email.to_lowercase();
        self.admins.write().unwrap().insert(key, account);
        Ok(())
    }

    fn get_admin(&self, email: &str) -> StoreResult<Option<AdminAccount>> {
        let normalized = email.to_lowercase();
        Ok(self.admins.read().unwrap().get(&normalized).cloned())
    }

    fn set_admin_otp(&self, email: &str, otp: Option<OtpChallenge>) -> StoreResult<()> {
        let normalized = email.to_lowercase();
        let mut admins = self.admins.write().unwrap();
        if let Some(account) = admins.get_mut(&normalized) {
            account.otp = otp;
            Ok(())
        } else {
            Err(ApiError::UserNotFound)
        }
    }
}

impl BillingStore for InMemoryStore {
    fn create_receipt(&self, receipt: NewReceipt) -> StoreResult<Receipt> {
        let mut receipts = self.receipts.write().unwrap();
        if receipts.iter().any(|r| r.transaction_id == receipt.transaction_id) {
            return Err(ApiError::DuplicateTransaction);
        }

        let stored = Receipt {
            id: self.next_receipt_id.fetch_add(1, Ordering::SeqCst),
            user_id: receipt.user_id,
            email: receipt.email,
            first_name: receipt.first_name,
            last_name: receipt.last_name,
            phone: receipt.phone,
            transaction_id: receipt.transaction_id,
            amount: receipt.amount,
            subscription_plan: receipt.subscription_plan,
            payment_method: receipt.payment_method,
            payment_status: "Completed".to_string(),
            paid_at: Utc::now(),
        };
        receipts.push(stored.clone());
        Ok(stored)
    }

    fn latest_receipt(&self, user_id: UserId) -> StoreResult<Option<Receipt>> {
        Ok(self
            .receipts
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.paid_at)
            .cloned())
    }

    fn get_premium_by_email(&self, email: &str) -> StoreResult<Option<PremiumUser>> {
        let normalized = email.to_lowercase();
        Ok(self.premium.read().unwrap().get(&normalized).cloned())
    }

    fn create_premium(&self, premium: PremiumUser) -> StoreResult<()> {
        let key = premium.email.to_lowercase();
        let mut records = self.premium.write().unwrap();
        if records.contains_key(&key) {
            return Err(ApiError::AlreadyPremium);
        }
        records.insert(key, premium);
        Ok(())
    }
}

impl JobStore for InMemoryStore {
    fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let id = self.next_posting_id.fetch_add(1, Ordering::SeqCst);
        let stored = Job {
            id,
            title: job.title,
            company: job.company,
            location: job.location,
            job_type: job.job_type,
            salary: job.salary,
            description: job.description,
            posted_at: Utc::now(),
        };
        self.jobs.write().unwrap().insert(id, stored.clone());
        Ok(stored)
    }

    fn get_job(&self, job_id: u64) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().unwrap().get(&job_id).cloned())
    }

    fn list_jobs(&self, query: &JobQuery, page: PageRequest) -> StoreResult<Page<Job>> {
        let jobs = self.jobs.read().unwrap();
        let mut matching: Vec<Job> = jobs
            .values()
            .filter(|j| matches_text(&[&j.title, &j.company], &query.q))
            .filter(|j| matches_eq(&j.location, &query.location))
            .filter(|j| matches_eq(&j.job_type, &query.job_type))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
        Ok(Page::from_filtered(matching, page))
    }

    fn create_internship(&self, internship: NewInternship) -> StoreResult<Internship> {
        let id = self.next_posting_id.fetch_add(1, Ordering::SeqCst);
        let stored = Internship {
            id,
            title: internship.title,
            company: internship.company,
            location: internship.location,
            duration_months: internship.duration_months,
            stipend: internship.stipend,
            description: internship.description,
            posted_at: Utc::now(),
        };
        self.internships.write().unwrap().insert(id, stored.clone());
        Ok(stored)
    }

    fn list_internships(
        &self,
        query: &InternshipQuery,
        page: PageRequest,
    ) -> StoreResult<Page<Internship>> {
        let internships = self.internships.read().unwrap();
        let mut matching: Vec<Internship> = internships
            .values()
            .filter(|i| matches_text(&[&i.title, &i.company], &query.q))
            .filter(|i| matches_eq(&i.location, &query.location))
            .filter(|i| query.max_duration.map_or(true, |max| i.duration_months <= max))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then(b.id.cmp(&a.id)));
        Ok(Page::from_filtered(matching, page))
    }
}

/// In-memory session store
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, principal: Principal) -> StoreResult<Session> {
        let session = Session {
            id: SessionId(Uuid::new_v4().to_string()),
            principal,
            created_at: Utc::now(),
        };
        self.sessions
            .write()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        Ok(self.sessions.read().unwrap().get(session_id).cloned())
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        self.sessions.write().unwrap().remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Gender;

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hashed".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            phone: "5550100".to_string(),
            gender: Gender::Female,
            two_factor_enabled: false,
        }
    }

    #[test]
    fn duplicate_email_rejected_case_insensitively() {
        let store = InMemoryStore::new();
        store.create_user(sample_user("a@x.com")).unwrap();

        let err = store.create_user(sample_user("A@X.COM")).unwrap_err();
        assert!(matches!(err, ApiError::EmailAlreadyExists));
    }

    #[test]
    fn profile_update_leaves_absent_fields_untouched() {
        let store = InMemoryStore::new();
        let user = store.create_user(sample_user("a@x.com")).unwrap();

        let update = super::super::ProfileUpdate {
            skills: Some("Rust, SQL".to_string()),
            ..Default::default()
        };
        let updated = store.update_profile(user.id, &update).unwrap().unwrap();

        assert_eq!(updated.skills.as_deref(), Some("Rust, SQL"));
        assert_eq!(updated.first_name, "Asha");
    }

    #[test]
    fn duplicate_transaction_id_rejected() {
        let store = InMemoryStore::new();
        let user = store.create_user(sample_user("a@x.com")).unwrap();
        let receipt = NewReceipt {
            user_id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            transaction_id: "pi_123".to_string(),
            amount: 10.0,
            subscription_plan: "Monthly Premium Plan".to_string(),
            payment_method: "Stripe".to_string(),
        };

        store.create_receipt(receipt.clone()).unwrap();
        let err = store.create_receipt(receipt).unwrap_err();
        assert!(matches!(err, ApiError::DuplicateTransaction));
    }

    #[test]
    fn job_listing_filters_and_paginates() {
        let store = InMemoryStore::new();
        for i in 0..15 {
            store
                .create_job(NewJob {
                    title: format!("Engineer {}", i),
                    company: "Acme".to_string(),
                    location: if i % 2 == 0 { "Remote" } else { "Pune" }.to_string(),
                    job_type: "full-time".to_string(),
                    salary: Some(90_000),
                    description: "Build things".to_string(),
                })
                .unwrap();
        }

        let query = JobQuery {
            location: Some("remote".to_string()),
            ..Default::default()
        };
        let page = store.list_jobs(&query, PageRequest::new(Some(1), Some(5))).unwrap();

        assert_eq!(page.total, 8);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages, 2);
        assert!(page.items.iter().all(|j| j.location == "Remote"));
    }

    #[test]
    fn session_lifecycle() {
        let store = InMemorySessionStore::new();

        let session = store.create(Principal::Admin { email: "a@x.com".to_string() }).unwrap();
        assert!(store.get(&session.id).unwrap().is_some());

        store.delete(&session.id).unwrap();
        assert!(store.get(&session.id).unwrap().is_none());
    }
}
