//! SQLite-based storage implementation

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use gohire_core::{OtpChallenge, Plan};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{
    AdminAccount, AdminStore, BillingStore, Gender, Internship, InternshipQuery, Job, JobQuery,
    JobStore, NewInternship, NewJob, NewReceipt, NewUser, Page, PageRequest, PremiumUser,
    Principal, Receipt, Session, SessionId, SessionStore, StoreResult, User, UserId, UserStore,
};
use crate::error::ApiError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based store implementing every storage trait
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, ApiError> {
        let conn = Connection::open(path).map_err(|e| ApiError::Internal(e.to_string()))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), ApiError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, ApiError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0).map(|v| v.unwrap_or(0))
        })
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    /// Migration to version 1: initial schema
    fn migrate_v1(conn: &Connection) -> Result<(), ApiError> {
        conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Applicant accounts (email stored lowercase)
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                phone TEXT NOT NULL,
                gender TEXT NOT NULL,
                two_factor_enabled INTEGER NOT NULL DEFAULT 0,
                otp_code TEXT,
                otp_expires_at TEXT,
                college_name TEXT,
                skills TEXT,
                about TEXT,
                linkedin_profile TEXT,
                github_profile TEXT,
                portfolio_website TEXT,
                work_experience TEXT,
                achievements TEXT,
                created_at TEXT NOT NULL
            );

            -- Admin accounts, seeded at startup
            CREATE TABLE IF NOT EXISTS admins (
                email TEXT PRIMARY KEY,
                password_hash TEXT NOT NULL,
                is_premium INTEGER NOT NULL DEFAULT 0,
                otp_code TEXT,
                otp_expires_at TEXT
            );

            -- Sessions (admin or applicant)
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                admin_email TEXT,
                user_id INTEGER,
                created_at TEXT NOT NULL
            );

            -- Payment receipts, append-only
            CREATE TABLE IF NOT EXISTS receipts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                email TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                phone TEXT NOT NULL,
                transaction_id TEXT NOT NULL UNIQUE,
                amount REAL NOT NULL,
                subscription_plan TEXT NOT NULL,
                payment_method TEXT NOT NULL,
                payment_status TEXT NOT NULL,
                paid_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_receipts_user_id ON receipts(user_id);

            -- Premium membership records (email unique: at most one per user)
            CREATE TABLE IF NOT EXISTS premium_users (
                email TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                phone TEXT NOT NULL,
                gender TEXT NOT NULL,
                plan TEXT NOT NULL,
                member_since TEXT NOT NULL
            );

            -- Job postings
            CREATE TABLE IF NOT EXISTS jobs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                job_type TEXT NOT NULL,
                salary INTEGER,
                description TEXT NOT NULL,
                posted_at TEXT NOT NULL
            );

            -- Internship postings
            CREATE TABLE IF NOT EXISTS internships (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT NOT NULL,
                duration_months INTEGER NOT NULL,
                stipend INTEGER,
                description TEXT NOT NULL,
                posted_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn otp_from_columns(code: Option<String>, expires_at: Option<String>) -> Option<OtpChallenge> {
    match (code, expires_at) {
        (Some(code), Some(expires_at)) => Some(OtpChallenge {
            code,
            expires_at: parse_datetime(&expires_at),
        }),
        _ => None,
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: i64 = row.get("id")?;
    let gender: String = row.get("gender")?;
    let two_factor_enabled: i32 = row.get("two_factor_enabled")?;
    let otp_code: Option<String> = row.get("otp_code")?;
    let otp_expires_at: Option<String> = row.get("otp_expires_at")?;
    let created_at: String = row.get("created_at")?;
    Ok(User {
        id: UserId(id as u64),
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone: row.get("phone")?,
        gender: Gender::from_str(&gender).unwrap_or(Gender::Other),
        two_factor_enabled: two_factor_enabled != 0,
        otp: otp_from_columns(otp_code, otp_expires_at),
        college_name: row.get("college_name")?,
        skills: row.get("skills")?,
        about: row.get("about")?,
        linkedin_profile: row.get("linkedin_profile")?,
        github_profile: row.get("github_profile")?,
        portfolio_website: row.get("portfolio_website")?,
        work_experience: row.get("work_experience")?,
        achievements: row.get("achievements")?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_receipt(row: &Row<'_>) -> rusqlite::Result<Receipt> {
    let id: i64 = row.get("id")?;
    let user_id: i64 = row.get("user_id")?;
    let paid_at: String = row.get("paid_at")?;
    Ok(Receipt {
        id: id as u64,
        user_id: UserId(user_id as u64),
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        phone: row.get("phone")?,
        transaction_id: row.get("transaction_id")?,
        amount: row.get("amount")?,
        subscription_plan: row.get("subscription_plan")?,
        payment_method: row.get("payment_method")?,
        payment_status: row.get("payment_status")?,
        paid_at: parse_datetime(&paid_at),
    })
}

fn row_to_job(row: &Row<'_>) -> rusqlite::Result<Job> {
    let id: i64 = row.get("id")?;
    let posted_at: String = row.get("posted_at")?;
    Ok(Job {
        id: id as u64,
        title: row.get("title")?,
        company: row.get("company")?,
        location: row.get("location")?,
        job_type: row.get("job_type")?,
        salary: row.get("salary")?,
        description: row.get("description")?,
        posted_at: parse_datetime(&posted_at),
    })
}

fn row_to_internship(row: &Row<'_>) -> rusqlite::Result<Internship> {
    let id: i64 = row.get("id")?;
    let duration_months: i64 = row.get("duration_months")?;
    let posted_at: String = row.get("posted_at")?;
    Ok(Internship {
        id: id as u64,
        title: row.get("title")?,
        company: row.get("company")?,
        location: row.get("location")?,
        duration_months: duration_months as u32,
        stipend: row.get("stipend")?,
        description: row.get("description")?,
        posted_at: parse_datetime(&posted_at),
    })
}

fn constraint_violation(e: &rusqlite::Error) -> bool {
    if let rusqlite::Error::SqliteFailure(err, _) = e {
        return err.code == rusqlite::ErrorCode::ConstraintViolation;
    }
    false
}

impl UserStore for SqliteStore {
    fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let normalized = new.email.to_lowercase();
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO users (email, password_hash, first_name, last_name, phone, gender, two_factor_enabled, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                normalized,
                new.password_hash,
                new.first_name,
                new.last_name,
                new.phone,
                new.gender.as_str(),
                new.two_factor_enabled as i32,
                now
            ],
        )
        .map_err(|e| {
            if constraint_violation(&e) {
                ApiError::EmailAlreadyExists
            } else {
                ApiError::Internal(e.to_string())
            }
        })?;

        let id = UserId(conn.last_insert_rowid() as u64);
        drop(conn);

        self.get_user(id)?
            .ok_or_else(|| ApiError::Internal("user vanished after insert".to_string()))
    }

    fn get_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT * FROM users WHERE id = ?1",
            params![user_id.0 as i64],
            row_to_user,
        )
        .optional()
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT * FROM users WHERE email = ?1",
            params![normalized],
            row_to_user,
        )
        .optional()
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn update_profile(&self, user_id: UserId, update: &super::ProfileUpdate) -> StoreResult<Option<User>> {
        // COALESCE keeps the stored value wherever the update carries NULL.
        let changed = {
            let conn = self.conn.lock().unwrap();
            conn.execute(
                "UPDATE users SET
                     first_name = COALESCE(?1, first_name),
                     last_name = COALESCE(?2, last_name),
                     phone = COALESCE(?3, phone),
                     college_name = COALESCE(?4, college_name),
                     skills = COALESCE(?5, skills),
                     about = COALESCE(?6, about),
                     linkedin_profile = COALESCE(?7, linkedin_profile),
                     github_profile = COALESCE(?8, github_profile),
                     portfolio_website = COALESCE(?9, portfolio_website),
                     work_experience = COALESCE(?10, work_experience),
                     achievements = COALESCE(?11, achievements)
                 WHERE id = ?12",
                params![
                    update.first_name,
                    update.last_name,
                    update.phone,
                    update.college_name,
                    update.skills,
                    update.about,
                    update.linkedin_profile,
                    update.github_profile,
                    update.portfolio_website,
                    update.work_experience,
                    update.achievements,
                    user_id.0 as i64
                ],
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?
        };

        if changed == 0 {
            return Ok(None);
        }
        self.get_user(user_id)
    }

    fn set_user_otp(&self, user_id: UserId, otp: Option<OtpChallenge>) -> StoreResult<()> {
        let (code, expires_at) = match &otp {
            Some(c) => (Some(c.code.clone()), Some(c.expires_at.to_rfc3339())),
            None => (None, None),
        };
        let conn = self.conn.lock().unwrap();

        let changed = conn
            .execute(
                "UPDATE users SET otp_code = ?1, otp_expires_at = ?2 WHERE id = ?3",
                params![code, expires_at, user_id.0 as i64],
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }
}

impl AdminStore for SqliteStore {
    fn upsert_admin(&self, account: AdminAccount) -> StoreResult<()> {
        let normalized = account.email.to_lowercase();
        let (code, expires_at) = match &account.otp {
            Some(c) => (Some(c.code.clone()), Some(c.expires_at.to_rfc3339())),
            None => (None, None),
        };
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT OR REPLACE INTO admins (email, password_hash, is_premium, otp_code, otp_expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![normalized, account.password_hash, account.is_premium as i32, code, expires_at],
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(())
    }

    fn get_admin(&self, email: &str) -> StoreResult<Option<AdminAccount>> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT email, password_hash, is_premium, otp_code, otp_expires_at FROM admins WHERE email = ?1",
            params![normalized],
            |row| {
                let is_premium: i32 = row.get(2)?;
                let otp_code: Option<String> = row.get(3)?;
                let otp_expires_at: Option<String> = row.get(4)?;
                Ok(AdminAccount {
                    email: row.get(0)?,
                    password_hash: row.get(1)?,
                    is_premium: is_premium != 0,
                    otp: otp_from_columns(otp_code, otp_expires_at),
                })
            },
        )
        .optional()
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn set_admin_otp(&self, email: &str, otp: Option<OtpChallenge>) -> StoreResult<()> {
        let normalized = email.to_lowercase();
        let (code, expires_at) = match &otp {
            Some(c) => (Some(c.code.clone()), Some(c.expires_at.to_rfc3339())),
            None => (None, None),
        };
        let conn = self.conn.lock().unwrap();

        let changed = conn
            .execute(
                "UPDATE admins SET otp_code = ?1, otp_expires_at = ?2 WHERE email = ?3",
                params![code, expires_at, normalized],
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        if changed == 0 {
            return Err(ApiError::UserNotFound);
        }
        Ok(())
    }
}

impl SessionStore for SqliteStore {
    fn create(&self, principal: Principal) -> StoreResult<Session> {
        let session = Session {
            id: SessionId(Uuid::new_v4().to_string()),
            principal,
            created_at: Utc::now(),
        };
        let (admin_email, user_id) = match &session.principal {
            Principal::Admin { email } => (Some(email.clone()), None),
            Principal::Applicant { user_id } => (None, Some(user_id.0 as i64)),
        };
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO sessions (id, admin_email, user_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![session.id.0, admin_email, user_id, session.created_at.to_rfc3339()],
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(session)
    }

    fn get(&self, session_id: &SessionId) -> StoreResult<Option<Session>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT id, admin_email, user_id, created_at FROM sessions WHERE id = ?1",
            params![session_id.0],
            |row| {
                let id: String = row.get(0)?;
                let admin_email: Option<String> = row.get(1)?;
                let user_id: Option<i64> = row.get(2)?;
                let created_at: String = row.get(3)?;
                let principal = match (admin_email, user_id) {
                    (Some(email), _) => Principal::Admin { email },
                    (None, Some(uid)) => Principal::Applicant { user_id: UserId(uid as u64) },
                    // A row with neither column set is unreadable; treat as admin of nobody
                    (None, None) => Principal::Admin { email: String::new() },
                };
                Ok(Session {
                    id: SessionId(id),
                    principal,
                    created_at: parse_datetime(&created_at),
                })
            },
        )
        .optional()
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn delete(&self, session_id: &SessionId) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM sessions WHERE id = ?1", params![session_id.0])
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(())
    }
}

impl BillingStore for SqliteStore {
    fn create_receipt(&self, receipt: NewReceipt) -> StoreResult<Receipt> {
        let paid_at = Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO receipts (user_id, email, first_name, last_name, phone, transaction_id, amount, subscription_plan, payment_method, payment_status, paid_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'Completed', ?10)",
            params![
                receipt.user_id.0 as i64,
                receipt.email,
                receipt.first_name,
                receipt.last_name,
                receipt.phone,
                receipt.transaction_id,
                receipt.amount,
                receipt.subscription_plan,
                receipt.payment_method,
                paid_at
            ],
        )
        .map_err(|e| {
            if constraint_violation(&e) {
                ApiError::DuplicateTransaction
            } else {
                ApiError::Internal(e.to_string())
            }
        })?;

        let id = conn.last_insert_rowid();
        conn.query_row("SELECT * FROM receipts WHERE id = ?1", params![id], row_to_receipt)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn latest_receipt(&self, user_id: UserId) -> StoreResult<Option<Receipt>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT * FROM receipts WHERE user_id = ?1 ORDER BY paid_at DESC, id DESC LIMIT 1",
            params![user_id.0 as i64],
            row_to_receipt,
        )
        .optional()
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn get_premium_by_email(&self, email: &str) -> StoreResult<Option<PremiumUser>> {
        let normalized = email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT email, user_id, first_name, last_name, phone, gender, plan, member_since FROM premium_users WHERE email = ?1",
            params![normalized],
            |row| {
                let user_id: i64 = row.get(1)?;
                let gender: String = row.get(5)?;
                let plan: String = row.get(6)?;
                let member_since: String = row.get(7)?;
                Ok(PremiumUser {
                    email: row.get(0)?,
                    user_id: UserId(user_id as u64),
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    phone: row.get(4)?,
                    gender: Gender::from_str(&gender).unwrap_or(Gender::Other),
                    plan: Plan::from_str(&plan).unwrap_or(Plan::Monthly),
                    member_since: parse_datetime(&member_since),
                })
            },
        )
        .optional()
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn create_premium(&self, premium: PremiumUser) -> StoreResult<()> {
        let normalized = premium.email.to_lowercase();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO premium_users (email, user_id, first_name, last_name, phone, gender, plan, member_since)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                normalized,
                premium.user_id.0 as i64,
                premium.first_name,
                premium.last_name,
                premium.phone,
                premium.gender.as_str(),
                premium.plan.as_str(),
                premium.member_since.to_rfc3339()
            ],
        )
        .map_err(|e| {
            if constraint_violation(&e) {
                ApiError::AlreadyPremium
            } else {
                ApiError::Internal(e.to_string())
            }
        })?;

        Ok(())
    }
}

impl JobStore for SqliteStore {
    fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let posted_at = Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO jobs (title, company, location, job_type, salary, description, posted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![job.title, job.company, job.location, job.job_type, job.salary, job.description, posted_at],
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;

        let id = conn.last_insert_rowid();
        conn.query_row("SELECT * FROM jobs WHERE id = ?1", params![id], row_to_job)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn get_job(&self, job_id: u64) -> StoreResult<Option<Job>> {
        let conn = self.conn.lock().unwrap();

        conn.query_row("SELECT * FROM jobs WHERE id = ?1", params![job_id as i64], row_to_job)
            .optional()
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn list_jobs(&self, query: &JobQuery, page: PageRequest) -> StoreResult<Page<Job>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(q) = &query.q {
            args.push(Box::new(format!("%{}%", q.to_lowercase())));
            clauses.push(format!(
                "(LOWER(title) LIKE ?{n} OR LOWER(company) LIKE ?{n})",
                n = args.len()
            ));
        }
        if let Some(location) = &query.location {
            args.push(Box::new(location.to_lowercase()));
            clauses.push(format!("LOWER(location) = ?{}", args.len()));
        }
        if let Some(job_type) = &query.job_type {
            args.push(Box::new(job_type.to_lowercase()));
            clauses.push(format!("LOWER(job_type) = ?{}", args.len()));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let conn = self.conn.lock().unwrap();

        let total: u64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM jobs{}", where_sql),
                rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
                |row| row.get::<_, i64>(0).map(|n| n as u64),
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let sql = format!(
            "SELECT * FROM jobs{} ORDER BY posted_at DESC, id DESC LIMIT {} OFFSET {}",
            where_sql, page.per_page, page.offset()
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let items = stmt
            .query_map(rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())), row_to_job)
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let total_pages = ((total + page.per_page as u64 - 1) / page.per_page as u64) as u32;
        Ok(Page {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        })
    }

    fn create_internship(&self, internship: NewInternship) -> StoreResult<Internship> {
        let posted_at = Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO internships (title, company, location, duration_months, stipend, description, posted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                internship.title,
                internship.company,
                internship.location,
                internship.duration_months as i64,
                internship.stipend,
                internship.description,
                posted_at
            ],
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;

        let id = conn.last_insert_rowid();
        conn.query_row("SELECT * FROM internships WHERE id = ?1", params![id], row_to_internship)
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn list_internships(
        &self,
        query: &InternshipQuery,
        page: PageRequest,
    ) -> StoreResult<Page<Internship>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(q) = &query.q {
            args.push(Box::new(format!("%{}%", q.to_lowercase())));
            clauses.push(format!(
                "(LOWER(title) LIKE ?{n} OR LOWER(company) LIKE ?{n})",
                n = args.len()
            ));
        }
        if let Some(location) = &query.location {
            args.push(Box::new(location.to_lowercase()));
            clauses.push(format!("LOWER(location) = ?{}", args.len()));
        }
        if let Some(max) = query.max_duration {
            args.push(Box::new(max as i64));
            clauses.push(format!("duration_months <= ?{}", args.len()));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let conn = self.conn.lock().unwrap();

        let total: u64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM internships{}", where_sql),
                rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
                |row| row.get::<_, i64>(0).map(|n| n as u64),
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let sql = format!(
            "SELECT * FROM internships{} ORDER BY posted_at DESC, id DESC LIMIT {} OFFSET {}",
            where_sql, page.per_page, page.offset()
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let items = stmt
            .query_map(rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())), row_to_internship)
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let total_pages = ((total + page.per_page as u64 - 1) / page.per_page as u64) as u32;
        Ok(Page {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
            total_pages,
        })
    }
}
