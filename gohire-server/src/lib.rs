//! GoHire server
//!
//! Job-board backend with cookie-session authentication, email two-factor
//! login, and Stripe-backed premium membership. Storage, email delivery and
//! payment processing are all trait-injected, so the service runs against
//! SQLite/SMTP/Stripe in production and in-memory fakes in tests.

pub mod config;
pub mod crypto;
pub mod email;
pub mod error;
pub mod payment;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{AdminSeed, Config};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
