#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum_test::{TestServer, TestServerConfig};
use serde_json::json;

use gohire_server::email::EmailSender;
use gohire_server::payment::MockProcessor;
use gohire_server::routes::create_router;
use gohire_server::state::AppState;
use gohire_server::store::{AdminAccount, AdminStore, InMemorySessionStore, InMemoryStore};

/// Email sender that records every code instead of sending it.
pub struct MockEmailSender {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Most recent code sent to the given address.
    pub fn get_code(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl EmailSender for MockEmailSender {
    fn send_otp(&self, email: &str, code: &str) -> Result<(), String> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

pub struct TestContext {
    pub server: TestServer,
    pub email: Arc<MockEmailSender>,
    pub store: Arc<InMemoryStore>,
    pub processor: Arc<MockProcessor>,
}

/// Spin up the service against in-memory stores and mocks.
pub fn create_test_server() -> TestContext {
    let store = Arc::new(InMemoryStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let email = Arc::new(MockEmailSender::new());
    let processor = Arc::new(MockProcessor::new());

    let state = Arc::new(AppState::new(
        store.clone(),
        sessions,
        email.clone(),
        processor.clone(),
    ));

    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    let server = TestServer::new_with_config(create_router(state), config).unwrap();

    TestContext {
        server,
        email,
        store,
        processor,
    }
}

/// Seed an admin account directly into the store.
///
/// Uses a low bcrypt cost; the seeding path in production uses the default.
pub fn seed_admin(store: &InMemoryStore, email: &str, password: &str) {
    let password_hash = bcrypt::hash(password, 4).unwrap();
    store
        .upsert_admin(AdminAccount {
            email: email.to_string(),
            password_hash,
            is_premium: false,
            otp: None,
        })
        .unwrap();
}

/// Sign up an applicant through the API.
pub async fn signup(server: &TestServer, email: &str, password: &str, two_factor: bool) {
    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "firstName": "Asha",
            "lastName": "Rao",
            "email": email,
            "phone": "5550100",
            "gender": "female",
            "password": password,
            "confirmPassword": password,
            "twoFactorEnabled": two_factor,
        }))
        .await;
    response.assert_status_ok();
}

/// Log in an applicant whose account has two-factor disabled.
pub async fn login(server: &TestServer, email: &str, password: &str) {
    let response = server
        .post("/api/auth/login")
        .json(&json!({"email": email, "password": password}))
        .await;
    response.assert_status_ok();
}
