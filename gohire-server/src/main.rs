use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gohire_server::config::{load_admin_seeds, Config};
use gohire_server::crypto::hash_password;
use gohire_server::email::{ConsoleEmailSender, EmailSender, SmtpConfig, SmtpEmailSender};
use gohire_server::payment::{MockProcessor, PaymentProcessor, StripeProcessor};
use gohire_server::routes::create_router;
use gohire_server::state::AppState;
use gohire_server::store::{
    AdminAccount, AdminStore, DataStore, InMemorySessionStore, InMemoryStore, SessionStore,
    SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gohire_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    match config.database.clone() {
        Some(path) => {
            tracing::info!(path = %path, "Using SQLite storage");
            let store = Arc::new(SqliteStore::open(&path).map_err(|e| anyhow::anyhow!("{}", e))?);
            // SqliteStore holds sessions too, so both roles share one handle.
            run(config, store.clone(), store).await
        }
        None => {
            tracing::warn!("GOHIRE_DATABASE not set; state is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            let sessions = Arc::new(InMemorySessionStore::new());
            run(config, store, sessions).await
        }
    }
}

async fn run<D, S>(config: Config, store: Arc<D>, sessions: Arc<S>) -> anyhow::Result<()>
where
    D: DataStore + 'static,
    S: SessionStore + 'static,
{
    seed_admins(&config, store.as_ref())?;

    let email_sender: Box<dyn EmailSender> = match SmtpConfig::from_env() {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, "Using SMTP email delivery");
            Box::new(SmtpEmailSender::new(smtp).map_err(|e| anyhow::anyhow!(e))?)
        }
        None => {
            tracing::warn!("SMTP not configured; login codes print to the console");
            Box::new(ConsoleEmailSender)
        }
    };

    let processor: Box<dyn PaymentProcessor> = match std::env::var("STRIPE_SECRET_KEY") {
        Ok(key) => {
            tracing::info!("Using Stripe payment processing");
            Box::new(StripeProcessor::new(key))
        }
        Err(_) => {
            tracing::warn!("STRIPE_SECRET_KEY not set; payments use the mock processor");
            Box::new(MockProcessor::new())
        }
    };

    let state = Arc::new(AppState::new(
        store,
        sessions,
        Arc::new(email_sender),
        Arc::new(processor),
    ));
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "GoHire server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn seed_admins<D: AdminStore>(config: &Config, store: &D) -> anyhow::Result<()> {
    let Some(path) = &config.admin_accounts else {
        tracing::warn!("GOHIRE_ADMIN_ACCOUNTS not set; no admin accounts available");
        return Ok(());
    };

    let seeds = load_admin_seeds(path)
        .with_context(|| format!("Failed to load admin accounts from {}", path))?;
    let count = seeds.len();

    for seed in seeds {
        let password_hash = hash_password(&seed.password).context("Failed to hash admin password")?;
        store
            .upsert_admin(AdminAccount {
                email: seed.email,
                password_hash,
                is_premium: seed.is_premium,
                otp: None,
            })
            .map_err(|e| anyhow::anyhow!("{}", e))?;
    }

    tracing::info!(count, "Admin accounts seeded");
    Ok(())
}
