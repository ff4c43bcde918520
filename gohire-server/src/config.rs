//! Service configuration

use serde::Deserialize;

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,
    /// SQLite database path; in-memory stores are used when unset
    pub database: Option<String>,
    /// Path to a JSON file of admin accounts to seed at startup
    pub admin_accounts: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("GOHIRE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database: std::env::var("GOHIRE_DATABASE").ok(),
            admin_accounts: std::env::var("GOHIRE_ADMIN_ACCOUNTS").ok(),
        }
    }
}

/// One admin account from the seed file. Passwords are plaintext in the
/// file and hashed before they reach the store.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_premium: bool,
}

/// Load admin seeds from a JSON file (an array of accounts).
pub fn load_admin_seeds(path: &str) -> anyhow::Result<Vec<AdminSeed>> {
    let contents = std::fs::read_to_string(path)?;
    let seeds: Vec<AdminSeed> = serde_json::from_str(&contents)?;
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_seed_parses_with_default_premium() {
        let seeds: Vec<AdminSeed> = serde_json::from_str(
            r#"[{"email": "ops@gohire.example", "password": "hunter22"}]"#,
        )
        .unwrap();
        assert_eq!(seeds.len(), 1);
        assert!(!seeds[0].is_premium);
    }
}
