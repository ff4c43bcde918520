//! Stripe payment processor
//!
//! Talks to the Stripe REST API with a blocking client; callers go through
//! the `spawn_blocking` wrappers in the parent module.

use std::time::Duration;

use serde::Deserialize;

use super::{IntentMetadata, IntentStatus, PaymentIntent, PaymentProcessor};

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Processor backed by the Stripe payment intents API.
pub struct StripeProcessor {
    secret_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
    status: String,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeProcessor {
    pub fn new(secret_key: String) -> Self {
        Self {
            secret_key,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point at a different API host (Stripe-compatible test servers).
    pub fn with_api_base(secret_key: String, api_base: String) -> Self {
        Self {
            secret_key,
            api_base,
        }
    }

    // reqwest::blocking::Client isn't Send, so build one per call inside
    // the blocking task rather than holding it in the struct.
    fn client(&self) -> Result<reqwest::blocking::Client, String> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))
    }

    fn parse_response(response: reqwest::blocking::Response) -> Result<PaymentIntent, String> {
        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorBody>()
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(format!("Stripe returned {}: {}", status, message));
        }

        let intent: StripeIntent = response
            .json()
            .map_err(|e| format!("Failed to parse Stripe response: {}", e))?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: IntentStatus::from_str(&intent.status),
            amount_minor: intent.amount,
        })
    }
}

impl PaymentProcessor for StripeProcessor {
    fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        metadata: &IntentMetadata,
    ) -> Result<PaymentIntent, String> {
        let amount = amount_minor.to_string();
        let user_id = metadata.user_id.to_string();
        let form: Vec<(&str, &str)> = vec![
            ("amount", amount.as_str()),
            ("currency", currency),
            ("automatic_payment_methods[enabled]", "true"),
            ("metadata[user_id]", user_id.as_str()),
            ("metadata[plan]", metadata.plan.as_str()),
        ];

        let response = self
            .client()?
            .post(format!("{}/v1/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .map_err(|e| format!("Stripe request failed: {}", e))?;

        Self::parse_response(response)
    }

    fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, String> {
        let response = self
            .client()?
            .get(format!("{}/v1/payment_intents/{}", self.api_base, intent_id))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .map_err(|e| format!("Stripe request failed: {}", e))?;

        Self::parse_response(response)
    }
}
