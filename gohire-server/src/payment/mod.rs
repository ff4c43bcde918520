//! Payment processing
//!
//! Processors are synchronous (the Stripe client is blocking); handlers run
//! them through [`create_intent`] / [`retrieve_intent`], which move the call
//! onto the blocking thread pool.

pub mod mock;
pub mod stripe;

pub use mock::MockProcessor;
pub use stripe::StripeProcessor;

use std::sync::Arc;

/// Status of a payment intent as reported by the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentStatus {
    Succeeded,
    Processing,
    RequiresPaymentMethod,
    Canceled,
    Other(String),
}

impl IntentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            IntentStatus::Succeeded => "succeeded",
            IntentStatus::Processing => "processing",
            IntentStatus::RequiresPaymentMethod => "requires_payment_method",
            IntentStatus::Canceled => "canceled",
            IntentStatus::Other(s) => s,
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "succeeded" => IntentStatus::Succeeded,
            "processing" => IntentStatus::Processing,
            "requires_payment_method" => IntentStatus::RequiresPaymentMethod,
            "canceled" => IntentStatus::Canceled,
            other => IntentStatus::Other(other.to_string()),
        }
    }
}

/// A payment intent held at the processor.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    /// Secret the frontend uses to complete the payment; absent on retrieve.
    pub client_secret: Option<String>,
    pub status: IntentStatus,
    pub amount_minor: i64,
}

/// Metadata attached to an intent so it can be traced back to a purchase.
#[derive(Debug, Clone)]
pub struct IntentMetadata {
    pub user_id: u64,
    pub plan: String,
}

/// Creates and retrieves payment intents.
pub trait PaymentProcessor: Send + Sync {
    fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        metadata: &IntentMetadata,
    ) -> Result<PaymentIntent, String>;

    fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, String>;
}

impl PaymentProcessor for Box<dyn PaymentProcessor> {
    fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        metadata: &IntentMetadata,
    ) -> Result<PaymentIntent, String> {
        (**self).create_intent(amount_minor, currency, metadata)
    }

    fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, String> {
        (**self).retrieve_intent(intent_id)
    }
}

/// Create an intent without blocking the async runtime.
pub async fn create_intent<P>(
    processor: Arc<P>,
    amount_minor: i64,
    currency: String,
    metadata: IntentMetadata,
) -> Result<PaymentIntent, String>
where
    P: PaymentProcessor + 'static,
{
    tokio::task::spawn_blocking(move || processor.create_intent(amount_minor, &currency, &metadata))
        .await
        .map_err(|e| format!("Payment task failed: {}", e))?
}

/// Retrieve an intent without blocking the async runtime.
pub async fn retrieve_intent<P>(processor: Arc<P>, intent_id: String) -> Result<PaymentIntent, String>
where
    P: PaymentProcessor + 'static,
{
    tokio::task::spawn_blocking(move || processor.retrieve_intent(&intent_id))
        .await
        .map_err(|e| format!("Payment task failed: {}", e))?
}
