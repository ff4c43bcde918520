//! In-memory payment processor for development and tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use uuid::Uuid;

use super::{IntentMetadata, IntentStatus, PaymentIntent, PaymentProcessor};

/// Holds intents in memory. Intents start unpaid; tests flip them to
/// succeeded with [`MockProcessor::complete`].
#[derive(Default)]
pub struct MockProcessor {
    intents: RwLock<HashMap<String, PaymentIntent>>,
    retrieve_calls: AtomicUsize,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an intent as paid, as if the cardholder completed checkout.
    pub fn complete(&self, intent_id: &str) -> bool {
        let mut intents = self.intents.write().unwrap();
        match intents.get_mut(intent_id) {
            Some(intent) => {
                intent.status = IntentStatus::Succeeded;
                true
            }
            None => false,
        }
    }

    /// How many times `retrieve_intent` has been called.
    pub fn retrieve_calls(&self) -> usize {
        self.retrieve_calls.load(Ordering::SeqCst)
    }
}

impl PaymentProcessor for MockProcessor {
    fn create_intent(
        &self,
        amount_minor: i64,
        _currency: &str,
        _metadata: &IntentMetadata,
    ) -> Result<PaymentIntent, String> {
        let id = format!("pi_{}", Uuid::new_v4().simple());
        let intent = PaymentIntent {
            id: id.clone(),
            client_secret: Some(format!("{}_secret_{}", id, Uuid::new_v4().simple())),
            status: IntentStatus::RequiresPaymentMethod,
            amount_minor,
        };

        self.intents.write().unwrap().insert(id, intent.clone());
        Ok(intent)
    }

    fn retrieve_intent(&self, intent_id: &str) -> Result<PaymentIntent, String> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);

        self.intents
            .read()
            .unwrap()
            .get(intent_id)
            .cloned()
            .ok_or_else(|| format!("No such payment intent: {}", intent_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_lifecycle() {
        let processor = MockProcessor::new();
        let metadata = IntentMetadata {
            user_id: 1,
            plan: "monthly".to_string(),
        };

        let intent = processor.create_intent(1000, "usd", &metadata).unwrap();
        assert!(intent.id.starts_with("pi_"));
        assert!(intent.client_secret.is_some());
        assert_eq!(intent.status, IntentStatus::RequiresPaymentMethod);

        assert!(processor.complete(&intent.id));

        let retrieved = processor.retrieve_intent(&intent.id).unwrap();
        assert_eq!(retrieved.status, IntentStatus::Succeeded);
        assert_eq!(retrieved.amount_minor, 1000);
        assert_eq!(processor.retrieve_calls(), 1);
    }

    #[test]
    fn unknown_intent_errors() {
        let processor = MockProcessor::new();
        assert!(processor.retrieve_intent("pi_missing").is_err());
        assert!(!processor.complete("pi_missing"));
    }
}
