//! Shared application state

use std::sync::Arc;

use crate::email::EmailSender;
use crate::payment::PaymentProcessor;
use crate::store::{DataStore, SessionStore};

/// State shared across all request handlers.
///
/// Generic over the backing implementations so tests can inject in-memory
/// stores and mock senders while production wires up SQLite and SMTP.
pub struct AppState<D, S, E, P> {
    pub store: Arc<D>,
    pub sessions: Arc<S>,
    pub email_sender: Arc<E>,
    pub processor: Arc<P>,
}

impl<D, S, E, P> AppState<D, S, E, P>
where
    D: DataStore,
    S: SessionStore,
    E: EmailSender,
    P: PaymentProcessor,
{
    pub fn new(store: Arc<D>, sessions: Arc<S>, email_sender: Arc<E>, processor: Arc<P>) -> Self {
        Self {
            store,
            sessions,
            email_sender,
            processor,
        }
    }
}
