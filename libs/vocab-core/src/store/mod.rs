//! Contracts for the external collaborators the core talks to.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{
    CheckoutRequest, CheckoutSession, DictionaryLookupResult, NewVocabularyRecord, Order, Session,
    Subscription, VocabularyRecord,
};

pub mod memory;

/// CRUD over the owner-scoped "words" resource.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All of the owner's records, newest first.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<VocabularyRecord>>;

    /// Persist a draft; the store assigns `id` and `created_at`.
    async fn insert(&self, record: NewVocabularyRecord) -> Result<VocabularyRecord>;

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()>;
}

/// Public dictionary lookup.
#[async_trait]
pub trait DictionaryLookup: Send + Sync {
    /// `Ok(None)` when the dictionary has no entry for the word.
    async fn lookup(&self, word: &str) -> Result<Option<DictionaryLookupResult>>;
}

/// Read side of the payment provider's entitlement state.
#[async_trait]
pub trait EntitlementSource: Send + Sync {
    async fn subscription(&self, session: &Session) -> Result<Option<Subscription>>;

    /// Orders, most recent first.
    async fn orders(&self, session: &Session) -> Result<Vec<Order>>;
}

/// Hosted checkout session creation.
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
        bearer_token: &str,
    ) -> Result<CheckoutSession>;
}

/// Account/session provider. Tokens are acquired by the client; the
/// backend only resolves them and ends sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolve an access token to its session; `Ok(None)` if it is not valid.
    async fn current_session(&self, access_token: &str) -> Result<Option<Session>>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;
}
