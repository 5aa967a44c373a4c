//! Common test utilities and fakes for integration tests.
//!
//! `TestContext` wires the router to in-memory stand-ins for every external
//! collaborator, so these tests run without a database or network.
//! `TestContext::with_database` swaps in Postgres for the record store.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use vocab_core::{
    CheckoutGateway, CheckoutRequest, CheckoutSession, CoreError, DictionaryLookup,
    DictionaryLookupResult, EntitlementSource, MemoryRecordStore, Order, PaymentStatus,
    RecordStore, Session, SessionProvider, Subscription, SubscriptionStatus,
};
use vocablog_backend::config::Config;
use vocablog_backend::db::Database;
use vocablog_backend::{build_router, AppState};

// === Fakes ===

/// Token -> session table; sign-out invalidates the token.
#[derive(Default)]
pub struct FakeAuth {
    sessions: Mutex<HashMap<String, Session>>,
}

impl FakeAuth {
    pub fn issue(&self, user_id: Uuid) -> String {
        let token = format!("token-{}", Uuid::new_v4());
        self.sessions.lock().insert(
            token.clone(),
            Session {
                user_id,
                access_token: token.clone(),
                email: Some(format!("{user_id}@example.com")),
            },
        );
        token
    }
}

#[async_trait]
impl SessionProvider for FakeAuth {
    async fn current_session(&self, access_token: &str) -> vocab_core::Result<Option<Session>> {
        Ok(self.sessions.lock().get(access_token).cloned())
    }

    async fn sign_out(&self, access_token: &str) -> vocab_core::Result<()> {
        self.sessions.lock().remove(access_token);
        Ok(())
    }
}

/// Dictionary answering from a fixed table. `offline` simulates a
/// transport failure.
#[derive(Default)]
pub struct FakeDictionary {
    entries: HashMap<String, DictionaryLookupResult>,
    offline: AtomicBool,
}

impl FakeDictionary {
    pub fn with_entries(entries: Vec<DictionaryLookupResult>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.word.clone(), e)).collect(),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl DictionaryLookup for FakeDictionary {
    async fn lookup(&self, word: &str) -> vocab_core::Result<Option<DictionaryLookupResult>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CoreError::LookupFailed("connection refused".to_string()));
        }
        Ok(self.entries.get(word).cloned())
    }
}

/// Billing read model keyed by user id.
#[derive(Default)]
pub struct FakeBilling {
    subscriptions: Mutex<HashMap<Uuid, SubscriptionStatus>>,
    paid_orders: Mutex<HashMap<Uuid, usize>>,
    failing: AtomicBool,
}

impl FakeBilling {
    pub fn set_subscription(&self, user_id: Uuid, status: SubscriptionStatus) {
        self.subscriptions.lock().insert(user_id, status);
    }

    pub fn add_paid_order(&self, user_id: Uuid) {
        *self.paid_orders.lock().entry(user_id).or_default() += 1;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntitlementSource for FakeBilling {
    async fn subscription(&self, session: &Session) -> vocab_core::Result<Option<Subscription>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::RemoteFailure("billing unavailable".to_string()));
        }
        Ok(self
            .subscriptions
            .lock()
            .get(&session.user_id)
            .map(|status| Subscription {
                subscription_status: *status,
                price_id: None,
                current_period_end: None,
                cancel_at_period_end: false,
            }))
    }

    async fn orders(&self, session: &Session) -> vocab_core::Result<Vec<Order>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::RemoteFailure("billing unavailable".to_string()));
        }
        let count = self
            .paid_orders
            .lock()
            .get(&session.user_id)
            .copied()
            .unwrap_or(0);
        Ok((0..count)
            .map(|i| Order {
                order_id: i as i64 + 1,
                checkout_session_id: format!("cs_test_{i}"),
                payment_status: PaymentStatus::Paid,
                amount_total: 299,
                currency: "gbp".to_string(),
                order_date: Utc::now(),
            })
            .collect())
    }
}

/// Records requests; `reject_with` makes the next calls fail like the
/// gateway does.
#[derive(Default)]
pub struct FakeCheckout {
    pub requests: Mutex<Vec<(CheckoutRequest, String)>>,
    reject_with: Mutex<Option<String>>,
}

impl FakeCheckout {
    pub fn reject_with(&self, message: &str) {
        *self.reject_with.lock() = Some(message.to_string());
    }
}

#[async_trait]
impl CheckoutGateway for FakeCheckout {
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
        bearer_token: &str,
    ) -> vocab_core::Result<CheckoutSession> {
        if let Some(message) = self.reject_with.lock().clone() {
            return Err(CoreError::RemoteFailure(message));
        }
        self.requests
            .lock()
            .push((request.clone(), bearer_token.to_string()));
        Ok(CheckoutSession {
            session_id: "cs_test_123".to_string(),
            url: "https://checkout.example.com/pay/cs_test_123".to_string(),
        })
    }
}

// === Context ===

/// Test context containing the fakes and the router under test.
pub struct TestContext {
    pub state: AppState,
    pub store: Arc<MemoryRecordStore>,
    pub auth: Arc<FakeAuth>,
    pub dictionary: Arc<FakeDictionary>,
    pub billing: Arc<FakeBilling>,
    pub checkout: Arc<FakeCheckout>,
    app: Router,
}

impl TestContext {
    /// Context backed entirely by in-memory fakes.
    pub fn new() -> Self {
        let store = Arc::new(MemoryRecordStore::new());
        Self::build(store.clone(), store)
    }

    /// Context whose record store is the Postgres database at DATABASE_URL.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or the connection fails.
    pub async fn with_database() -> (Self, Arc<Database>) {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations().await.expect("Failed to run migrations");

        let db = Arc::new(db);
        (Self::build(db.clone(), Arc::new(MemoryRecordStore::new())), db)
    }

    fn build(records: Arc<dyn RecordStore>, store: Arc<MemoryRecordStore>) -> Self {
        let auth = Arc::new(FakeAuth::default());
        let dictionary = Arc::new(FakeDictionary::with_entries(fixtures::dictionary_entries()));
        let billing = Arc::new(FakeBilling::default());
        let checkout = Arc::new(FakeCheckout::default());

        let state = AppState::new(
            test_config(),
            records,
            billing.clone(),
            dictionary.clone(),
            checkout.clone(),
            auth.clone(),
        );
        let app = build_router(state.clone());

        Self {
            state,
            store,
            auth,
            dictionary,
            billing,
            checkout,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Sign in a fresh user and return its ID and token.
    pub fn sign_in(&self) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = self.auth.issue(user_id);
        (user_id, token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/vocablog_test".to_string()),
        "AUTH_URL" => Some("http://auth.test".to_string()),
        "AUTH_ANON_KEY" => Some("anon".to_string()),
        "APP_ORIGIN" => Some("http://app.test".to_string()),
        _ => None,
    })
    .expect("test config is complete")
}
