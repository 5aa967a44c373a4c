//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub use vocab_core::{
    CheckoutMode, DictionaryLookupResult, DrillSnapshot, EntitlementSnapshot, Order, PaymentStatus,
    Plan, Product, Subscription, SubscriptionStatus, Transition, VocabularyRecord, WorkspaceEvent,
};

// === Database Entity Types ===

/// Row of the `words` table
#[derive(Debug, Clone, FromRow)]
pub struct DbWord {
    pub id: Uuid,
    pub word: String,
    pub meaning: String,
    pub example: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl DbWord {
    pub fn into_record(self) -> VocabularyRecord {
        VocabularyRecord {
            id: self.id,
            word: self.word,
            meaning: self.meaning,
            example: self.example,
            synonyms: self.synonyms,
            antonyms: self.antonyms,
            owner_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

/// Row of the `stripe_user_subscriptions` view
#[derive(Debug, Clone, FromRow)]
pub struct DbSubscription {
    pub subscription_status: String,
    pub price_id: Option<String>,
    /// Unix seconds
    pub current_period_end: Option<i64>,
    pub cancel_at_period_end: bool,
}

impl DbSubscription {
    pub fn into_subscription(self) -> Subscription {
        Subscription {
            subscription_status: SubscriptionStatus::parse(&self.subscription_status),
            price_id: self.price_id,
            current_period_end: self
                .current_period_end
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            cancel_at_period_end: self.cancel_at_period_end,
        }
    }
}

/// Row of the `stripe_user_orders` view
#[derive(Debug, Clone, FromRow)]
pub struct DbOrder {
    pub order_id: i64,
    pub checkout_session_id: String,
    pub payment_status: String,
    pub amount_total: i64,
    pub currency: String,
    pub order_date: DateTime<Utc>,
}

impl DbOrder {
    pub fn into_order(self) -> Order {
        Order {
            order_id: self.order_id,
            checkout_session_id: self.checkout_session_id,
            payment_status: PaymentStatus::parse(&self.payment_status),
            amount_total: self.amount_total,
            currency: self.currency,
            order_date: self.order_date,
        }
    }
}

// === API Request/Response Types ===

/// GET /api/session response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// POST /api/session/sign-out response
#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub signed_out: bool,
}

/// A saved word as shown in the list
#[derive(Debug, Serialize)]
pub struct WordView {
    #[serde(flatten)]
    pub record: VocabularyRecord,
    pub display_word: String,
    pub added_on: String,
}

impl From<VocabularyRecord> for WordView {
    fn from(record: VocabularyRecord) -> Self {
        Self {
            display_word: record.display_word(),
            added_on: record.added_on(),
            record,
        }
    }
}

/// GET /api/words query
#[derive(Debug, Default, Deserialize)]
pub struct WordsQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /api/words response
#[derive(Debug, Serialize)]
pub struct WordListResponse {
    pub words: Vec<WordView>,
    pub count: usize,
    pub events: Vec<WorkspaceEvent>,
}

/// DELETE /api/words/{id} response
#[derive(Debug, Serialize)]
pub struct DeleteWordResponse {
    pub deleted: bool,
    pub count: usize,
    pub events: Vec<WorkspaceEvent>,
}

/// GET /api/lookup/{word} response
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub result: DictionaryLookupResult,
    pub events: Vec<WorkspaceEvent>,
}

/// POST /api/lookup response
#[derive(Debug, Serialize)]
pub struct SaveWordResponse {
    pub word: WordView,
    pub events: Vec<WorkspaceEvent>,
}

/// Flashcard endpoints response
#[derive(Debug, Serialize)]
pub struct DrillResponse {
    pub drill: Option<DrillSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
    pub events: Vec<WorkspaceEvent>,
}

/// GET /api/entitlement response
#[derive(Debug, Serialize)]
pub struct EntitlementResponse {
    pub is_premium: bool,
    pub plan: Plan,
    pub label: &'static str,
    pub events: Vec<WorkspaceEvent>,
}

impl EntitlementResponse {
    pub fn new(snapshot: EntitlementSnapshot, events: Vec<WorkspaceEvent>) -> Self {
        Self {
            is_premium: snapshot.is_premium,
            plan: snapshot.plan,
            label: snapshot.plan.label(),
            events,
        }
    }
}

/// GET /api/products response
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: &'static [Product],
}

/// POST /api/checkout request
#[derive(Debug, Deserialize)]
pub struct CheckoutBody {
    pub price_id: String,
}

/// POST /api/checkout response
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
    pub mode: CheckoutMode,
}
