//! Core vocabulary library used by the VocabLog backend.
//!
//! Provides:
//! - Definition normalizer (dictionary lookup -> savable record)
//! - Owner-scoped vocabulary collection
//! - Flashcard drill state machine
//! - Premium entitlement and the product catalog
//! - Collaborator traits (record store, dictionary, billing, auth) with an
//!   in-memory record store
//! - Per-owner workspace tying the above together

pub mod collection;
pub mod entitlement;
pub mod error;
pub mod events;
pub mod flashcard;
pub mod normalizer;
pub mod products;
pub mod store;
pub mod types;
pub mod workspace;

pub use collection::VocabularyCollection;
pub use entitlement::{is_premium, EntitlementSnapshot, Plan};
pub use error::{CoreError, Result, SessionError};
pub use events::{CollectionChange, SessionChange, SessionEvents, Subscription as EventSubscription, WorkspaceEvent};
pub use flashcard::{CardBack, CardView, DrillPhase, DrillSnapshot, FlashcardSession, Transition};
pub use normalizer::{DefinitionNormalizer, ExampleWriter, TemplateExamples};
pub use products::{product_by_id, product_by_price_id, Product, PRODUCTS};
pub use store::memory::MemoryRecordStore;
pub use store::{CheckoutGateway, DictionaryLookup, EntitlementSource, RecordStore, SessionProvider};
pub use types::{
    CheckoutMode, CheckoutRequest, CheckoutSession, Definition, DictionaryLookupResult, Meaning,
    NewVocabularyRecord, Order, PaymentStatus, Session, Subscription, SubscriptionStatus,
    VocabularyRecord,
};
pub use workspace::{DrillAction, Teardown, VocabularyWorkspace};
