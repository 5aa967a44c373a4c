//! Per-owner application state: the collection, the current lookup, the
//! flashcard drill and the last entitlement snapshot.
//!
//! A workspace is driven by one caller at a time. Every remote result is
//! checked against the shared [`Teardown`] flag before it is applied, so a
//! sign-out that lands while a call is in flight discards the result.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use uuid::Uuid;

use crate::collection::VocabularyCollection;
use crate::entitlement::EntitlementSnapshot;
use crate::error::{CoreError, Result, SessionError};
use crate::events::{CollectionChange, WorkspaceEvent};
use crate::flashcard::{DrillSnapshot, FlashcardSession, Transition};
use crate::normalizer::{DefinitionNormalizer, TemplateExamples};
use crate::store::{DictionaryLookup, EntitlementSource, RecordStore};
use crate::types::{DictionaryLookupResult, Session, VocabularyRecord};

/// Shared closed flag for a workspace.
#[derive(Debug, Clone, Default)]
pub struct Teardown(Arc<AtomicBool>);

impl Teardown {
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A drill transition requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillAction {
    Reveal,
    Correct,
    Incorrect,
    Next,
    Previous,
    Restart,
    Close,
}

pub struct VocabularyWorkspace {
    session: Session,
    collection: VocabularyCollection,
    lookup: Option<DictionaryLookupResult>,
    drill: Option<FlashcardSession>,
    entitlement: Option<EntitlementSnapshot>,
    normalizer: DefinitionNormalizer,
    rng: StdRng,
    teardown: Teardown,
    events: Vec<WorkspaceEvent>,
}

impl VocabularyWorkspace {
    pub fn new(session: Session, teardown: Teardown) -> Self {
        Self::with_rng(session, teardown, StdRng::from_os_rng())
    }

    /// Seed example selection and drill shuffles from `rng`.
    pub fn with_rng(session: Session, teardown: Teardown, mut rng: StdRng) -> Self {
        let examples = TemplateExamples::with_rng(StdRng::from_rng(&mut rng));
        Self {
            collection: VocabularyCollection::new(session.user_id, teardown.clone()),
            session,
            lookup: None,
            drill: None,
            entitlement: None,
            normalizer: DefinitionNormalizer::with_writer(examples),
            rng,
            teardown,
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn owner_id(&self) -> Uuid {
        self.session.user_id
    }

    /// Swap in a refreshed access token for the same owner.
    pub fn refresh_session(&mut self, session: Session) {
        if session.user_id == self.session.user_id {
            self.session = session;
        }
    }

    pub fn collection(&self) -> &VocabularyCollection {
        &self.collection
    }

    pub fn current_lookup(&self) -> Option<&DictionaryLookupResult> {
        self.lookup.as_ref()
    }

    pub fn entitlement(&self) -> Option<EntitlementSnapshot> {
        self.entitlement
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_triggered()
    }

    /// Drain the changes recorded since the last call.
    pub fn take_events(&mut self) -> Vec<WorkspaceEvent> {
        std::mem::take(&mut self.events)
    }

    // === Collection ===

    /// Load the collection unless a load already succeeded.
    pub async fn ensure_loaded(&mut self, store: &dyn RecordStore) -> Result<()> {
        if !self.collection.is_loaded() {
            self.load(store).await?;
        }
        Ok(())
    }

    pub async fn load(&mut self, store: &dyn RecordStore) -> Result<usize> {
        self.ensure_live()?;
        let count = self.collection.load(store).await?;
        self.emit_collection(CollectionChange::Loaded, None);
        self.close_drill_if_empty();
        Ok(count)
    }

    pub async fn delete_word(&mut self, store: &dyn RecordStore, id: Uuid) -> Result<bool> {
        self.ensure_live()?;
        let removed = self.collection.delete(store, id).await?;
        if removed {
            self.emit_collection(CollectionChange::Removed, Some(id));
            self.close_drill_if_empty();
        }
        Ok(removed)
    }

    // === Lookup ===

    /// Look up `term`, replacing any previous result.
    pub async fn lookup(
        &mut self,
        dictionary: &dyn DictionaryLookup,
        term: &str,
    ) -> Result<&DictionaryLookupResult> {
        self.ensure_live()?;
        let term = term.trim();
        if term.is_empty() {
            return Err(CoreError::InvalidInput("search term is empty".to_string()));
        }

        self.lookup = None;
        let outcome = dictionary.lookup(&term.to_lowercase()).await;
        self.ensure_live()?;

        let result = match outcome {
            Ok(Some(result)) if !result.meanings.is_empty() => result,
            Ok(_) => {
                let err = CoreError::NotFound { word: term.to_string() };
                self.emit_lookup_failed(&err);
                return Err(err);
            }
            Err(err) => {
                self.emit_lookup_failed(&err);
                return Err(err);
            }
        };

        self.events.push(WorkspaceEvent::LookupResolved {
            word: result.word.clone(),
        });
        Ok(&*self.lookup.insert(result))
    }

    /// Normalize the current lookup, store it and put it at the front of the
    /// collection. The lookup is kept if the save fails so it can be retried.
    pub async fn save_lookup(&mut self, store: &dyn RecordStore) -> Result<VocabularyRecord> {
        self.ensure_live()?;
        let lookup = self
            .lookup
            .as_ref()
            .ok_or_else(|| CoreError::InvalidInput("nothing to save; look up a word first".to_string()))?;

        let draft = self.normalizer.normalize(lookup, self.owner_id())?;
        let stored = self.collection.save(store, draft).await?;

        self.lookup = None;
        self.emit_collection(CollectionChange::Added, Some(stored.id));
        Ok(stored)
    }

    // === Flashcards ===

    pub fn drill(&self) -> Option<&FlashcardSession> {
        self.drill.as_ref()
    }

    pub fn drill_snapshot(&self) -> Option<DrillSnapshot> {
        self.drill.as_ref().map(|d| d.snapshot())
    }

    /// Start a drill over the current collection, replacing any previous one.
    pub fn start_drill(&mut self) -> std::result::Result<DrillSnapshot, SessionError> {
        if self.collection.is_empty() {
            return Err(SessionError::EmptyCollection);
        }

        let mut drill = FlashcardSession::with_rng(StdRng::from_rng(&mut self.rng));
        drill.start(self.collection.records())?;
        let snapshot = drill.snapshot();
        self.drill = Some(drill);
        self.events.push(WorkspaceEvent::DrillChanged {
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }

    pub fn drill_action(
        &mut self,
        action: DrillAction,
    ) -> std::result::Result<(Transition, DrillSnapshot), SessionError> {
        let drill = self.drill.as_mut().ok_or(SessionError::NotStarted)?;
        let transition = match action {
            DrillAction::Reveal => drill.reveal()?,
            DrillAction::Correct => drill.mark_correct()?,
            DrillAction::Incorrect => drill.mark_incorrect()?,
            DrillAction::Next => drill.next()?,
            DrillAction::Previous => drill.previous()?,
            DrillAction::Restart => drill.restart()?,
            DrillAction::Close => drill.close(),
        };

        let snapshot = drill.snapshot();
        if transition == Transition::Applied {
            self.events.push(WorkspaceEvent::DrillChanged {
                snapshot: snapshot.clone(),
            });
        }
        Ok((transition, snapshot))
    }

    // === Entitlement ===

    /// Re-read subscription and orders. A failed read counts as "nothing".
    pub async fn refresh_entitlement(
        &mut self,
        source: &dyn EntitlementSource,
    ) -> Result<EntitlementSnapshot> {
        self.ensure_live()?;
        let subscription = source.subscription(&self.session).await.unwrap_or_else(|e| {
            tracing::warn!(owner = %self.session.user_id, error = %e, "subscription read failed");
            None
        });
        let orders = source.orders(&self.session).await.unwrap_or_else(|e| {
            tracing::warn!(owner = %self.session.user_id, error = %e, "orders read failed");
            Vec::new()
        });
        self.ensure_live()?;

        let snapshot = EntitlementSnapshot::compute(subscription.as_ref(), &orders);
        if self.entitlement != Some(snapshot) {
            self.events.push(WorkspaceEvent::EntitlementChanged { snapshot });
        }
        self.entitlement = Some(snapshot);
        Ok(snapshot)
    }

    // === Lifecycle ===

    /// Mark the workspace closed and drop everything it holds.
    pub fn tear_down(&mut self) {
        self.teardown.trigger();
        self.collection.clear();
        self.lookup = None;
        if let Some(drill) = self.drill.as_mut() {
            drill.close();
        }
        self.drill = None;
        self.entitlement = None;
        self.events.clear();
    }

    fn ensure_live(&self) -> Result<()> {
        if self.teardown.is_triggered() {
            return Err(CoreError::Discarded);
        }
        Ok(())
    }

    fn emit_collection(&mut self, change: CollectionChange, id: Option<Uuid>) {
        self.events.push(WorkspaceEvent::CollectionChanged {
            change,
            id,
            count: self.collection.len(),
        });
    }

    fn emit_lookup_failed(&mut self, err: &CoreError) {
        self.events.push(WorkspaceEvent::LookupFailed {
            message: err.user_message().to_string(),
        });
    }

    fn close_drill_if_empty(&mut self) {
        if !self.collection.is_empty() {
            return;
        }
        if let Some(mut drill) = self.drill.take() {
            drill.close();
            self.events.push(WorkspaceEvent::DrillChanged {
                snapshot: drill.snapshot(),
            });
        }
    }
}
