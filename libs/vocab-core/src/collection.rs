//! Owner-scoped vocabulary collection, newest first.
//!
//! Remote calls always happen before the in-memory list changes, so a failed
//! call leaves the collection matching the last known-good store state.

use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::store::RecordStore;
use crate::types::{NewVocabularyRecord, VocabularyRecord};
use crate::workspace::Teardown;

#[derive(Debug, Clone)]
pub struct VocabularyCollection {
    owner_id: Uuid,
    records: Vec<VocabularyRecord>,
    loaded: bool,
    teardown: Teardown,
}

impl VocabularyCollection {
    pub fn new(owner_id: Uuid, teardown: Teardown) -> Self {
        Self {
            owner_id,
            records: Vec::new(),
            loaded: false,
            teardown,
        }
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn records(&self) -> &[VocabularyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether at least one `load` has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the list with the store's current contents.
    pub async fn load(&mut self, store: &dyn RecordStore) -> Result<usize> {
        let records = store.list(self.owner_id).await?;
        self.ensure_live()?;

        tracing::debug!(owner = %self.owner_id, count = records.len(), "loaded collection");
        self.records = records;
        self.loaded = true;
        Ok(self.records.len())
    }

    /// Persist a draft, then prepend the stored record.
    pub async fn save(
        &mut self,
        store: &dyn RecordStore,
        draft: NewVocabularyRecord,
    ) -> Result<VocabularyRecord> {
        if draft.owner_id != self.owner_id {
            return Err(CoreError::InvalidInput("record belongs to another owner".to_string()));
        }

        let stored = store.insert(draft).await?;
        self.ensure_live()?;

        tracing::debug!(owner = %self.owner_id, id = %stored.id, word = %stored.word, "saved word");
        self.insert_front(stored.clone());
        Ok(stored)
    }

    /// Delete remotely, then drop the local copy. Returns whether a local
    /// record was removed.
    pub async fn delete(&mut self, store: &dyn RecordStore, id: Uuid) -> Result<bool> {
        store.delete(self.owner_id, id).await?;
        self.ensure_live()?;

        let removed = self.remove_by_id(id).is_some();
        tracing::debug!(owner = %self.owner_id, %id, removed, "deleted word");
        Ok(removed)
    }

    /// Prepend a stored record. Duplicate word text is allowed.
    pub fn insert_front(&mut self, record: VocabularyRecord) {
        self.records.insert(0, record);
    }

    /// Remove at most one record; unknown ids are a no-op.
    pub fn remove_by_id(&mut self, id: Uuid) -> Option<VocabularyRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }

    /// Drop everything, e.g. on sign-out.
    pub fn clear(&mut self) {
        self.records.clear();
        self.loaded = false;
    }

    fn ensure_live(&self) -> Result<()> {
        if self.teardown.is_triggered() {
            return Err(CoreError::Discarded);
        }
        Ok(())
    }
}
