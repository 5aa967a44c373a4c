//! In-memory record store, used by tests and local runs without a database.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use super::RecordStore;
use crate::error::{CoreError, Result};
use crate::types::{NewVocabularyRecord, VocabularyRecord};

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<VocabularyRecord>,
    fail_next: bool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with `RemoteFailure`.
    pub fn fail_next(&self) {
        self.inner.lock().fail_next = true;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(inner: &mut Inner) -> Result<()> {
        if std::mem::take(&mut inner.fail_next) {
            return Err(CoreError::RemoteFailure("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<VocabularyRecord>> {
        let mut inner = self.inner.lock();
        Self::take_failure(&mut inner)?;

        let mut records: Vec<_> = inner
            .records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn insert(&self, record: NewVocabularyRecord) -> Result<VocabularyRecord> {
        let mut inner = self.inner.lock();
        Self::take_failure(&mut inner)?;

        // Keep created_at strictly increasing so ordering is deterministic.
        let now = Utc::now();
        let created_at = match inner.records.iter().map(|r| r.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        };

        let stored = VocabularyRecord {
            id: Uuid::new_v4(),
            word: record.word,
            meaning: record.meaning,
            example: record.example,
            synonyms: record.synonyms,
            antonyms: record.antonyms,
            owner_id: record.owner_id,
            created_at,
        };
        inner.records.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::take_failure(&mut inner)?;

        inner.records.retain(|r| !(r.id == id && r.owner_id == owner_id));
        Ok(())
    }
}
