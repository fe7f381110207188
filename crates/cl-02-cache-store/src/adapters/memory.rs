//! In-memory document store.
//!
//! Every operation runs under one `RwLock`, so compare-and-create, atomic
//! increment and batch commit are trivially atomic. Production uses a
//! document database with equivalent guarantees.

use crate::ports::outbound::{CacheStore, CreateOutcome};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use shared_types::{CollectionPath, Document, DocumentPath, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use uuid::Uuid;

/// In-memory `CacheStore` for tests and the demo runtime.
#[derive(Default)]
pub struct InMemoryCacheStore {
    documents: RwLock<BTreeMap<DocumentPath, Document>>,
    /// Number of upcoming writes to reject (test hook).
    failing_writes: AtomicU32,
    /// Number of upcoming atomic increments to reject (test hook).
    failing_increments: AtomicU32,
    /// Count of successful merge writes and batch commits.
    merge_writes: AtomicU64,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `count` writes of any kind.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Reject the next `count` atomic increments only.
    pub fn fail_next_increments(&self, count: u32) {
        self.failing_increments.store(count, Ordering::SeqCst);
    }

    /// Successful merge writes (batch commits count once).
    pub fn merge_write_count(&self) -> u64 {
        self.merge_writes.load(Ordering::SeqCst)
    }

    /// Raw document snapshot.
    pub fn snapshot(&self, path: &DocumentPath) -> Option<Document> {
        self.documents.read().get(path).cloned()
    }

    /// Insert or replace a raw document (seeding / legacy shapes).
    pub fn put_raw(&self, path: DocumentPath, doc: Document) {
        self.documents.write().insert(path, doc);
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn check_write(&self, path: &str) -> StoreResult<()> {
        Self::trip(&self.failing_writes, path)
    }

    fn trip(counter: &AtomicU32, path: &str) -> StoreResult<()> {
        let tripped = counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if tripped {
            return Err(StoreError::WriteFailed {
                path: path.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        Ok(())
    }
}

fn merge_into(target: &mut Document, fields: Document) {
    for (key, value) in fields {
        target.insert(key, value);
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<Document>> {
        Ok(self.documents.read().get(path).cloned())
    }

    async fn create_if_absent(
        &self,
        path: &DocumentPath,
        fields: Document,
    ) -> StoreResult<CreateOutcome> {
        let mut docs = self.documents.write();
        if docs.contains_key(path) {
            return Ok(CreateOutcome::AlreadyExists);
        }
        self.check_write(&path.to_string())?;
        docs.insert(path.clone(), fields);
        Ok(CreateOutcome::Created)
    }

    async fn merge_write(&self, path: &DocumentPath, fields: Document) -> StoreResult<()> {
        let mut docs = self.documents.write();
        let doc = docs.get_mut(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        self.check_write(&path.to_string())?;
        merge_into(doc, fields);
        self.merge_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn atomic_increment(
        &self,
        path: &DocumentPath,
        field: &str,
        delta: i64,
    ) -> StoreResult<u64> {
        let mut docs = self.documents.write();
        let doc = docs.get_mut(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;
        Self::trip(&self.failing_increments, &path.to_string())?;
        let current = match doc.get(field) {
            None | Some(Value::Null) => 0,
            Some(v) => v.as_u64().ok_or_else(|| StoreError::NotNumeric {
                path: path.to_string(),
                field: field.to_string(),
            })?,
        };
        self.check_write(&path.to_string())?;
        let next = if delta >= 0 {
            current.saturating_add(delta.unsigned_abs())
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };
        doc.insert(field.to_string(), Value::from(next));
        Ok(next)
    }

    async fn add_document(
        &self,
        collection: &CollectionPath,
        fields: Document,
    ) -> StoreResult<String> {
        let mut docs = self.documents.write();
        let key = Uuid::new_v4().simple().to_string();
        let path = collection.doc(key.clone());
        self.check_write(&path.to_string())?;
        docs.insert(path, fields);
        Ok(key)
    }

    async fn list_documents(
        &self,
        collection: &CollectionPath,
    ) -> StoreResult<Vec<(String, Document)>> {
        let prefix = collection.segments();
        Ok(self
            .documents
            .read()
            .iter()
            .filter(|(path, _)| {
                let segs = path.segments();
                segs.len() == prefix.len() + 1 && segs.starts_with(prefix)
            })
            .map(|(path, doc)| (path.key().to_string(), doc.clone()))
            .collect())
    }

    async fn commit_batch(&self, writes: Vec<(DocumentPath, Document)>) -> StoreResult<()> {
        let mut docs = self.documents.write();
        if let Some((missing, _)) = writes.iter().find(|(path, _)| !docs.contains_key(path)) {
            return Err(StoreError::BatchFailed {
                reason: format!("document not found: {missing}"),
            });
        }
        self.check_write("batch")
            .map_err(|e| StoreError::BatchFailed {
                reason: e.to_string(),
            })?;
        for (path, fields) in writes {
            if let Some(doc) = docs.get_mut(&path) {
                merge_into(doc, fields);
            }
        }
        self.merge_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
