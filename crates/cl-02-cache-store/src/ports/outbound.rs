//! # Outbound Ports (Driven Ports)
//!
//! `CacheStore` is the raw document interface a host implements against its
//! document database. `CampaignStore` layers typed campaign, marker and
//! comment access on top and is implemented for every `CacheStore`.

use crate::domain::codec::{
    comment_from_document, comment_to_document, marker_from_document, marker_to_document,
    patch_to_document, record_from_document, record_to_document,
};
use crate::domain::{RecordFilter, RecordListing};
use async_trait::async_trait;
use shared_types::{
    ActionKind, ActionTarget, Address, CampaignCacheRecord, CampaignPatch, CollectionPath,
    Comment, Document, DocumentPath, PriorMarkers, StoreResult, UserActionMarker,
};
use tracing::warn;

/// Outcome of a compare-and-create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Abstract interface for the document store.
///
/// Production: a document database client.
/// Testing: `InMemoryCacheStore`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read one document.
    async fn get_document(&self, path: &DocumentPath) -> StoreResult<Option<Document>>;

    /// Create a document only if its key is free.
    ///
    /// Must be atomic with respect to duplicate keys: of two concurrent
    /// calls for the same path exactly one observes `Created`.
    async fn create_if_absent(
        &self,
        path: &DocumentPath,
        fields: Document,
    ) -> StoreResult<CreateOutcome>;

    /// Merge `fields` into an existing document. Fields not present in
    /// `fields` are left untouched. Fails with `NotFound` if absent.
    async fn merge_write(&self, path: &DocumentPath, fields: Document) -> StoreResult<()>;

    /// Atomically add `delta` to an unsigned counter field (missing = 0,
    /// floor at 0). Returns the new value.
    async fn atomic_increment(
        &self,
        path: &DocumentPath,
        field: &str,
        delta: i64,
    ) -> StoreResult<u64>;

    /// Insert a document under a generated key. Returns the key.
    async fn add_document(&self, collection: &CollectionPath, fields: Document)
        -> StoreResult<String>;

    /// Direct children of a collection as `(key, document)`.
    async fn list_documents(&self, collection: &CollectionPath)
        -> StoreResult<Vec<(String, Document)>>;

    /// Apply every merge write or none.
    async fn commit_batch(&self, writes: Vec<(DocumentPath, Document)>) -> StoreResult<()>;
}

/// Typed campaign access over any `CacheStore`.
#[async_trait]
pub trait CampaignStore: CacheStore {
    async fn get_record(&self, id: &str) -> StoreResult<Option<CampaignCacheRecord>> {
        match self.get_document(&DocumentPath::campaign(id)).await? {
            Some(doc) => record_from_document(id, &doc).map(Some),
            None => Ok(None),
        }
    }

    /// Create a campaign record under its opaque id.
    async fn insert_record(&self, record: &CampaignCacheRecord) -> StoreResult<CreateOutcome> {
        let doc = record_to_document(record)?;
        self.create_if_absent(&DocumentPath::campaign(&record.id), doc)
            .await
    }

    /// Merge-write the fields present in `patch`. Empty patches are no-ops.
    async fn merge_patch(&self, id: &str, patch: &CampaignPatch) -> StoreResult<()> {
        if patch.is_empty() {
            return Ok(());
        }
        let doc = patch_to_document(id, patch)?;
        self.merge_write(&DocumentPath::campaign(id), doc).await
    }

    /// Commit several campaign patches atomically.
    async fn commit_patches(&self, patches: &[(String, CampaignPatch)]) -> StoreResult<()> {
        let mut writes = Vec::with_capacity(patches.len());
        for (id, patch) in patches.iter().filter(|(_, p)| !p.is_empty()) {
            writes.push((DocumentPath::campaign(id), patch_to_document(id, patch)?));
        }
        if writes.is_empty() {
            return Ok(());
        }
        self.commit_batch(writes).await
    }

    /// Records matching `filter`. Documents failing validation are reported
    /// separately rather than failing the listing.
    async fn list_where(&self, filter: &RecordFilter) -> StoreResult<RecordListing> {
        let mut listing = RecordListing::default();
        for (id, doc) in self.list_documents(&CollectionPath::campaigns()).await? {
            match record_from_document(&id, &doc) {
                Ok(record) if filter.matches(&record) => listing.records.push(record),
                Ok(_) => {}
                Err(err) => {
                    warn!(campaign_id = %id, error = %err, "[cl-02] skipping malformed campaign document");
                    listing.malformed.push((id, err));
                }
            }
        }
        Ok(listing)
    }

    async fn get_marker(
        &self,
        target: &ActionTarget,
        kind: ActionKind,
        user: &Address,
    ) -> StoreResult<Option<UserActionMarker>> {
        let path = DocumentPath::marker(target, kind, user);
        match self.get_document(&path).await? {
            Some(doc) => marker_from_document(&path.to_string(), &doc).map(Some),
            None => Ok(None),
        }
    }

    /// Compare-and-create a marker keyed by the user's address.
    async fn create_marker(
        &self,
        target: &ActionTarget,
        marker: &UserActionMarker,
    ) -> StoreResult<CreateOutcome> {
        let path = DocumentPath::marker(target, marker.kind, &marker.user);
        let doc = marker_to_document(&path.to_string(), marker)?;
        self.create_if_absent(&path, doc).await
    }

    /// Like and vote markers one user holds on one campaign.
    async fn prior_markers(&self, campaign_id: &str, user: &Address) -> StoreResult<PriorMarkers> {
        let target = ActionTarget::campaign(campaign_id);
        Ok(PriorMarkers {
            like: self.get_marker(&target, ActionKind::Like, user).await?,
            vote: self.get_marker(&target, ActionKind::Vote, user).await?,
        })
    }

    async fn get_comment(&self, campaign_id: &str, comment_id: &str) -> StoreResult<Option<Comment>> {
        let path = DocumentPath::comment(campaign_id, comment_id);
        match self.get_document(&path).await? {
            Some(doc) => comment_from_document(&path.to_string(), comment_id, &doc).map(Some),
            None => Ok(None),
        }
    }

    /// Store a comment verbatim under a generated id. Returns the id.
    async fn insert_comment(&self, campaign_id: &str, comment: &Comment) -> StoreResult<String> {
        let collection = CollectionPath::comments(campaign_id);
        let doc = comment_to_document(&collection.to_string(), comment)?;
        self.add_document(&collection, doc).await
    }

    /// Comments of a campaign, oldest first.
    async fn list_comments(&self, campaign_id: &str) -> StoreResult<Vec<Comment>> {
        let collection = CollectionPath::comments(campaign_id);
        let mut comments = Vec::new();
        for (id, doc) in self.list_documents(&collection).await? {
            let path = collection.doc(id.clone());
            comments.push(comment_from_document(&path.to_string(), &id, &doc)?);
        }
        comments.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
        Ok(comments)
    }
}

impl<S: CacheStore + ?Sized> CampaignStore for S {}
