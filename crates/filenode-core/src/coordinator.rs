//! `FileNode`: the binding-and-storage coordinator.
//!
//! Mediates between a [`BlobStore`], an [`Index`], and a [`QuotaClient`].
//! None of those traits know about each other; `FileNode` is the only place
//! that does, mirroring the original `fileNode` struct it's grounded on —
//! a thin orchestrator holding references to each collaborator and nothing
//! else.

use crate::error::{FileNodeError, Result};
use cid::Cid;
use filenode_block::{BlobStore, BlobStoreError, Block};
use filenode_index::{Availability, FileInfo, Index, SpaceInfo};
use filenode_quota::QuotaClient;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, instrument};

/// The `file_id` that bypasses space binding and quota checks entirely.
///
/// Blocks submitted under this id are still content-validated and
/// deduplicated against the store, but are only registered as globally
/// known — never bound to a space or counted against a quota. Used when
/// re-importing blocks whose space assignment will be established by a
/// later, ordinary `add`.
pub const MIGRATION_FILE_ID: &str = "__migration__";

pub struct FileNode {
    store: Arc<dyn BlobStore>,
    index: Arc<dyn Index>,
    quota: Arc<dyn QuotaClient>,
    migration_file_id: String,
}

/// Builds a [`FileNode`] from its three collaborators.
pub struct FileNodeBuilder {
    store: Option<Arc<dyn BlobStore>>,
    index: Option<Arc<dyn Index>>,
    quota: Option<Arc<dyn QuotaClient>>,
    migration_file_id: String,
}

impl Default for FileNodeBuilder {
    fn default() -> Self {
        Self {
            store: None,
            index: None,
            quota: None,
            migration_file_id: MIGRATION_FILE_ID.to_string(),
        }
    }
}

impl FileNodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn index(mut self, index: Arc<dyn Index>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn quota(mut self, quota: Arc<dyn QuotaClient>) -> Self {
        self.quota = Some(quota);
        self
    }

    pub fn migration_file_id(mut self, id: impl Into<String>) -> Self {
        self.migration_file_id = id.into();
        self
    }

    pub fn build(self) -> Result<FileNode> {
        Ok(FileNode {
            store: self
                .store
                .ok_or_else(|| FileNodeError::Internal("FileNodeBuilder: store not set".into()))?,
            index: self
                .index
                .ok_or_else(|| FileNodeError::Internal("FileNodeBuilder: index not set".into()))?,
            quota: self
                .quota
                .ok_or_else(|| FileNodeError::Internal("FileNodeBuilder: quota not set".into()))?,
            migration_file_id: self.migration_file_id,
        })
    }
}

impl FileNode {
    pub fn builder() -> FileNodeBuilder {
        FileNodeBuilder::new()
    }

    /// Fetch a single block by CID. No space or identity is involved — any
    /// caller who knows the CID may read it.
    ///
    /// The index is the source of truth for whether a CID exists at all;
    /// it's checked before the store is ever touched. If the index says a
    /// CID is known but the store has no bytes for it, that's the two
    /// collaborators disagreeing about the world — ordinarily impossible,
    /// seen only after a crash partway through `add`'s upload-then-bind
    /// sequence — and is logged at error level rather than silently
    /// surfaced as an ordinary not-found.
    #[instrument(skip(self))]
    pub async fn get(&self, cid: &Cid) -> Result<Block> {
        if !self.index.exists(cid).await? {
            return Err(FileNodeError::CidNotFound(*cid));
        }

        match self.store.get(cid).await {
            Ok(data) => Ok(Block::new(*cid, data)),
            Err(BlobStoreError::NotFound(cid)) => {
                error!(%cid, "index reports cid as known but blob store has no bytes for it");
                Err(FileNodeError::CidNotFound(cid))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Upload and bind a set of blocks to `file_id` within `space_id`.
    ///
    /// Blocks submitted under [`Self::migration_file_id`] skip space
    /// binding and quota checks and are routed to [`Self::migrate`]
    /// instead.
    #[instrument(skip(self, identity, blocks))]
    pub async fn add(
        &self,
        space_id: &str,
        file_id: &str,
        identity: &[u8],
        blocks: &[Block],
    ) -> Result<()> {
        if file_id == self.migration_file_id {
            return self.migrate(blocks).await;
        }

        self.validate_space(space_id, identity, true).await?;

        // Verify before taking any lock: a tampered block is rejected
        // without ever contending for the real per-CID locks.
        verify_hashes(blocks)?;

        let cids: Vec<Cid> = blocks.iter().map(|b| b.cid).collect();
        let _guard = self.index.lock(&cids).await;

        self.upload_missing(blocks).await?;
        self.index.bind(space_id, file_id, blocks).await?;
        Ok(())
    }

    /// Register blocks as globally known without binding them to any space
    /// or file. No quota check: migrated content isn't yet charged to
    /// anyone.
    #[instrument(skip(self, blocks))]
    pub async fn migrate(&self, blocks: &[Block]) -> Result<()> {
        verify_hashes(blocks)?;

        let cids: Vec<Cid> = blocks.iter().map(|b| b.cid).collect();
        let _guard = self.index.lock(&cids).await;

        self.upload_missing(blocks).await?;
        self.index.add_blocks(blocks).await?;
        Ok(())
    }

    /// Bind already-known CIDs to `file_id` without re-uploading their
    /// bytes. Still subject to the space's quota, since it still grows the
    /// space's accounted usage.
    #[instrument(skip(self, identity, cids))]
    pub async fn blocks_bind(
        &self,
        space_id: &str,
        file_id: &str,
        identity: &[u8],
        cids: &[Cid],
    ) -> Result<()> {
        self.validate_space(space_id, identity, true).await?;
        let _guard = self.index.lock(cids).await;
        self.index.bind_cids(space_id, file_id, cids).await?;
        Ok(())
    }

    /// Availability of each CID relative to `space_id`: not known anywhere,
    /// known globally but not in this space, or bound in this space.
    #[instrument(skip(self, identity, cids))]
    pub async fn check(
        &self,
        space_id: &str,
        identity: &[u8],
        cids: &[Cid],
    ) -> Result<HashMap<Cid, Availability>> {
        self.validate_space(space_id, identity, false).await?;

        let in_space = self.index.exists_in_space(space_id, cids).await?;
        let mut result = HashMap::with_capacity(cids.len());
        for cid in cids {
            let availability = if in_space.contains(cid) {
                Availability::ExistsInSpace
            } else if self.index.exists(cid).await? {
                Availability::Exists
            } else {
                Availability::NotExists
            };
            result.insert(*cid, availability);
        }
        Ok(result)
    }

    /// Unbind one or more files from `space_id`. Does not check the space's
    /// quota (deleting never increases usage); still requires the identity
    /// to have standing in the space.
    #[instrument(skip(self, identity, file_ids))]
    pub async fn files_delete(
        &self,
        space_id: &str,
        identity: &[u8],
        file_ids: &[String],
    ) -> Result<()> {
        self.validate_space(space_id, identity, false).await?;
        for file_id in file_ids {
            self.index.unbind(space_id, file_id).await?;
        }
        Ok(())
    }

    #[instrument(skip(self, identity))]
    pub async fn space_info(&self, space_id: &str, identity: &[u8]) -> Result<SpaceInfo> {
        self.validate_space(space_id, identity, false).await?;
        Ok(self.index.space_info(space_id).await?)
    }

    #[instrument(skip(self, identity))]
    pub async fn file_info(
        &self,
        space_id: &str,
        file_id: &str,
        identity: &[u8],
    ) -> Result<FileInfo> {
        self.validate_space(space_id, identity, false).await?;
        Ok(self.index.file_info(space_id, file_id).await?)
    }

    /// Confirm `identity` has standing in `space_id`, and optionally that
    /// the space hasn't already reached its quota.
    ///
    /// The limit check is deliberately lenient: it compares usage *before*
    /// this request's writes land, so a single request can push a space
    /// slightly over its limit. The alternative — reserving budget ahead of
    /// the write — would require the quota authority to participate in the
    /// per-CID lock, which it does not.
    async fn validate_space(&self, space_id: &str, identity: &[u8], check_limit: bool) -> Result<()> {
        let limit = self.quota.check_limit(space_id, identity).await?;
        if check_limit {
            let used = self.index.space_size(space_id).await?;
            if used >= limit {
                return Err(FileNodeError::SpaceLimitExceeded {
                    space: space_id.to_string(),
                    limit,
                    used,
                });
            }
        }
        Ok(())
    }

    async fn upload_missing(&self, blocks: &[Block]) -> Result<()> {
        let missing = self.index.get_non_existent_blocks(blocks).await?;
        if !missing.is_empty() {
            self.store.add(&missing).await?;
        }
        Ok(())
    }
}

fn verify_hashes(blocks: &[Block]) -> Result<()> {
    for block in blocks {
        if !block.hash_matches() {
            return Err(FileNodeError::WrongHash(block.cid));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filenode_block::MemoryBlobStore;
    use filenode_index::InProcessIndex;
    use filenode_quota::StaticQuotaClient;

    fn node_with_limit(limit: u64) -> FileNode {
        FileNode::builder()
            .store(Arc::new(MemoryBlobStore::default()))
            .index(Arc::new(InProcessIndex::new()))
            .quota(Arc::new(StaticQuotaClient::new(limit)))
            .build()
            .unwrap()
    }

    fn block(bytes: &'static [u8]) -> Block {
        Block::from_data(bytes)
    }

    #[tokio::test]
    async fn s1_add_then_get_roundtrips() {
        let node = node_with_limit(1_000_000);
        let b = block(b"hello world");
        node.add("s1", "f1", b"alice", &[b.clone()]).await.unwrap();

        let fetched = node.get(&b.cid).await.unwrap();
        assert_eq!(fetched.data, b.data);
    }

    #[tokio::test]
    async fn s2_add_rejects_tampered_block() {
        let node = node_with_limit(1_000_000);
        let mut b = block(b"original");
        b.data = bytes::Bytes::from_static(b"tampered");

        let err = node.add("s1", "f1", b"alice", &[b]).await.unwrap_err();
        assert!(matches!(err, FileNodeError::WrongHash(_)));
    }

    #[tokio::test]
    async fn s3_add_over_quota_is_rejected() {
        let node = node_with_limit(5);
        let b = block(b"this is more than five bytes");
        let err = node.add("s1", "f1", b"alice", &[b]).await.unwrap_err();
        assert!(matches!(err, FileNodeError::SpaceLimitExceeded { .. }));
    }

    #[tokio::test]
    async fn s4_dedup_across_files_shares_one_upload_but_two_bindings() {
        let node = node_with_limit(1_000_000);
        let b = block(b"shared payload");
        node.add("s1", "f1", b"alice", &[b.clone()]).await.unwrap();
        node.add("s1", "f2", b"alice", &[b.clone()]).await.unwrap();

        let info = node.space_info("s1", b"alice").await.unwrap();
        assert_eq!(info.cid_count, 1);
        assert_eq!(info.file_count, 2);
    }

    #[tokio::test]
    async fn s5_migration_file_id_skips_binding_and_quota() {
        let node = node_with_limit(1);
        let b = block(b"migrated content larger than the limit");
        node.add(
            "s1",
            MIGRATION_FILE_ID,
            b"alice",
            std::slice::from_ref(&b),
        )
        .await
        .unwrap();

        let fetched = node.get(&b.cid).await.unwrap();
        assert_eq!(fetched.data, b.data);
        let info = node.space_info("s1", b"alice").await.unwrap();
        assert_eq!(info.cid_count, 0, "migration must not bind to any space");
    }

    #[tokio::test]
    async fn s6_blocks_bind_attaches_known_cid_without_reupload() {
        let node = node_with_limit(1_000_000);
        let b = block(b"known elsewhere");
        node.add("s1", "f1", b"alice", &[b.clone()]).await.unwrap();
        node.blocks_bind("s1", "f2", b"alice", &[b.cid]).await.unwrap();

        let info = node.file_info("s1", "f2", b"alice").await.unwrap();
        assert_eq!(info.cid_count, 1);
    }

    #[tokio::test]
    async fn s7_files_delete_frees_usage_and_get_still_serves_shared_cid() {
        let node = node_with_limit(1_000_000);
        let b = block(b"deletable");
        node.add("s1", "f1", b"alice", &[b.clone()]).await.unwrap();
        node.add("s1", "f2", b"alice", &[b.clone()]).await.unwrap();

        node.files_delete("s1", b"alice", &["f1".to_string()])
            .await
            .unwrap();

        let info = node.space_info("s1", b"alice").await.unwrap();
        assert_eq!(info.file_count, 1);
        assert_eq!(info.cid_count, 1, "f2 still references the CID");
        assert!(node.get(&b.cid).await.is_ok());
    }

    #[tokio::test]
    async fn check_reports_availability_trichotomy() {
        let node = node_with_limit(1_000_000);
        let bound = block(b"bound");
        let global = block(b"global only");
        let unknown = block(b"unknown");

        node.add("s1", "f1", b"alice", &[bound.clone()]).await.unwrap();
        node.migrate(&[global.clone()]).await.unwrap();

        let result = node
            .check("s1", b"alice", &[bound.cid, global.cid, unknown.cid])
            .await
            .unwrap();
        assert_eq!(result[&bound.cid], Availability::ExistsInSpace);
        assert_eq!(result[&global.cid], Availability::Exists);
        assert_eq!(result[&unknown.cid], Availability::NotExists);
    }

    #[tokio::test]
    async fn denied_identity_is_forbidden() {
        let quota = Arc::new(StaticQuotaClient::new(1_000_000));
        quota.deny("s1");
        let node = FileNode::builder()
            .store(Arc::new(MemoryBlobStore::default()))
            .index(Arc::new(InProcessIndex::new()))
            .quota(quota)
            .build()
            .unwrap();

        let b = block(b"irrelevant");
        let err = node.add("s1", "f1", b"alice", &[b]).await.unwrap_err();
        assert!(matches!(err, FileNodeError::Forbidden(_)));
    }

    #[tokio::test]
    async fn check_denies_an_identity_with_no_standing_in_the_space() {
        let quota = Arc::new(StaticQuotaClient::new(1_000_000));
        quota.deny("s1");
        let node = FileNode::builder()
            .store(Arc::new(MemoryBlobStore::default()))
            .index(Arc::new(InProcessIndex::new()))
            .quota(quota)
            .build()
            .unwrap();

        let b = block(b"irrelevant");
        let err = node.check("s1", b"alice", &[b.cid]).await.unwrap_err();
        assert!(matches!(err, FileNodeError::Forbidden(_)));
    }

    #[tokio::test]
    async fn get_of_unknown_cid_is_not_found() {
        let node = node_with_limit(1_000_000);
        let b = block(b"never uploaded");
        let err = node.get(&b.cid).await.unwrap_err();
        assert!(matches!(err, FileNodeError::CidNotFound(_)));
    }
}
