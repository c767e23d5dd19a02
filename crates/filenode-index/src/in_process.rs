//! Single-process `Index` implementation.
//!
//! Suitable for one coordinator instance. A clustered deployment running
//! several coordinator replicas against a shared backing store would
//! implement the same `Index` trait against that store's transactions or
//! distributed locks instead — `FileNode` is agnostic to which.
//!
//! Global CID metadata (`cid_meta`) is only ever mutated for CIDs the caller
//! already holds the lock table's lock for (see `FileNode::add`), so those
//! mutations need no further synchronization here. Per-space aggregates
//! (`usage_bytes`, the distinct-CID set, and per-file CID sets) are guarded
//! by one `tokio::sync::Mutex` per space, so writes to *different* spaces —
//! or to different files within a space that share no CIDs — never block
//! each other; writes to the *same* space briefly serialize on that space's
//! mutex while updating in-memory bookkeeping, never while awaiting I/O.

use crate::error::{IndexError, Result};
use crate::lock::{LockGuard, LockTable};
use crate::types::{FileInfo, SpaceInfo};
use crate::Index;
use async_trait::async_trait;
use cid::Cid;
use dashmap::DashMap;
use filenode_block::Block;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

struct CidMeta {
    size: u64,
    /// Number of (space, file) bindings referencing this CID, across all
    /// spaces. Reaching zero marks the CID for collection by an (out of
    /// scope) sweeper; the record is not removed here.
    refcount: u64,
}

#[derive(Default)]
struct SpaceState {
    usage_bytes: u64,
    /// Distinct CIDs bound anywhere in the space.
    cids: HashSet<Cid>,
    /// Per-file CID sets.
    files: HashMap<String, HashSet<Cid>>,
}

/// In-process `Index`: a sharded per-CID lock table plus `DashMap`-backed
/// global and per-space bookkeeping.
pub struct InProcessIndex {
    lock_table: LockTable,
    cid_meta: DashMap<Cid, CidMeta>,
    spaces: DashMap<String, Arc<Mutex<SpaceState>>>,
}

impl InProcessIndex {
    pub fn new() -> Self {
        Self {
            lock_table: LockTable::new(),
            cid_meta: DashMap::new(),
            spaces: DashMap::new(),
        }
    }

    fn space_state(&self, space: &str) -> Arc<Mutex<SpaceState>> {
        self.spaces
            .entry(space.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SpaceState::default())))
            .clone()
    }
}

impl Default for InProcessIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Index for InProcessIndex {
    async fn lock(&self, cids: &[Cid]) -> LockGuard {
        self.lock_table.lock(cids).await
    }

    async fn exists(&self, cid: &Cid) -> Result<bool> {
        Ok(self.cid_meta.contains_key(cid))
    }

    async fn exists_in_space(&self, space: &str, cids: &[Cid]) -> Result<HashSet<Cid>> {
        let Some(state_arc) = self.spaces.get(space).map(|s| s.value().clone()) else {
            return Ok(HashSet::new());
        };
        let state = state_arc.lock().await;
        Ok(cids
            .iter()
            .filter(|cid| state.cids.contains(cid))
            .copied()
            .collect())
    }

    async fn get_non_existent_blocks(&self, blocks: &[Block]) -> Result<Vec<Block>> {
        Ok(blocks
            .iter()
            .filter(|b| !self.cid_meta.contains_key(&b.cid))
            .cloned()
            .collect())
    }

    async fn bind(&self, space: &str, file: &str, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            self.cid_meta
                .entry(block.cid)
                .or_insert_with(|| CidMeta {
                    size: block.size(),
                    refcount: 0,
                });
        }

        let state_arc = self.space_state(space);
        let mut state = state_arc.lock().await;

        for block in blocks {
            let cid = block.cid;
            let newly_in_file = {
                let file_cids = state.files.entry(file.to_string()).or_default();
                file_cids.insert(cid)
            };
            if newly_in_file {
                if let Some(mut meta) = self.cid_meta.get_mut(&cid) {
                    meta.refcount += 1;
                }
                let size = self.cid_meta.get(&cid).map(|m| m.size).unwrap_or(0);
                if state.cids.insert(cid) {
                    state.usage_bytes += size;
                }
            }
        }
        Ok(())
    }

    async fn bind_cids(&self, space: &str, file: &str, cids: &[Cid]) -> Result<()> {
        for cid in cids {
            if !self.cid_meta.contains_key(cid) {
                return Err(IndexError::CidNotFound(*cid));
            }
        }

        let state_arc = self.space_state(space);
        let mut state = state_arc.lock().await;

        for cid in cids {
            let newly_in_file = {
                let file_cids = state.files.entry(file.to_string()).or_default();
                file_cids.insert(*cid)
            };
            if newly_in_file {
                if let Some(mut meta) = self.cid_meta.get_mut(cid) {
                    meta.refcount += 1;
                }
                let size = self.cid_meta.get(cid).map(|m| m.size).unwrap_or(0);
                if state.cids.insert(*cid) {
                    state.usage_bytes += size;
                }
            }
        }
        Ok(())
    }

    async fn add_blocks(&self, blocks: &[Block]) -> Result<()> {
        for block in blocks {
            self.cid_meta
                .entry(block.cid)
                .or_insert_with(|| CidMeta {
                    size: block.size(),
                    refcount: 0,
                });
        }
        Ok(())
    }

    async fn unbind(&self, space: &str, file: &str) -> Result<()> {
        let Some(state_arc) = self.spaces.get(space).map(|s| s.value().clone()) else {
            return Ok(());
        };
        let mut state = state_arc.lock().await;
        let Some(file_cids) = state.files.remove(file) else {
            return Ok(());
        };

        for cid in &file_cids {
            if let Some(mut meta) = self.cid_meta.get_mut(cid) {
                meta.refcount = meta.refcount.saturating_sub(1);
            }
            let still_used_in_space = state.files.values().any(|cids| cids.contains(cid));
            if !still_used_in_space {
                state.cids.remove(cid);
                let size = self.cid_meta.get(cid).map(|m| m.size).unwrap_or(0);
                state.usage_bytes = state.usage_bytes.saturating_sub(size);
            }
        }
        Ok(())
    }

    async fn space_size(&self, space: &str) -> Result<u64> {
        let Some(state_arc) = self.spaces.get(space).map(|s| s.value().clone()) else {
            return Ok(0);
        };
        Ok(state_arc.lock().await.usage_bytes)
    }

    async fn space_info(&self, space: &str) -> Result<SpaceInfo> {
        let Some(state_arc) = self.spaces.get(space).map(|s| s.value().clone()) else {
            return Ok(SpaceInfo::default());
        };
        let state = state_arc.lock().await;
        Ok(SpaceInfo {
            cid_count: state.cids.len() as u64,
            file_count: state.files.len() as u64,
        })
    }

    async fn file_info(&self, space: &str, file: &str) -> Result<FileInfo> {
        let not_found = || IndexError::FileNotFound {
            space: space.to_string(),
            file: file.to_string(),
        };
        let state_arc = self
            .spaces
            .get(space)
            .map(|s| s.value().clone())
            .ok_or_else(not_found)?;
        let state = state_arc.lock().await;
        let file_cids = state.files.get(file).ok_or_else(not_found)?;
        let bytes_usage = file_cids
            .iter()
            .map(|cid| self.cid_meta.get(cid).map(|m| m.size).unwrap_or(0))
            .sum();
        Ok(FileInfo {
            bytes_usage,
            cid_count: file_cids.len() as u64,
        })
    }
}
