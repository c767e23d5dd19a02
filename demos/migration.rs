//! Demonstrates re-importing blocks via the migration file id: content lands
//! in the store and becomes globally known, but is not bound to any space or
//! counted against any quota until an ordinary `add`/`blocks_bind` claims it.
//!
//! Run with: `cargo run --example migration`

use filenode_block::{Block, MemoryBlobStore};
use filenode_core::{FileNode, MIGRATION_FILE_ID};
use filenode_index::{Availability, InProcessIndex};
use filenode_quota::StaticQuotaClient;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // A deliberately tiny quota: migrated content must not be charged
    // against it.
    let node = FileNode::builder()
        .store(Arc::new(MemoryBlobStore::new()))
        .index(Arc::new(InProcessIndex::new()))
        .quota(Arc::new(StaticQuotaClient::new(1)))
        .build()?;

    let identity = b"demo-identity";
    let archive = Block::from_data(&b"content carried over from an earlier node"[..]);
    node.migrate(std::slice::from_ref(&archive)).await?;
    println!("migrated block {} without binding it to any space", archive.cid);

    let availability = node.check("space-a", identity, &[archive.cid]).await?;
    assert_eq!(availability[&archive.cid], Availability::Exists);
    println!("block is globally known but not yet in space-a: {availability:?}");

    // Claim it into a space after the fact, without re-uploading bytes.
    node.blocks_bind("space-a", "recovered.txt", identity, &[archive.cid])
        .await?;

    let availability = node.check("space-a", identity, &[archive.cid]).await?;
    assert_eq!(availability[&archive.cid], Availability::ExistsInSpace);
    println!("after blocks_bind: {availability:?}");

    let info = node.file_info("space-a", "recovered.txt", identity).await?;
    println!("recovered.txt now accounts for {} cid(s)", info.cid_count);

    Ok(())
}
