//! Wires a `FileNode` from purely in-memory backends and walks through the
//! basic add/check/bind/delete lifecycle for a single space.
//!
//! Run with: `cargo run --example basic_bind`

use filenode_block::{Block, MemoryBlobStore};
use filenode_core::FileNode;
use filenode_index::InProcessIndex;
use filenode_quota::StaticQuotaClient;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let node = FileNode::builder()
        .store(Arc::new(MemoryBlobStore::new()))
        .index(Arc::new(InProcessIndex::new()))
        .quota(Arc::new(StaticQuotaClient::new(1024 * 1024)))
        .build()?;

    let identity = b"demo-identity";
    let space = "space-a";
    let file = "report.pdf";

    let payload: &[u8] = b"the quarterly report, in full";
    let block = Block::from_data(payload);
    let cid = block.cid;

    node.add(space, file, identity, std::slice::from_ref(&block))
        .await?;
    println!("added block {cid}");

    let fetched = node.get(&cid).await?;
    assert_eq!(fetched.data.as_ref(), payload);
    println!("fetched {} bytes back", fetched.data.len());

    let availability = node.check(space, identity, &[cid]).await?;
    println!("availability: {availability:?}");

    let info = node.space_info(space, identity).await?;
    println!("space {space} now holds {} cid(s) across {} file(s)", info.cid_count, info.file_count);

    node.files_delete(space, identity, &[file.to_string()])
        .await?;
    println!("deleted file {file}; block itself is still retrievable by cid");

    let fetched_after_delete = node.get(&cid).await?;
    assert_eq!(fetched_after_delete.data.as_ref(), payload);

    Ok(())
}
