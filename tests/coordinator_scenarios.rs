//! Workspace-level integration tests: exercise `FileNode` assembled from the
//! published in-memory backends, the way a real deployment wires the crates
//! together rather than reaching into `filenode-core`'s own unit tests.

use filenode_block::{Block, MemoryBlobStore};
use filenode_core::FileNode;
use filenode_index::InProcessIndex;
use filenode_quota::StaticQuotaClient;
use std::sync::Arc;

fn node(limit: u64) -> FileNode {
    FileNode::builder()
        .store(Arc::new(MemoryBlobStore::new()))
        .index(Arc::new(InProcessIndex::new()))
        .quota(Arc::new(StaticQuotaClient::new(limit)))
        .build()
        .unwrap()
}

#[tokio::test]
async fn concurrent_adds_sharing_a_cid_converge_on_one_upload_and_two_bindings() {
    let node = Arc::new(node(1_000_000));
    let block = Block::from_data(&b"raced by two concurrent writers"[..]);

    let a = {
        let node = node.clone();
        let block = block.clone();
        tokio::spawn(async move {
            node.add("space-a", "f1", b"alice", std::slice::from_ref(&block))
                .await
        })
    };
    let b = {
        let node = node.clone();
        let block = block.clone();
        tokio::spawn(async move {
            node.add("space-a", "f2", b"alice", std::slice::from_ref(&block))
                .await
        })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let info = node.space_info("space-a", b"alice").await.unwrap();
    assert_eq!(info.cid_count, 1, "the shared cid is only uploaded once");
    assert_eq!(info.file_count, 2, "both files still record their own binding");

    let fetched = node.get(&block.cid).await.unwrap();
    assert_eq!(fetched.data, block.data);
}

#[tokio::test]
async fn disjoint_spaces_do_not_serialize_behind_each_others_locks() {
    let node = Arc::new(node(1_000_000));

    let block_a = Block::from_data(&b"space a content"[..]);
    let block_b = Block::from_data(&b"space b content"[..]);

    let a = {
        let node = node.clone();
        let block_a = block_a.clone();
        tokio::spawn(async move {
            node.add("space-a", "f1", b"alice", std::slice::from_ref(&block_a))
                .await
        })
    };
    let b = {
        let node = node.clone();
        let block_b = block_b.clone();
        tokio::spawn(async move {
            node.add("space-b", "f1", b"bob", std::slice::from_ref(&block_b))
                .await
        })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    assert_eq!(
        node.space_info("space-a", b"alice").await.unwrap().cid_count,
        1
    );
    assert_eq!(
        node.space_info("space-b", b"bob").await.unwrap().cid_count,
        1
    );
}

#[tokio::test]
async fn migrate_then_bind_then_delete_round_trips_availability() {
    let node = node(1_000_000);
    let block = Block::from_data(&b"recovered from an earlier node"[..]);

    node.migrate(std::slice::from_ref(&block)).await.unwrap();
    node.blocks_bind("space-a", "recovered", b"alice", &[block.cid])
        .await
        .unwrap();

    let availability = node.check("space-a", b"alice", &[block.cid]).await.unwrap();
    assert_eq!(
        availability[&block.cid],
        filenode_index::Availability::ExistsInSpace
    );

    node.files_delete("space-a", b"alice", &["recovered".to_string()])
        .await
        .unwrap();

    let availability = node.check("space-a", b"alice", &[block.cid]).await.unwrap();
    assert_eq!(availability[&block.cid], filenode_index::Availability::Exists);

    // The bytes outlive the binding — migration never ties a CID's
    // lifetime to any one file.
    assert!(node.get(&block.cid).await.is_ok());
}
