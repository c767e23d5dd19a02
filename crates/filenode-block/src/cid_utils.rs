//! CID (Content Identifier) utilities
//!
//! Creates content-addressed identifiers using BLAKE3, wrapped in a CIDv1/raw
//! multihash so they stay interoperable with other content-addressed systems.

use cid::{Cid, Version};
use multihash_codetable::{Code, MultihashDigest};

/// Multicodec code for raw binary data
const RAW_CODEC: u64 = 0x55;

/// Create a CID from data using a BLAKE3-backed multihash
pub fn create_cid(data: &[u8]) -> Cid {
    let hash = blake3::hash(data);
    let multihash = Code::Blake3_256.digest(hash.as_bytes());
    Cid::new(Version::V1, RAW_CODEC, multihash).expect("valid CID construction")
}

/// Verify that data matches a claimed CID
pub fn verify_cid(data: &[u8], cid: &Cid) -> bool {
    create_cid(data) == *cid
}

/// Parse a CID from its string representation
pub fn parse_cid(s: &str) -> Result<Cid, crate::BlobStoreError> {
    s.parse()
        .map_err(|e: cid::Error| crate::BlobStoreError::InvalidCid(e.to_string()))
}
