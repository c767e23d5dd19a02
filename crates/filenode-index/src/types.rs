//! Query result types returned by the Index.

/// Aggregate info about a space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpaceInfo {
    pub cid_count: u64,
    pub file_count: u64,
}

/// Aggregate info about a single file within a space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileInfo {
    pub bytes_usage: u64,
    pub cid_count: u64,
}

/// Availability of a CID relative to a space, per §4.5.4 of the spec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    /// Unknown anywhere.
    NotExists,
    /// Known globally, but not bound in the queried space.
    Exists,
    /// Bound in the queried space (implies `Exists`).
    ExistsInSpace,
}
