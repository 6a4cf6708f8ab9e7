//! Store configuration.

/// Policy for how fsync is handled after a write. The store never performs
/// an fsync per write by default — durability is bounded by the OS page
/// cache (spec: "OS-cache level") — but callers that need crash-durability
/// can opt into `Always`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FsyncPolicy {
    /// Fsync the active segment's file after every append.
    Always,
    /// Never fsync explicitly; rely on the OS write-back cache.
    #[default]
    Never,
}

/// Tunables for a [`crate::store::engine::Store`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Soft upper bound, in bytes, on one segment file. Records are never
    /// split across segments, so a segment may exceed this by at most the
    /// size of its last record.
    pub segment_size: u64,
    /// Records whose declared `total_size` exceeds this are rejected as
    /// corruption rather than parsed further.
    pub max_record_size: u64,
    /// Durability policy for appends to the active segment.
    pub fsync_policy: FsyncPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            segment_size: 4 * 1024 * 1024,
            max_record_size: 16 * 1024 * 1024,
            fsync_policy: FsyncPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// A config tuned for small, fast-rotating segments in tests.
    pub fn test_config() -> Self {
        Self {
            segment_size: 150,
            max_record_size: 16 * 1024 * 1024,
            fsync_policy: FsyncPolicy::Never,
        }
    }

    /// Builder-style override of the segment size bound.
    pub fn with_segment_size(mut self, segment_size: u64) -> Self {
        self.segment_size = segment_size;
        self
    }

    /// Builder-style override of the fsync policy.
    pub fn with_fsync_policy(mut self, fsync_policy: FsyncPolicy) -> Self {
        self.fsync_policy = fsync_policy;
        self
    }
}
