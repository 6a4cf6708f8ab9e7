//! Store statistics, for logging/debugging only — not part of the external API.

use std::fmt;

/// A point-in-time snapshot of store bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Number of segment files currently on disk (sealed + active).
    pub num_segments: usize,
    /// Ordinal of the active segment.
    pub active_ordinal: u64,
    /// Sum of `total_size` across every record appended to the active
    /// segment since it was created.
    pub active_segment_bytes: u64,
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "segments={} active_ordinal={} active_bytes={}",
            self.num_segments, self.active_ordinal, self.active_segment_bytes
        )
    }
}
