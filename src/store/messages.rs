//! The tagged message types carried over the Appender's and Indexer's
//! inboxes (Design Notes §9: "duck-typed channel payloads" become a typed
//! variant instead of a dynamically typed queue entry).

use crate::store::error::Result;
use crate::store::segment::Segment;
use std::path::PathBuf;
use std::sync::mpsc;

/// A request the Appender task accepts.
pub enum AppenderMsg {
    /// Append `(key, value)` to the active segment, rotating first if
    /// needed. The reply fires only after the disk write itself succeeds
    /// or fails — never after the index update.
    Put {
        key: String,
        value: Vec<u8>,
        reply: mpsc::Sender<Result<()>>,
    },
}

/// A request the Indexer task accepts. The Indexer is the sole owner of
/// index mutation, lookup, the segment-list spine, and (by extension) of
/// ordinal/rotation bookkeeping — the Appender only ever holds the active
/// segment's write handle.
pub enum IndexerMsg {
    /// Install `offset` for `key` into the currently active segment's
    /// index.
    Mutate { key: String, offset: u64 },

    /// Find the most recent offset for `key`, scanning in reverse
    /// creation order.
    Lookup {
        key: String,
        reply: mpsc::Sender<Option<(PathBuf, u64)>>,
    },

    /// Requested by the Appender when the active segment would exceed
    /// `segment_size`. The Indexer creates the bookkeeping for a new
    /// segment, appends it to the list, and — if the list has now reached
    /// 3 segments — spawns a Compactor for the sealed prefix. Replies with
    /// the new active segment's ordinal and path.
    RotateSegment { reply: mpsc::Sender<(u64, PathBuf)> },

    /// Sent by a Compactor task when it has finished merging a sealed
    /// prefix. `replaced_ordinals` names exactly the segments the merge
    /// consumed (spec.md §4.6's "replaced_range"), so the Indexer splices
    /// out only those — not "whatever is currently sealed" — since
    /// rotations keep appending to the list while a merge is in flight.
    /// No lookup ever observes a half-installed merge, because the splice
    /// is one atomic `Vec` mutation; the reply lets the Compactor unlink
    /// the old files only once the swap has landed.
    InstallCompacted {
        merged: Segment,
        replaced_ordinals: Vec<u64>,
        reply: mpsc::Sender<()>,
    },

    /// Tells the Indexer to stop its loop and return. Needed because the
    /// Indexer holds an internal sender to itself (to hand clones to
    /// Compactor tasks), so dropping the external sender alone would never
    /// make its channel empty.
    Shutdown,
}
