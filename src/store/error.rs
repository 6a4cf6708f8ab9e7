//! Error types for the store.

use std::io;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key was not found in any segment's index.
    #[error("key not found")]
    NotFound,

    /// A record failed its size-header or checksum check.
    #[error("corrupted entry: {0}")]
    CorruptedEntry(String),

    /// EOF encountered mid-record. Only ever surfaces internally during
    /// recovery, where it terminates the scan rather than propagating.
    #[error("short read mid-record")]
    ShortRead,

    /// An underlying filesystem error.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A caller-supplied key or value violated the API contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Background compaction could not complete. Never returned from
    /// `Put`/`Get`; logged and the merge is abandoned instead.
    #[error("compaction failed: {0}")]
    CompactionFailed(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
