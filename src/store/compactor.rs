//! The Compactor: a one-shot task that merges a sealed prefix of segments
//! into one, keeping only the latest value per key (spec.md §4.7).

use crate::store::messages::IndexerMsg;
use crate::store::record;
use crate::store::segment::Segment;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;

/// Runs one merge pass over `prefix` (oldest first) and, on success,
/// installs the result through `reply_tx`. Any failure aborts the merge:
/// it is logged and the segment list is left untouched (P3).
pub fn run(
    prefix: Vec<Segment>,
    dir: PathBuf,
    merged_ordinal: u64,
    max_record_size: u64,
    reply_tx: mpsc::Sender<IndexerMsg>,
) {
    if prefix.is_empty() {
        return;
    }

    let replaced_ordinals: Vec<u64> = prefix.iter().map(|s| s.ordinal).collect();

    match merge(&prefix, &dir, merged_ordinal, max_record_size) {
        Ok(merged) => {
            let (ack_tx, ack_rx) = mpsc::channel();
            if reply_tx
                .send(IndexerMsg::InstallCompacted {
                    merged,
                    replaced_ordinals,
                    reply: ack_tx,
                })
                .is_err()
            {
                tracing::warn!("indexer gone, abandoning compaction");
                return;
            }

            // Only unlink the old segment files once the Indexer has
            // atomically swapped them out — a crash before this point
            // must leave every sealed file intact (P3).
            if ack_rx.recv().is_ok() {
                for segment in &prefix {
                    if let Err(e) = std::fs::remove_file(&segment.path) {
                        tracing::warn!(path = ?segment.path, error = %e, "failed to remove compacted segment");
                    }
                }
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "compaction aborted");
        },
    }
}

/// Merges `prefix` into a single new segment file, keeping only the
/// latest occurrence of each key across the prefix (P1). A key whose
/// latest write already lives past the prefix (in the active segment)
/// still gets an entry here — harmless, since lookup resolution always
/// prefers the active segment (P2) — it is simply never reached.
fn merge(
    prefix: &[Segment],
    dir: &std::path::Path,
    merged_ordinal: u64,
    max_record_size: u64,
) -> std::io::Result<Segment> {
    let mut merged = Segment::new(dir, merged_ordinal);
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&merged.path)?;
    let mut write_offset: u64 = 0;

    for (i, segment) in prefix.iter().enumerate() {
        for (key, &offset) in &segment.index {
            let shadowed_later = prefix[i + 1..]
                .iter()
                .any(|later| later.index.contains_key(key));
            if shadowed_later {
                continue;
            }

            let value = segment
                .read(offset, max_record_size)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            let encoded = record::encode(key.as_bytes(), &value);
            file.write_all(&encoded)?;
            merged.index.insert(key.clone(), write_offset);
            write_offset += encoded.len() as u64;
        }
    }

    file.flush()?;
    Ok(merged)
}
