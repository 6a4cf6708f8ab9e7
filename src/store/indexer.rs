//! The Indexer task: the single thread that owns index mutation, lookup,
//! and the segment-list spine (spec.md §4.6).

use crate::store::compactor;
use crate::store::messages::IndexerMsg;
use crate::store::segment_list::SegmentList;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Spawns the Indexer thread and returns a handle to join it plus the
/// sender other tasks use to talk to it.
pub fn spawn(
    segments: SegmentList,
    dir: PathBuf,
    max_record_size: u64,
) -> (JoinHandle<()>, mpsc::Sender<IndexerMsg>) {
    let (tx, rx) = mpsc::channel::<IndexerMsg>();
    let self_tx = tx.clone();

    let handle = std::thread::Builder::new()
        .name("logkv-indexer".into())
        .spawn(move || run(segments, dir, max_record_size, rx, self_tx))
        .expect("failed to spawn indexer thread");

    (handle, tx)
}

fn run(
    mut segments: SegmentList,
    dir: PathBuf,
    max_record_size: u64,
    rx: mpsc::Receiver<IndexerMsg>,
    self_tx: mpsc::Sender<IndexerMsg>,
) {
    let mut compacting = false;

    while let Ok(msg) = rx.recv() {
        match msg {
            IndexerMsg::Mutate { key, offset } => {
                segments.mutate_active(key, offset);
            },

            IndexerMsg::Lookup { key, reply } => {
                let _ = reply.send(segments.find(&key));
            },

            IndexerMsg::RotateSegment { reply } => {
                let (ordinal, path) = segments.add_segment();
                tracing::info!(ordinal, ?path, "rotated to new active segment");
                let _ = reply.send((ordinal, path));

                if !compacting && segments.needs_compaction() {
                    compacting = true;
                    let prefix = segments.sealed_prefix();
                    let merged_ordinal = segments.reserve_ordinal();
                    let dir = dir.clone();
                    let reply_tx = self_tx.clone();
                    tracing::info!(
                        merged_ordinal,
                        segments = prefix.len(),
                        "spawning compactor"
                    );
                    std::thread::Builder::new()
                        .name("logkv-compactor".into())
                        .spawn(move || {
                            compactor::run(prefix, dir, merged_ordinal, max_record_size, reply_tx)
                        })
                        .expect("failed to spawn compactor thread");
                }
            },

            IndexerMsg::InstallCompacted {
                merged,
                replaced_ordinals,
                reply,
            } => {
                tracing::info!(
                    ordinal = merged.ordinal,
                    replaced = replaced_ordinals.len(),
                    "installing compacted segment"
                );
                segments.install_compacted(merged, &replaced_ordinals);
                compacting = false;
                let _ = reply.send(());
            },

            IndexerMsg::Shutdown => {
                tracing::info!("indexer shutting down");
                break;
            },
        }
    }
}
