//! The Appender task: the single thread that owns the active segment's
//! write handle and serializes every `Put` through it (spec.md §4.5).

use crate::store::config::FsyncPolicy;
use crate::store::error::{Result, StoreError};
use crate::store::messages::{AppenderMsg, IndexerMsg};
use crate::store::record;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// Spawns the Appender thread. `active_path` must already exist (created
/// during recovery) and `active_size` is its current length in bytes, so
/// the very first rotation decision is correct even if the segment was
/// non-empty when the store was opened.
pub fn spawn(
    active_ordinal: u64,
    active_path: PathBuf,
    active_size: u64,
    segment_size: u64,
    fsync_policy: FsyncPolicy,
    indexer_tx: mpsc::Sender<IndexerMsg>,
) -> std::io::Result<(JoinHandle<()>, mpsc::Sender<AppenderMsg>)> {
    let file = OpenOptions::new().create(true).append(true).open(&active_path)?;
    let writer = BufWriter::new(file);

    let (tx, rx) = mpsc::channel::<AppenderMsg>();
    let handle = std::thread::Builder::new()
        .name("logkv-appender".into())
        .spawn(move || {
            run(
                writer,
                active_ordinal,
                active_size,
                segment_size,
                fsync_policy,
                indexer_tx,
                rx,
            )
        })
        .expect("failed to spawn appender thread");

    Ok((handle, tx))
}

fn run(
    mut writer: BufWriter<File>,
    mut active_ordinal: u64,
    mut active_size: u64,
    segment_size: u64,
    fsync_policy: FsyncPolicy,
    indexer_tx: mpsc::Sender<IndexerMsg>,
    rx: mpsc::Receiver<AppenderMsg>,
) {
    while let Ok(msg) = rx.recv() {
        match msg {
            AppenderMsg::Put { key, value, reply } => {
                let result = handle_put(
                    &mut writer,
                    &mut active_ordinal,
                    &mut active_size,
                    segment_size,
                    fsync_policy,
                    &indexer_tx,
                    &key,
                    &value,
                );
                let _ = reply.send(result);
            },
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_put(
    writer: &mut BufWriter<File>,
    active_ordinal: &mut u64,
    active_size: &mut u64,
    segment_size: u64,
    fsync_policy: FsyncPolicy,
    indexer_tx: &mpsc::Sender<IndexerMsg>,
    key: &str,
    value: &[u8],
) -> Result<()> {
    let encoded = record::encode(key.as_bytes(), value);

    if *active_size + encoded.len() as u64 > segment_size {
        rotate(writer, active_ordinal, active_size, indexer_tx)?;
    }

    let offset = *active_size;
    tracing::trace!(ordinal = *active_ordinal, offset, len = encoded.len(), "appending record");
    writer.write_all(&encoded)?;
    writer.flush()?;
    if fsync_policy == FsyncPolicy::Always {
        writer.get_ref().sync_data()?;
    }
    *active_size += encoded.len() as u64;

    // The Mutate message enters the Indexer's queue before this reply is
    // sent, which (per spec.md §4.6) guarantees a Get issued after the
    // caller observes this ack sees the new offset: the caller cannot send
    // its Lookup until after receiving this reply, and that happens-after
    // relationship orders its Lookup behind this Mutate in the Indexer's
    // single queue.
    let _ = indexer_tx.send(IndexerMsg::Mutate {
        key: key.to_string(),
        offset,
    });

    Ok(())
}

fn rotate(
    writer: &mut BufWriter<File>,
    active_ordinal: &mut u64,
    active_size: &mut u64,
    indexer_tx: &mpsc::Sender<IndexerMsg>,
) -> Result<()> {
    let (reply_tx, reply_rx) = mpsc::channel();
    indexer_tx
        .send(IndexerMsg::RotateSegment { reply: reply_tx })
        .map_err(|_| StoreError::Io(std::io::Error::other("indexer task is gone")))?;
    let (new_ordinal, new_path) = reply_rx
        .recv()
        .map_err(|_| StoreError::Io(std::io::Error::other("indexer task is gone")))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&new_path)?;
    *writer = BufWriter::new(file);
    *active_ordinal = new_ordinal;
    *active_size = 0;

    Ok(())
}
