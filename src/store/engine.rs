//! `Store`: the public facade wiring the Appender, Indexer, and (ephemeral)
//! Compactor tasks together behind the four operations spec.md §6 defines.

use crate::store::appender;
use crate::store::config::StoreConfig;
use crate::store::error::{Result, StoreError};
use crate::store::indexer;
use crate::store::messages::{AppenderMsg, IndexerMsg};
use crate::store::record;
use crate::store::segment::{self, Segment};
use crate::store::segment_list::SegmentList;
use crate::store::stats::StoreStats;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;

/// A handle to an open store. Cloning is not supported — `Store` is meant
/// to be shared the way the teacher's own `KVStore` was, behind an `Arc` if
/// a caller needs one from multiple threads; the Appender/Indexer tasks
/// themselves already serialize all real work, so `&self` is sufficient
/// for every method here.
pub struct Store {
    dir: PathBuf,
    max_record_size: u64,
    appender_tx: Option<mpsc::Sender<AppenderMsg>>,
    indexer_tx: mpsc::Sender<IndexerMsg>,
    appender_handle: Option<JoinHandle<()>>,
    indexer_handle: Option<JoinHandle<()>>,
}

impl Store {
    /// Opens (creating if necessary) the store rooted at `dir`.
    ///
    /// Recovery scans every segment file found in `dir`, not just the
    /// active one at the time of the last close — the teacher's own
    /// `KVStore::open` only ever replayed whatever ordinals it discovered
    /// and then started a brand-new empty active segment on top, and this
    /// keeps that behavior: every discovered segment becomes sealed, and a
    /// fresh empty segment is opened for writes.
    pub fn open<P: AsRef<Path>>(dir: P, config: StoreConfig) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let discovered = SegmentList::discover(&dir)?;
        let mut sealed = Vec::with_capacity(discovered.len());
        for (ordinal, path) in discovered {
            let mut index = std::collections::HashMap::new();
            segment::recover_into(&path, config.max_record_size, &mut index)?;
            sealed.push(Segment {
                ordinal,
                path,
                index,
            });
            tracing::info!(ordinal, "recovered segment");
        }

        let mut segments = SegmentList::new(dir.clone(), config.segment_size);
        segments.seed(sealed);
        let (active_ordinal, active_path) = segments.add_segment();
        tracing::info!(active_ordinal, ?active_path, "opened fresh active segment");

        let (indexer_handle, indexer_tx) =
            indexer::spawn(segments, dir.clone(), config.max_record_size);

        let (appender_handle, appender_tx) = appender::spawn(
            active_ordinal,
            active_path,
            0,
            config.segment_size,
            config.fsync_policy,
            indexer_tx.clone(),
        )?;

        Ok(Self {
            dir,
            max_record_size: config.max_record_size,
            appender_tx: Some(appender_tx),
            indexer_tx,
            appender_handle: Some(appender_handle),
            indexer_handle: Some(indexer_handle),
        })
    }

    /// Appends `(key, value)`, returning only once the record has hit the
    /// active segment's file (and, if [`crate::store::config::FsyncPolicy::Always`]
    /// is set, been fsynced). Empty keys are rejected; empty values are not.
    /// A value whose encoded record would exceed `max_record_size` is
    /// rejected here, before it is ever written — otherwise it would be
    /// accepted silently and only surface as a misleading `CorruptedEntry`
    /// the next time anyone reads it back.
    pub fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidArgument("key must not be empty".into()));
        }

        let encoded_len = record::encoded_len(key.as_bytes(), value);
        if encoded_len > self.max_record_size {
            return Err(StoreError::InvalidArgument(format!(
                "encoded record of {} bytes exceeds the {}-byte ceiling",
                encoded_len, self.max_record_size
            )));
        }

        let (reply_tx, reply_rx) = mpsc::channel();
        self.appender_tx
            .as_ref()
            .ok_or_else(|| StoreError::Io(std::io::Error::other("store is closed")))?
            .send(AppenderMsg::Put {
                key: key.to_string(),
                value: value.to_vec(),
                reply: reply_tx,
            })
            .map_err(|_| StoreError::Io(std::io::Error::other("appender task is gone")))?;

        reply_rx
            .recv()
            .map_err(|_| StoreError::Io(std::io::Error::other("appender task is gone")))?
    }

    /// Looks up the most recent value written for `key`.
    ///
    /// A `Put` whose reply the caller has already observed is guaranteed
    /// visible here: the Appender enqueues its `Mutate` into the Indexer's
    /// inbox strictly before replying to `put`, and this method's `Lookup`
    /// cannot reach that same inbox until after `put` returns, so it is
    /// always ordered behind the Mutate (spec.md §4.6).
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(StoreError::InvalidArgument("key must not be empty".into()));
        }

        let (reply_tx, reply_rx) = mpsc::channel();
        self.indexer_tx
            .send(IndexerMsg::Lookup {
                key: key.to_string(),
                reply: reply_tx,
            })
            .map_err(|_| StoreError::Io(std::io::Error::other("indexer task is gone")))?;

        let found = reply_rx
            .recv()
            .map_err(|_| StoreError::Io(std::io::Error::other("indexer task is gone")))?;

        match found {
            Some((path, offset)) => segment::read_at(&path, offset, self.max_record_size),
            None => Err(StoreError::NotFound),
        }
    }

    /// A point-in-time snapshot of bookkeeping, for logging/diagnostics.
    pub fn stats(&self) -> Result<StoreStats> {
        let num_segments = fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(segment::parse_ordinal)
                    .flatten()
                    .is_some()
            })
            .count();

        // The active segment's own size isn't tracked centrally; approximate
        // it from the file on disk rather than threading a query through the
        // Appender for a diagnostics-only number.
        let highest = fs::read_dir(&self.dir)?
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                let ordinal = segment::parse_ordinal(&name)?;
                Some((ordinal, e.path()))
            })
            .max_by_key(|(ordinal, _)| *ordinal);

        let (active_ordinal, active_segment_bytes) = match &highest {
            Some((ordinal, path)) => (*ordinal, fs::metadata(path).map(|m| m.len()).unwrap_or(0)),
            None => (0, 0),
        };

        Ok(StoreStats {
            num_segments,
            active_ordinal,
            active_segment_bytes,
        })
    }

    /// Shuts the store down: drains and joins the Appender, then tells the
    /// Indexer to stop and joins it too. Any Compactor merge still running
    /// in the background is not waited on — it simply finds the Indexer's
    /// channel closed, logs a warning, and abandons its merge (the sealed
    /// segments it was working from are left untouched on disk, so no data
    /// is lost, only the compaction opportunity).
    pub fn close(mut self) -> Result<()> {
        // Dropping our sender is what lets the Appender's `recv()` loop end:
        // it holds no sender back to its own inbox, unlike the Indexer.
        drop(self.appender_tx.take());
        if let Some(handle) = self.appender_handle.take() {
            let _ = handle.join();
        }

        let _ = self.indexer_tx.send(IndexerMsg::Shutdown);
        if let Some(handle) = self.indexer_handle.take() {
            let _ = handle.join();
        }

        Ok(())
    }
}
