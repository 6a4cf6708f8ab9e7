//! A segment: one append-only file plus its in-memory key→offset index.

use crate::store::error::Result;
use crate::store::record;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Filename prefix for every segment file, matching the on-disk layout in
/// spec.md §6: `current-data{N}`.
pub const FILE_PREFIX: &str = "current-data";

/// One segment: an append-only file plus the index of the most recent
/// offset for every key written into it. Holds no open file descriptor —
/// `read` opens the backing file fresh on every call, so readers never
/// contend with the Appender's write handle or with each other.
#[derive(Debug, Clone)]
pub struct Segment {
    pub ordinal: u64,
    pub path: PathBuf,
    pub index: HashMap<String, u64>,
}

impl Segment {
    /// Creates the bookkeeping for a fresh, empty segment at `ordinal`
    /// under `dir`. Does not touch the filesystem; callers create the file.
    pub fn new(dir: &Path, ordinal: u64) -> Self {
        Self {
            ordinal,
            path: segment_path(dir, ordinal),
            index: HashMap::new(),
        }
    }

    /// Reads the value stored at `position` in this segment, verifying the
    /// record's size header and checksum.
    pub fn read(&self, position: u64, max_record_size: u64) -> Result<Vec<u8>> {
        read_at(&self.path, position, max_record_size)
    }
}

/// Opens `path` fresh, seeks to `position`, and reads one record's value.
/// Shared by [`Segment::read`] and by `Store::get`, which only gets a bare
/// path/offset pair back from a Lookup reply rather than a whole `Segment`.
pub fn read_at(path: &Path, position: u64, max_record_size: u64) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(
        max_record_size.min(64 * 1024).max(4096) as usize,
        file,
    );
    reader.seek(SeekFrom::Start(position))?;
    record::read_value(&mut reader, max_record_size)
}

/// Builds the path for segment `ordinal` under `dir`.
pub fn segment_path(dir: &Path, ordinal: u64) -> PathBuf {
    dir.join(format!("{}{}", FILE_PREFIX, ordinal))
}

/// Parses a file name back into its segment ordinal, if it matches the
/// `current-data{N}` convention.
pub fn parse_ordinal(file_name: &str) -> Option<u64> {
    file_name
        .strip_prefix(FILE_PREFIX)
        .and_then(|rest| rest.parse::<u64>().ok())
}

/// Replays every record in the segment file at `path`, in file order,
/// installing the offset of each key's most recent occurrence into
/// `index`. Stops cleanly at the first short read or corrupted record —
/// a partially-written tail from a crash mid-append, per spec.md §4.8 —
/// rather than failing `Open`.
pub fn recover_into(
    path: &Path,
    max_record_size: u64,
    index: &mut HashMap<String, u64>,
) -> Result<()> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut offset: u64 = 0;

    loop {
        let record_start = offset;
        match record::read_record(&mut reader, max_record_size) {
            Ok(decoded) => {
                let key = String::from_utf8_lossy(&decoded.key).into_owned();
                index.insert(key, record_start);
                offset = record_start + decoded.total_size;
            },
            // End of log (clean or truncated) or a corrupted tail record:
            // either way, recovery stops here and keeps what it already has.
            Err(_) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("logkv-segment-test-{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn recovers_every_record_in_order() {
        let dir = temp_dir("recover");
        let path = segment_path(&dir, 0);
        let mut file = File::create(&path).unwrap();
        file.write_all(&record::encode(b"a", b"1")).unwrap();
        file.write_all(&record::encode(b"b", b"2")).unwrap();
        file.write_all(&record::encode(b"a", b"3")).unwrap();
        drop(file);

        let mut index = HashMap::new();
        recover_into(&path, 16 * 1024 * 1024, &mut index).unwrap();

        assert_eq!(index.len(), 2);
        let seg = Segment {
            ordinal: 0,
            path: path.clone(),
            index: index.clone(),
        };
        assert_eq!(seg.read(index["a"], 16 * 1024 * 1024).unwrap(), b"3");
        assert_eq!(seg.read(index["b"], 16 * 1024 * 1024).unwrap(), b"2");
    }

    #[test]
    fn recovery_truncates_at_partial_tail_record() {
        let dir = temp_dir("truncate");
        let path = segment_path(&dir, 0);
        let mut file = File::create(&path).unwrap();
        file.write_all(&record::encode(b"a", b"1")).unwrap();
        let mut partial = record::encode(b"b", b"2");
        partial.truncate(partial.len() - 3);
        file.write_all(&partial).unwrap();
        drop(file);

        let mut index = HashMap::new();
        recover_into(&path, 16 * 1024 * 1024, &mut index).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.contains_key("a"));
    }

    #[test]
    fn parses_and_builds_ordinals() {
        let dir = temp_dir("ordinal");
        let path = segment_path(&dir, 7);
        assert_eq!(
            parse_ordinal(path.file_name().unwrap().to_str().unwrap()),
            Some(7)
        );
        assert_eq!(parse_ordinal("not-a-segment"), None);
    }
}
