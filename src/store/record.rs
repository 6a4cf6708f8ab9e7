//! The on-disk record codec.
//!
//! A record is `[u32 total_size LE][u32 key_len LE][u32 value_len LE][key]
//! [value][20-byte SHA-1]`, where `total_size = 12 + key_len + value_len +
//! 20`. The checksum covers every byte up to (but not including) itself.

use crate::store::error::{Result, StoreError};
use sha1::{Digest, Sha1};
use std::io::Read;

/// Bytes before the key: three u32 LE length/size fields.
const HEADER_LEN: usize = 12;
/// Trailing SHA-1 digest.
const CHECKSUM_LEN: usize = 20;

/// Returns the on-disk length of the record that would encode `key`/`value`.
pub fn encoded_len(key: &[u8], value: &[u8]) -> u64 {
    HEADER_LEN as u64 + key.len() as u64 + value.len() as u64 + CHECKSUM_LEN as u64
}

/// Encodes a `(key, value)` pair into one self-delimiting, checksummed
/// record. The codec is byte-transparent; key-emptiness and size-ceiling
/// checks happen at the `Store` API boundary, not here.
pub fn encode(key: &[u8], value: &[u8]) -> Vec<u8> {
    let total_size = encoded_len(key, value) as usize;
    let mut buf = Vec::with_capacity(total_size);

    buf.extend_from_slice(&(total_size as u32).to_le_bytes());
    buf.extend_from_slice(&(key.len() as u32).to_le_bytes());
    buf.extend_from_slice(&(value.len() as u32).to_le_bytes());
    buf.extend_from_slice(key);
    buf.extend_from_slice(value);

    let checksum = Sha1::digest(&buf);
    buf.extend_from_slice(&checksum);

    buf
}

/// A decoded record: the on-disk size it occupied, its key, and its value.
pub struct Decoded {
    pub total_size: u64,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

/// Reads one full record from `reader`, verifying the size header and
/// checksum along the way.
///
/// An EOF before any byte of the header has been read is reported as
/// [`StoreError::ShortRead`] — the caller decides whether that means
/// "end of log" (recovery) or "corrupted file" (a random-access `Get`).
/// A size-header mismatch or checksum mismatch is always
/// [`StoreError::CorruptedEntry`], never `ShortRead`.
pub fn read_record<R: Read>(reader: &mut R, max_record_size: u64) -> Result<Decoded> {
    let mut header = [0u8; HEADER_LEN];
    reader
        .read_exact(&mut header)
        .map_err(|_| StoreError::ShortRead)?;

    let total_size = u32::from_le_bytes(header[0..4].try_into().unwrap()) as u64;
    let key_len = u32::from_le_bytes(header[4..8].try_into().unwrap()) as u64;
    let value_len = u32::from_le_bytes(header[8..12].try_into().unwrap()) as u64;

    let expected_total = HEADER_LEN as u64 + key_len + value_len + CHECKSUM_LEN as u64;
    if total_size != expected_total {
        return Err(StoreError::CorruptedEntry(format!(
            "total_size header {} does not match key_len {} + value_len {} (expected {})",
            total_size, key_len, value_len, expected_total
        )));
    }
    if total_size > max_record_size {
        return Err(StoreError::CorruptedEntry(format!(
            "record of {} bytes exceeds the {}-byte ceiling",
            total_size, max_record_size
        )));
    }

    let mut key = vec![0u8; key_len as usize];
    reader
        .read_exact(&mut key)
        .map_err(|_| StoreError::ShortRead)?;

    let mut value = vec![0u8; value_len as usize];
    reader
        .read_exact(&mut value)
        .map_err(|_| StoreError::ShortRead)?;

    let mut checksum = [0u8; CHECKSUM_LEN];
    reader
        .read_exact(&mut checksum)
        .map_err(|_| StoreError::ShortRead)?;

    let mut hasher = Sha1::new();
    hasher.update(&header);
    hasher.update(&key);
    hasher.update(&value);
    let computed = hasher.finalize();

    if computed.as_slice() != checksum {
        return Err(StoreError::CorruptedEntry("checksum mismatch".to_string()));
    }

    Ok(Decoded {
        total_size,
        key,
        value,
    })
}

/// Reads one record from `reader` and returns only its value. See
/// [`read_record`] for the error-classification rules.
pub fn read_value<R: Read>(reader: &mut R, max_record_size: u64) -> Result<Vec<u8>> {
    read_record(reader, max_record_size).map(|d| d.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_record() {
        let encoded = encode(b"hello", b"world");
        let mut cursor = std::io::Cursor::new(encoded);
        let value = read_value(&mut cursor, 16 * 1024 * 1024).unwrap();
        assert_eq!(value, b"world");
    }

    #[test]
    fn empty_value_is_legal() {
        let encoded = encode(b"hello", b"");
        assert_eq!(encoded.len(), 12 + 5 + 0 + 20);
        let mut cursor = std::io::Cursor::new(encoded);
        let value = read_value(&mut cursor, 16 * 1024 * 1024).unwrap();
        assert_eq!(value, b"");
    }

    #[test]
    fn rejects_flipped_byte() {
        let mut encoded = encode(b"key", b"value");
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;
        let mut cursor = std::io::Cursor::new(encoded);
        let err = read_value(&mut cursor, 16 * 1024 * 1024).unwrap_err();
        assert!(matches!(err, StoreError::CorruptedEntry(_)));
    }

    #[test]
    fn rejects_oversized_record() {
        let encoded = encode(b"key", b"value");
        let mut cursor = std::io::Cursor::new(encoded);
        let err = read_value(&mut cursor, 10).unwrap_err();
        assert!(matches!(err, StoreError::CorruptedEntry(_)));
    }

    #[test]
    fn short_read_at_eof() {
        let mut cursor = std::io::Cursor::new(Vec::<u8>::new());
        let err = read_value(&mut cursor, 16 * 1024 * 1024).unwrap_err();
        assert!(matches!(err, StoreError::ShortRead));
    }
}
