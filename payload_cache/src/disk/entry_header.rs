use std::mem::size_of;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::PayloadCacheError;

const HASH_LEN: usize = blake3::OUT_LEN;

/// Header written in front of every cached payload:
/// `expires_at (u64 ms since epoch) | key_len (u32) | key | blake3(payload)`, integers little endian.
#[derive(Debug, PartialEq)]
pub struct EntryHeader {
    pub expires_at: SystemTime,
    pub key: String,
    pub hash: blake3::Hash,
}

impl EntryHeader {
    pub fn new(key: &str, expires_at: SystemTime, payload: &[u8]) -> Self {
        Self {
            expires_at,
            key: key.to_string(),
            hash: blake3::hash(payload),
        }
    }

    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.expires_at <= now
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) {
        let expires_ms = self
            .expires_at
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        buf.extend_from_slice(&expires_ms.to_le_bytes());
        buf.extend_from_slice(&(self.key.len() as u32).to_le_bytes());
        buf.extend_from_slice(self.key.as_bytes());
        buf.extend_from_slice(self.hash.as_bytes());
    }

    /// Parses the header at the start of `buf` and returns it with the remaining payload bytes.
    pub fn deserialize(buf: &[u8]) -> Result<(Self, &[u8]), PayloadCacheError> {
        let (expires_ms, rest) = split_u64(buf)?;
        let (key_len, rest) = split_u32(rest)?;
        let key_len = key_len as usize;
        if rest.len() < key_len + HASH_LEN {
            return Err(PayloadCacheError::corrupt("entry header truncated"));
        }
        let key = std::str::from_utf8(&rest[..key_len]).map_err(PayloadCacheError::corrupt)?;
        let hash_bytes: [u8; HASH_LEN] = rest[key_len..key_len + HASH_LEN]
            .try_into()
            .map_err(PayloadCacheError::corrupt)?;

        let header = EntryHeader {
            expires_at: UNIX_EPOCH + Duration::from_millis(expires_ms),
            key: key.to_string(),
            hash: blake3::Hash::from_bytes(hash_bytes),
        };
        Ok((header, &rest[key_len + HASH_LEN..]))
    }
}

fn split_u64(buf: &[u8]) -> Result<(u64, &[u8]), PayloadCacheError> {
    if buf.len() < size_of::<u64>() {
        return Err(PayloadCacheError::corrupt("entry header truncated"));
    }
    let (head, rest) = buf.split_at(size_of::<u64>());
    Ok((u64::from_le_bytes(head.try_into().map_err(PayloadCacheError::corrupt)?), rest))
}

fn split_u32(buf: &[u8]) -> Result<(u32, &[u8]), PayloadCacheError> {
    if buf.len() < size_of::<u32>() {
        return Err(PayloadCacheError::corrupt("entry header truncated"));
    }
    let (head, rest) = buf.split_at(size_of::<u32>());
    Ok((u32::from_le_bytes(head.try_into().map_err(PayloadCacheError::corrupt)?), rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let expires_at = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let header = EntryHeader::new("a/b.png?x=1", expires_at, b"payload");

        let mut buf = Vec::new();
        header.serialize(&mut buf);
        assert_eq!(buf.len(), 8 + 4 + "a/b.png?x=1".len() + HASH_LEN);
        buf.extend_from_slice(b"payload");

        let (parsed, payload) = EntryHeader::deserialize(&buf).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(payload, b"payload");
        assert_eq!(parsed.hash, blake3::hash(payload));
    }

    #[test]
    fn test_truncated_header() {
        let header = EntryHeader::new("key", SystemTime::now(), b"");
        let mut buf = Vec::new();
        header.serialize(&mut buf);

        for len in [0, 5, 11, buf.len() - 1] {
            assert!(matches!(EntryHeader::deserialize(&buf[..len]), Err(PayloadCacheError::Corrupt(_))));
        }
    }

    #[test]
    fn test_expiry() {
        let now = SystemTime::now();
        let header = EntryHeader::new("key", now, b"");
        assert!(header.is_expired(now));
        assert!(!header.is_expired(now - Duration::from_secs(1)));
    }
}
