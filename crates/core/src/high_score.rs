//! High-score codec
//!
//! The host stores the high score as an opaque blob: the value XORed with a
//! fixed key, serialized as JSON and prefixed with its length (u32, little
//! endian). The XOR only deters casual editing of the stored file.

use anyhow::{bail, Context, Result};

/// Obfuscation key
pub const CRYPT_KEY: u64 = 0x6db5_f3a1_9c2e_4b87;

const LEN_PREFIX: usize = 4;

/// Encode a high score into a blob
pub fn encode(high_score: u64) -> Vec<u8> {
    // A JSON number is its decimal form
    let payload = (high_score ^ CRYPT_KEY).to_string().into_bytes();
    let mut blob = Vec::with_capacity(LEN_PREFIX + payload.len());
    blob.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    blob.extend_from_slice(&payload);
    blob
}

/// Decode a blob produced by [`encode`]
pub fn decode(blob: &[u8]) -> Result<u64> {
    if blob.len() < LEN_PREFIX {
        bail!("high score blob too short ({} bytes)", blob.len());
    }
    let (prefix, payload) = blob.split_at(LEN_PREFIX);
    let mut len = [0u8; LEN_PREFIX];
    len.copy_from_slice(prefix);
    let len = u32::from_le_bytes(len) as usize;
    if payload.len() != len {
        bail!(
            "high score blob length mismatch (prefix {}, payload {})",
            len,
            payload.len()
        );
    }
    let crypted: u64 =
        serde_json::from_slice(payload).context("high score payload is not an integer")?;
    Ok(crypted ^ CRYPT_KEY)
}

/// Decode, falling back to 0 on any malformed input
pub fn decode_or_zero(blob: &[u8]) -> u64 {
    decode(blob).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_values() {
        for value in [0, 1, 100, 123_456, CRYPT_KEY, u64::MAX] {
            let blob = encode(value);
            assert_eq!(decode(&blob).unwrap(), value);
            assert_eq!(encode(decode(&blob).unwrap()), blob);
        }
    }

    #[test]
    fn test_blob_is_obfuscated() {
        let blob = encode(4242);
        let text = String::from_utf8_lossy(&blob[LEN_PREFIX..]).to_string();
        assert!(!text.contains("4242"));
        assert_eq!(blob[..LEN_PREFIX], ((blob.len() - LEN_PREFIX) as u32).to_le_bytes());
    }

    #[test]
    fn test_malformed_blobs() {
        assert!(decode(&[]).is_err());
        assert!(decode(&[1, 0]).is_err());
        assert!(decode(&[5, 0, 0, 0, b'1']).is_err());
        assert!(decode(&[3, 0, 0, 0, b'a', b'b', b'c']).is_err());
        assert!(decode(&[2, 0, 0, 0, b'-', b'1']).is_err());
        assert_eq!(decode_or_zero(b"garbage"), 0);
    }
}
