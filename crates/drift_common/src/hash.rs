//! Content hashing for change detection.
//!
//! A [`ContentHash`] is the identity of a byte sequence: two files with the
//! same hash are assumed to have identical content, regardless of path or
//! timestamp. Digests are 4 to 255 bytes long; digests of up to 16 bytes
//! (the common case, XXH3-128) are stored inline without allocation.

use std::cmp::Ordering;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minimum digest length in bytes.
const MIN_LEN: usize = 4;

/// Maximum digest length in bytes (must fit a one-byte length prefix).
const MAX_LEN: usize = 255;

/// Digest length at or below which bytes are stored inline.
const INLINE_LEN: usize = 16;

/// An immutable content digest, 4 to 255 bytes long.
///
/// Equality, ordering, and hashing are all defined over the raw digest
/// bytes. The canonical string form is lowercase hex, round-trippable via
/// [`ContentHash::from_hex`] and [`ContentHash::to_hex`].
#[derive(Clone)]
pub struct ContentHash(Repr);

/// Storage for the digest bytes. Callers never observe the distinction;
/// the variant is chosen by length alone, so equal digests always share
/// a variant.
#[derive(Clone)]
enum Repr {
    Inline { len: u8, bytes: [u8; INLINE_LEN] },
    Heap(Box<[u8]>),
}

/// Errors from constructing a [`ContentHash`] out of raw bytes or hex text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// The digest length (bytes or hex characters) is outside the
    /// permitted bound, or the hex string has odd length.
    #[error("invalid hash code length: {0}")]
    InvalidLength(usize),

    /// A character in the hex string is not a hexadecimal digit.
    #[error("illegal hexadecimal character: '{0}'")]
    InvalidCharacter(char),
}

impl ContentHash {
    /// Creates a hash from raw digest bytes.
    ///
    /// Fails with [`HashError::InvalidLength`] if the slice is shorter
    /// than 4 or longer than 255 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() < MIN_LEN || bytes.len() > MAX_LEN {
            return Err(HashError::InvalidLength(bytes.len()));
        }
        if bytes.len() <= INLINE_LEN {
            let mut inline = [0u8; INLINE_LEN];
            inline[..bytes.len()].copy_from_slice(bytes);
            Ok(Self(Repr::Inline {
                len: bytes.len() as u8,
                bytes: inline,
            }))
        } else {
            Ok(Self(Repr::Heap(bytes.into())))
        }
    }

    /// Creates a 4-byte hash from an integer, encoded big-endian.
    pub fn from_u32(value: u32) -> Self {
        let mut inline = [0u8; INLINE_LEN];
        inline[..4].copy_from_slice(&value.to_be_bytes());
        Self(Repr::Inline {
            len: 4,
            bytes: inline,
        })
    }

    /// Computes the XXH3-128 digest of arbitrary content bytes.
    ///
    /// This is the standard construction for file contents during graph
    /// building. The resulting digest is always 16 bytes.
    pub fn of_content(data: &[u8]) -> Self {
        let digest = xxhash_rust::xxh3::xxh3_128(data);
        let mut inline = [0u8; INLINE_LEN];
        inline.copy_from_slice(&digest.to_le_bytes());
        Self(Repr::Inline {
            len: INLINE_LEN as u8,
            bytes: inline,
        })
    }

    /// Parses the canonical hex string form.
    ///
    /// Accepts upper- or lowercase digits. Fails with
    /// [`HashError::InvalidLength`] if the character count is odd or
    /// outside 8..=510, and [`HashError::InvalidCharacter`] on the first
    /// non-hex digit. Exact inverse of [`ContentHash::to_hex`].
    pub fn from_hex(s: &str) -> Result<Self, HashError> {
        let len = s.len();
        if len % 2 != 0 || len < MIN_LEN * 2 || len > MAX_LEN * 2 {
            return Err(HashError::InvalidLength(len));
        }
        let mut bytes = Vec::with_capacity(len / 2);
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != len {
            // Multi-byte characters can never be hex digits.
            let bad = chars
                .iter()
                .find(|c| !c.is_ascii_hexdigit())
                .copied()
                .unwrap_or('?');
            return Err(HashError::InvalidCharacter(bad));
        }
        for pair in chars.chunks(2) {
            let hi = decode_digit(pair[0])?;
            let lo = decode_digit(pair[1])?;
            bytes.push((hi << 4) | lo);
        }
        Self::from_bytes(&bytes)
    }

    /// Renders the canonical lowercase hex form, zero-padded, with two
    /// characters per digest byte.
    pub fn to_hex(&self) -> String {
        use std::fmt::Write as _;
        let mut out = String::with_capacity(self.len() * 2);
        for byte in self.as_bytes() {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match &self.0 {
            Repr::Inline { len, bytes } => &bytes[..*len as usize],
            Repr::Heap(bytes) => bytes,
        }
    }

    /// Returns the digest length in bytes.
    pub fn len(&self) -> usize {
        match &self.0 {
            Repr::Inline { len, .. } => *len as usize,
            Repr::Heap(bytes) => bytes.len(),
        }
    }

    /// Returns `true` if the digest is empty. Always `false` for a
    /// constructed hash; present to satisfy the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn decode_digit(ch: char) -> Result<u8, HashError> {
    match ch {
        '0'..='9' => Ok(ch as u8 - b'0'),
        'a'..='f' => Ok(ch as u8 - b'a' + 10),
        'A'..='F' => Ok(ch as u8 - b'A' + 10),
        _ => Err(HashError::InvalidCharacter(ch)),
    }
}

impl PartialEq for ContentHash {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ContentHash {}

impl std::hash::Hash for ContentHash {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Ord for ContentHash {
    /// Lexicographic comparison over the raw digest bytes. The order has
    /// no lexical meaning; it exists so that iteration and serialization
    /// are deterministic.
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl PartialOrd for ContentHash {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.as_bytes();
        write!(f, "ContentHash({:02x}{:02x}..)", bytes[0], bytes[1])
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_accepts_bounds() {
        assert!(ContentHash::from_bytes(&[0u8; 4]).is_ok());
        assert!(ContentHash::from_bytes(&[0u8; 255]).is_ok());
    }

    #[test]
    fn from_bytes_rejects_out_of_bounds() {
        assert_eq!(
            ContentHash::from_bytes(&[0u8; 3]),
            Err(HashError::InvalidLength(3))
        );
        assert_eq!(
            ContentHash::from_bytes(&[0u8; 256]),
            Err(HashError::InvalidLength(256))
        );
    }

    #[test]
    fn of_content_deterministic() {
        let a = ContentHash::of_content(b"hello world");
        let b = ContentHash::of_content(b"hello world");
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn of_content_different_inputs_differ() {
        let a = ContentHash::of_content(b"hello");
        let b = ContentHash::of_content(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn of_content_is_sixteen_bytes() {
        assert_eq!(ContentHash::of_content(b"x").len(), 16);
    }

    #[test]
    fn from_u32_big_endian() {
        let h = ContentHash::from_u32(0x0102_0304);
        assert_eq!(h.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(h.to_hex(), "01020304");
    }

    #[test]
    fn hex_roundtrip_inline_and_heap() {
        for len in [4usize, 15, 16, 17, 32, 255] {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
            let h = ContentHash::from_bytes(&bytes).unwrap();
            let parsed = ContentHash::from_hex(&h.to_hex()).unwrap();
            assert_eq!(h, parsed, "roundtrip failed for len {len}");
            assert_eq!(parsed.as_bytes(), &bytes[..]);
        }
    }

    #[test]
    fn from_hex_accepts_uppercase() {
        let h = ContentHash::from_hex("DEADBEEF").unwrap();
        assert_eq!(h.to_hex(), "deadbeef");
    }

    #[test]
    fn from_hex_rejects_odd_length() {
        assert_eq!(
            ContentHash::from_hex("abcdef012"),
            Err(HashError::InvalidLength(9))
        );
    }

    #[test]
    fn from_hex_rejects_out_of_bounds() {
        assert_eq!(
            ContentHash::from_hex("abcdef"),
            Err(HashError::InvalidLength(6))
        );
        let long = "ab".repeat(256);
        assert_eq!(
            ContentHash::from_hex(&long),
            Err(HashError::InvalidLength(512))
        );
    }

    #[test]
    fn from_hex_rejects_non_hex_digit() {
        assert_eq!(
            ContentHash::from_hex("abcdefg0"),
            Err(HashError::InvalidCharacter('g'))
        );
    }

    #[test]
    fn to_hex_zero_padded() {
        let h = ContentHash::from_bytes(&[0, 1, 0x0a, 0xff]).unwrap();
        assert_eq!(h.to_hex(), "00010aff");
        assert_eq!(h.to_hex().len(), h.len() * 2);
    }

    #[test]
    fn display_matches_to_hex() {
        let h = ContentHash::of_content(b"display");
        assert_eq!(format!("{h}"), h.to_hex());
    }

    #[test]
    fn debug_abbreviated() {
        let h = ContentHash::of_content(b"debug");
        let s = format!("{h:?}");
        assert!(s.starts_with("ContentHash("));
        assert!(s.ends_with(".."));
        assert!(s.len() < 20);
    }

    #[test]
    fn ordering_is_lexicographic_over_bytes() {
        let a = ContentHash::from_bytes(&[0, 0, 0, 1]).unwrap();
        let b = ContentHash::from_bytes(&[0, 0, 0, 2]).unwrap();
        let c = ContentHash::from_bytes(&[0, 0, 0, 1, 0]).unwrap();
        assert!(a < b);
        // A strict prefix orders before its extension.
        assert!(a < c);
        assert!(c < b);
    }

    #[test]
    fn equality_ignores_storage_variant_padding() {
        // 16 bytes is the inline boundary; 17 forces heap storage.
        let short = ContentHash::from_bytes(&[1u8; 16]).unwrap();
        let long = ContentHash::from_bytes(&[1u8; 17]).unwrap();
        assert_ne!(short, long);
        assert_eq!(short, ContentHash::from_bytes(&[1u8; 16]).unwrap());
        assert_eq!(long, ContentHash::from_bytes(&[1u8; 17]).unwrap());
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(ContentHash::of_content(b"a"));
        set.insert(ContentHash::of_content(b"a"));
        set.insert(ContentHash::of_content(b"b"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn serde_roundtrip_as_hex_string() {
        let h = ContentHash::of_content(b"serde test");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{}\"", h.to_hex()));
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }

    #[test]
    fn serde_rejects_malformed_hex() {
        let r: Result<ContentHash, _> = serde_json::from_str("\"zzzz\"");
        assert!(r.is_err());
    }
}
