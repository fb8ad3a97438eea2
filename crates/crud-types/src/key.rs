use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Unique identifier of a stored object within a store namespace.
///
/// A primary key is an arbitrary byte sequence. It is fixed for the lifetime
/// of the record: updates always address the same key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimaryKey(Vec<u8>);

impl PrimaryKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Short hex representation (at most the first 8 characters).
    pub fn short_hex(&self) -> String {
        let end = self.0.len().min(4);
        hex::encode(&self.0[..end])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        hex::decode(s)
            .map(Self)
            .map_err(|e| CodecError::Decode(format!("invalid hex primary key: {e}")))
    }
}

impl fmt::Debug for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimaryKey({})", self.short_hex())
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for PrimaryKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PrimaryKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for PrimaryKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for PrimaryKey {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<PrimaryKey> for Vec<u8> {
    fn from(key: PrimaryKey) -> Self {
        key.0
    }
}

/// A named, sortable attribute derived from an object, used for filtering.
///
/// Secondary keys are not unique: many objects may share one. Ordering is by
/// `name`, then by the raw `value` bytes, so numeric values should be built
/// with [`SecondaryKey::from_u64`] to keep byte order equal to numeric order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SecondaryKey {
    /// The attribute this key indexes (e.g. `"category"`).
    pub name: String,
    /// The attribute value.
    pub value: Vec<u8>,
}

impl SecondaryKey {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn from_str_value(name: impl Into<String>, value: &str) -> Self {
        Self::new(name, value.as_bytes().to_vec())
    }

    /// Big-endian encoding, so lexicographic order matches numeric order.
    pub fn from_u64(name: impl Into<String>, value: u64) -> Self {
        Self::new(name, value.to_be_bytes().to_vec())
    }

    /// Self-delimiting byte form: `u64 BE name len ++ name ++ u64 BE value len ++ value`.
    ///
    /// Because both parts are length-prefixed, no encoded key is a prefix of
    /// another distinct key's encoding. `usize` always fits in `u64`, so the
    /// lengths are never truncated.
    pub fn encode_prefix(&self) -> Vec<u8> {
        let name = self.name.as_bytes();
        let mut out = Vec::with_capacity(16 + name.len() + self.value.len());
        out.extend_from_slice(&(name.len() as u64).to_be_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&(self.value.len() as u64).to_be_bytes());
        out.extend_from_slice(&self.value);
        out
    }
}

impl fmt::Display for SecondaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.value) {
            Ok(s) => write!(f, "{}={}", self.name, s),
            Err(_) => write!(f, "{}=0x{}", self.name, hex::encode(&self.value)),
        }
    }
}
