//! 256-bit hash type (chain ids, digests)

use bytes::{BufMut, BytesMut};
use echo_codec::Encode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::PrimitiveError;

/// 256-bit hash (32 bytes)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct H256([u8; 32]);

/// Chain id, the 32-byte hash every signature commits to
pub type ChainId = H256;

impl H256 {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Zero hash
    pub const ZERO: H256 = H256([0u8; 32]);

    /// Create from bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, PrimitiveError> {
        if slice.len() != Self::LEN {
            return Err(PrimitiveError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(H256(bytes))
    }

    /// Parse from hex string (chain ids come without a `0x` prefix, both are accepted)
    pub fn from_hex(s: &str) -> Result<Self, PrimitiveError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| PrimitiveError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Lowercase hex without prefix, the form nodes use
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H256({})", self.to_hex())
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for H256 {
    fn from(bytes: [u8; 32]) -> Self {
        H256(bytes)
    }
}

impl AsRef<[u8]> for H256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Encode for H256 {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_slice(&self.0);
    }
}

impl Serialize for H256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        H256::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN: &str = "4a41752b4d1c8e8c0a4e8d1e3b2a2f6d9e6c8a7b5d4c3b2a1908f7e6d5c4b3a2";

    #[test]
    fn test_from_hex_with_and_without_prefix() {
        let a = H256::from_hex(CHAIN).unwrap();
        let b = H256::from_hex(&format!("0x{CHAIN}")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), CHAIN);
    }

    #[test]
    fn test_invalid_length() {
        let err = H256::from_hex("abcd").unwrap_err();
        assert_eq!(err, PrimitiveError::InvalidLength { expected: 32, got: 2 });
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(
            H256::from_hex("zz"),
            Err(PrimitiveError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_encode_is_raw_32_bytes() {
        let h = H256::from_bytes([7u8; 32]);
        assert_eq!(h.encode(), vec![7u8; 32]);
    }

    #[test]
    fn test_serde() {
        let h = H256::from_hex(CHAIN).unwrap();
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, format!("\"{CHAIN}\""));
        assert_eq!(serde_json::from_str::<H256>(&json).unwrap(), h);
    }
}
