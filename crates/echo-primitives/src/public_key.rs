//! Public keys in their chain text form (`ECHO` + base58)

use bytes::{BufMut, BytesMut};
use echo_codec::Encode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::PrimitiveError;

/// Compressed secp256k1 public key (33 bytes).
///
/// Ordered by raw bytes so it can key an ordered map in authorities.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; 33]);

impl PublicKey {
    /// Size in bytes
    pub const LEN: usize = 33;

    /// Address prefix of the text form
    pub const PREFIX: &'static str = "ECHO";

    /// Create from compressed key bytes
    pub const fn from_bytes(bytes: [u8; 33]) -> Self {
        PublicKey(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, PrimitiveError> {
        if slice.len() != Self::LEN {
            return Err(PrimitiveError::InvalidLength {
                expected: Self::LEN,
                got: slice.len(),
            });
        }
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(slice);
        Ok(PublicKey(bytes))
    }

    /// Get as bytes
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Text form, `ECHO` followed by the base58 key bytes
    pub fn to_text(&self) -> String {
        format!("{}{}", Self::PREFIX, bs58::encode(self.0).into_string())
    }
}

impl FromStr for PublicKey {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| PrimitiveError::InvalidPublicKey(format!("missing {} prefix", Self::PREFIX)))?;
        let bytes = bs58::decode(body)
            .into_vec()
            .map_err(|e| PrimitiveError::InvalidPublicKey(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_text())
    }
}

impl Encode for PublicKey {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_slice(&self.0);
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PublicKey {
        let mut bytes = [0x5au8; 33];
        bytes[0] = 0x02;
        PublicKey::from_bytes(bytes)
    }

    #[test]
    fn test_text_roundtrip() {
        let key = sample();
        let text = key.to_text();
        assert!(text.starts_with("ECHO"));
        assert_eq!(text.parse::<PublicKey>().unwrap(), key);
    }

    #[test]
    fn test_missing_prefix() {
        let text = sample().to_text();
        let err = text.trim_start_matches("ECHO").parse::<PublicKey>().unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidPublicKey(_)));
    }

    #[test]
    fn test_wrong_length() {
        let text = format!("ECHO{}", bs58::encode([1u8; 10]).into_string());
        assert!(matches!(
            text.parse::<PublicKey>(),
            Err(PrimitiveError::InvalidLength { expected: 33, got: 10 })
        ));
    }

    #[test]
    fn test_encode_raw() {
        assert_eq!(sample().encode(), sample().as_bytes().to_vec());
    }

    #[test]
    fn test_serde_text_form() {
        let key = sample();
        let json = serde_json::to_value(key).unwrap();
        assert_eq!(json, serde_json::Value::String(key.to_text()));
        let back: PublicKey = serde_json::from_value(json).unwrap();
        assert_eq!(back, key);
    }
}
