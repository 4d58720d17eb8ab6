//! Serde helpers for chain JSON quirks.
//!
//! Nodes emit 64-bit integers either as JSON numbers or as decimal strings
//! depending on magnitude and API, so numeric fields accept both.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Deserialize a `u64` from a JSON number or a decimal string.
pub fn u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct U64Visitor;

    impl<'de> Visitor<'de> for U64Visitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an unsigned integer or a decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::custom(format!("negative value {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            v.trim().parse().map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U64Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "u64_from_number_or_string")]
        value: u64,
    }

    #[test]
    fn test_number() {
        let h: Holder = serde_json::from_str(r#"{"value": 42}"#).unwrap();
        assert_eq!(h.value, 42);
    }

    #[test]
    fn test_string() {
        let h: Holder = serde_json::from_str(r#"{"value": "18446744073709551615"}"#).unwrap();
        assert_eq!(h.value, u64::MAX);
    }

    #[test]
    fn test_rejects_negative_and_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"value": -1}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"value": "ten"}"#).is_err());
    }
}
