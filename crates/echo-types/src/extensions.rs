//! Extension lists

use bytes::{BufMut, BytesMut};
use echo_codec::Encode;
use serde::de::{IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Future-extension slot carried by every operation and transaction.
///
/// No extensions are defined yet: the wire form is a zero count byte and
/// the JSON form is `[]`. Unknown entries in inbound JSON are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extensions;

impl Encode for Extensions {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u8(0);
    }
}

impl Serialize for Extensions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(std::iter::empty::<()>())
    }
}

impl<'de> Deserialize<'de> for Extensions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExtensionsVisitor;

        impl<'de> Visitor<'de> for ExtensionsVisitor {
            type Value = Extensions;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an extension list")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Extensions)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Extensions)
            }
        }

        deserializer.deserialize_any(ExtensionsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_as_zero_count() {
        assert_eq!(Extensions.encode(), vec![0]);
    }

    #[test]
    fn test_json_forms() {
        assert_eq!(serde_json::to_string(&Extensions).unwrap(), "[]");
        let parsed: Extensions = serde_json::from_str("[[1, {}]]").unwrap();
        assert_eq!(parsed, Extensions);
        let parsed: Extensions = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Extensions);
    }
}
