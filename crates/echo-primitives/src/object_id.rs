//! Chain object identifiers (`space.type.instance`)

use bytes::BytesMut;
use echo_codec::Encode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::PrimitiveError;

/// Protocol object space
pub const PROTOCOL_SPACE: u8 = 1;

/// Implementation object space
pub const IMPLEMENTATION_SPACE: u8 = 2;

/// Chain-wide object identifier.
///
/// Only `instance` goes on the wire; `space` and `type_id` are implied by
/// the field the id sits in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId {
    space: u8,
    type_id: u8,
    instance: u64,
}

impl ObjectId {
    /// Account object type in the protocol space
    pub const ACCOUNT_TYPE: u8 = 2;
    /// Asset object type in the protocol space
    pub const ASSET_TYPE: u8 = 3;
    /// Contract object type in the protocol space
    pub const CONTRACT_TYPE: u8 = 9;

    /// The core asset (`1.3.0`)
    pub const CORE_ASSET: ObjectId = ObjectId::new(PROTOCOL_SPACE, Self::ASSET_TYPE, 0);

    /// Dynamic global properties object (`2.1.0`)
    pub const DYNAMIC_GLOBAL_PROPERTIES: ObjectId = ObjectId::new(IMPLEMENTATION_SPACE, 1, 0);

    /// Create an id from its parts
    pub const fn new(space: u8, type_id: u8, instance: u64) -> Self {
        Self {
            space,
            type_id,
            instance,
        }
    }

    /// Account id `1.2.{instance}`
    pub const fn account(instance: u64) -> Self {
        Self::new(PROTOCOL_SPACE, Self::ACCOUNT_TYPE, instance)
    }

    /// Asset id `1.3.{instance}`
    pub const fn asset(instance: u64) -> Self {
        Self::new(PROTOCOL_SPACE, Self::ASSET_TYPE, instance)
    }

    /// Contract id `1.9.{instance}`
    pub const fn contract(instance: u64) -> Self {
        Self::new(PROTOCOL_SPACE, Self::CONTRACT_TYPE, instance)
    }

    /// Parse without failing.
    ///
    /// Any part that is missing or not a number is left at zero, so `"bad"`
    /// yields `0.0.0`. Use [`FromStr`] when malformed input must be rejected.
    pub fn parse_lenient(s: &str) -> Self {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Self::default();
        }
        Self {
            space: parts[0].parse().unwrap_or(0),
            type_id: parts[1].parse().unwrap_or(0),
            instance: parts[2].parse().unwrap_or(0),
        }
    }

    /// Check whether a string has the `space.type.instance` shape
    pub fn is_object_id(s: &str) -> bool {
        s.parse::<ObjectId>().is_ok()
    }

    /// Object space
    pub fn space(&self) -> u8 {
        self.space
    }

    /// Object type within the space
    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    /// Instance number
    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// `1.2.x`
    pub fn is_account(&self) -> bool {
        self.space == PROTOCOL_SPACE && self.type_id == Self::ACCOUNT_TYPE
    }

    /// `1.3.x`
    pub fn is_asset(&self) -> bool {
        self.space == PROTOCOL_SPACE && self.type_id == Self::ASSET_TYPE
    }

    /// `1.9.x`
    pub fn is_contract(&self) -> bool {
        self.space == PROTOCOL_SPACE && self.type_id == Self::CONTRACT_TYPE
    }
}

impl FromStr for ObjectId {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PrimitiveError::InvalidObjectId(s.to_string());
        let mut parts = s.split('.');
        let (Some(space), Some(type_id), Some(instance), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        Ok(Self {
            space: space.parse().map_err(|_| invalid())?,
            type_id: type_id.parse().map_err(|_| invalid())?,
            instance: instance.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.space, self.type_id, self.instance)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self)
    }
}

impl Encode for ObjectId {
    fn encode_to(&self, out: &mut BytesMut) {
        self.instance.encode_to(out);
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parts() {
        let id: ObjectId = "1.2.345".parse().unwrap();
        assert_eq!(id.space(), 1);
        assert_eq!(id.type_id(), 2);
        assert_eq!(id.instance(), 345);
        assert!(id.is_account());
    }

    #[test]
    fn test_parse_rejects_wrong_part_count() {
        assert!("1.2".parse::<ObjectId>().is_err());
        assert!("1.2.3.4".parse::<ObjectId>().is_err());
        assert!("bad".parse::<ObjectId>().is_err());
        assert!("".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!("1.2.x".parse::<ObjectId>().is_err());
        assert!("a.2.3".parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(ObjectId::parse_lenient("bad").instance(), 0);
        assert_eq!(ObjectId::parse_lenient("1.2.x").instance(), 0);
        assert_eq!(ObjectId::parse_lenient("1.2.x").type_id(), 2);
        assert_eq!(ObjectId::parse_lenient("1.2.345").instance(), 345);
    }

    #[test]
    fn test_display_roundtrip() {
        let id = ObjectId::asset(7);
        assert_eq!(id.to_string(), "1.3.7");
        assert_eq!(id.to_string().parse::<ObjectId>().unwrap(), id);
    }

    #[test]
    fn test_wire_form_is_instance_only() {
        assert_eq!(ObjectId::account(345).encode(), 345u64.to_le_bytes().to_vec());
        assert_eq!(
            ObjectId::account(345).encode(),
            ObjectId::asset(345).encode()
        );
    }

    #[test]
    fn test_well_known_ids() {
        assert_eq!(ObjectId::CORE_ASSET.to_string(), "1.3.0");
        assert_eq!(ObjectId::DYNAMIC_GLOBAL_PROPERTIES.to_string(), "2.1.0");
    }

    #[test]
    fn test_serde_string_form() {
        let id = ObjectId::contract(12);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1.9.12\"");
        let back: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
    }

    #[test]
    fn test_ordering_by_instance_within_type() {
        assert!(ObjectId::account(2) < ObjectId::account(10));
    }
}
