//! Chain head state (object `2.1.0`)

use echo_primitives::serde_helpers::u64_from_number_or_string;
use echo_primitives::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{parse_chain_time, TypesError};

/// Dynamic global properties, the source of every transaction's TaPoS data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    /// Always `2.1.0`
    pub id: ObjectId,
    /// Height of the head block
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub head_block_number: u64,
    /// Hex id of the head block
    pub head_block_id: String,
    /// Head block timestamp
    pub time: String,
    /// Next maintenance interval
    #[serde(default)]
    pub next_maintenance_time: Option<String>,
    /// Last irreversible block
    #[serde(default)]
    pub last_irreversible_block_num: u64,
}

impl DynamicGlobalProperties {
    /// Head block time as unix seconds
    pub fn time_secs(&self) -> Result<u32, TypesError> {
        parse_chain_time(&self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_node_object() {
        let json = serde_json::json!({
            "id": "2.1.0",
            "head_block_number": 70000,
            "head_block_id": "00011170a1b2c3d4e5f60718293a4b5c6d7e8f90",
            "time": "2019-01-01T00:00:00",
            "next_maintenance_time": "2019-01-01T01:00:00",
            "last_irreversible_block_num": 69990,
            "recently_missed_count": 0
        });
        let props: DynamicGlobalProperties = serde_json::from_value(json).unwrap();
        assert_eq!(props.id, ObjectId::DYNAMIC_GLOBAL_PROPERTIES);
        assert_eq!(props.head_block_number, 70000);
        assert_eq!(props.time_secs().unwrap(), 1_546_300_800);
    }
}
