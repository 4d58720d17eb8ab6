//! Weighted multi-signature authorities

use bytes::{BufMut, BytesMut};
use echo_codec::{check_length, Encode};
use echo_primitives::{AccountId, PublicKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Extensions, TypesError};

/// Threshold plus weighted key and account approvals.
///
/// Both maps are ordered so the wire encoding of a logically identical
/// authority never changes between encodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    /// Sum of weights required to approve
    pub weight_threshold: u32,
    /// Approving accounts and their weights
    #[serde(with = "pairs")]
    pub account_auths: BTreeMap<AccountId, u16>,
    /// Approving keys and their weights
    #[serde(with = "pairs")]
    pub key_auths: BTreeMap<PublicKey, u16>,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Authority {
    /// Single-key authority with threshold 1
    pub fn from_key(key: PublicKey) -> Self {
        let mut key_auths = BTreeMap::new();
        key_auths.insert(key, 1);
        Self {
            weight_threshold: 1,
            key_auths,
            ..Default::default()
        }
    }

    /// Single-account authority with threshold 1
    pub fn from_account(account: AccountId) -> Self {
        let mut account_auths = BTreeMap::new();
        account_auths.insert(account, 1);
        Self {
            weight_threshold: 1,
            account_auths,
            ..Default::default()
        }
    }

    /// Add or replace a key approval
    pub fn with_key(mut self, key: PublicKey, weight: u16) -> Self {
        self.key_auths.insert(key, weight);
        self
    }

    /// Add or replace an account approval
    pub fn with_account(mut self, account: AccountId, weight: u16) -> Self {
        self.account_auths.insert(account, weight);
        self
    }

    /// Total weight of every approval
    pub fn total_weight(&self) -> u64 {
        self.account_auths
            .values()
            .chain(self.key_auths.values())
            .map(|w| u64::from(*w))
            .sum()
    }

    /// Reject authorities that can never be satisfied or cannot be encoded
    pub fn validate(&self) -> Result<(), TypesError> {
        check_length("account_auths", self.account_auths.len())?;
        check_length("key_auths", self.key_auths.len())?;
        if self.weight_threshold == 0 {
            return Err(TypesError::malformed("authority weight threshold is zero"));
        }
        if self.total_weight() < u64::from(self.weight_threshold) {
            return Err(TypesError::malformed(format!(
                "authority weights sum to {} but threshold is {}",
                self.total_weight(),
                self.weight_threshold
            )));
        }
        Ok(())
    }
}

impl Encode for Authority {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u32_le(self.weight_threshold);
        self.account_auths.encode_to(out);
        self.key_auths.encode_to(out);
        self.extensions.encode_to(out);
    }
}

/// Maps travel as `[[key, weight], ...]` in the node's JSON.
mod pairs {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: DeserializeOwned + Ord,
        V: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let entries = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}
