//! Block producer rewards

use bytes::{BufMut, BytesMut};
use echo_codec::Encode;
use echo_primitives::serde_helpers::u64_from_number_or_string;
use echo_primitives::{AccountId, AssetAmount};
use serde::{Deserialize, Serialize};

use super::{operation_body, Validate};
use crate::Extensions;

/// Virtual operation recording a block reward; produced by the node,
/// decoded from history and notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRewardOperation {
    /// Always zero
    #[serde(default)]
    pub fee: AssetAmount,
    /// Rewarded account
    pub receiver: AccountId,
    /// Core asset amount
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub amount: u64,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for BlockRewardOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.receiver.encode_to(out);
        out.put_u64_le(self.amount);
        self.extensions.encode_to(out);
    }
}

impl Validate for BlockRewardOperation {}

operation_body!(BlockRewardOperation => BlockReward);
