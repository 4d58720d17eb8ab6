//! Genesis balance claims and balance freezing

use bytes::{BufMut, BytesMut};
use echo_codec::Encode;
use echo_primitives::{AccountId, AssetAmount, ObjectId, PublicKey};
use serde::{Deserialize, Serialize};

use super::{ensure_positive, operation_body, Validate};
use crate::{Extensions, TypesError};

/// Claim a genesis balance object into an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceClaimOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Receiving account
    pub deposit_to_account: AccountId,
    /// Balance object (`1.8.x`)
    pub balance_to_claim: ObjectId,
    /// Key owning the balance
    pub balance_owner_key: PublicKey,
    /// Amount claimed
    pub total_claimed: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for BalanceClaimOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.deposit_to_account.encode_to(out);
        self.balance_to_claim.encode_to(out);
        self.balance_owner_key.encode_to(out);
        self.total_claimed.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for BalanceClaimOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("total_claimed", &self.total_claimed)
    }
}

operation_body!(BalanceClaimOperation => BalanceClaim);

/// Lock an amount for a number of days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceFreezeOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Owning account
    pub account: AccountId,
    /// Amount frozen
    pub amount: AssetAmount,
    /// Freeze duration in days
    pub duration: u16,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for BalanceFreezeOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        self.amount.encode_to(out);
        out.put_u16_le(self.duration);
        self.extensions.encode_to(out);
    }
}

impl Validate for BalanceFreezeOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("amount", &self.amount)?;
        if self.duration == 0 {
            return Err(TypesError::malformed("duration must be positive"));
        }
        Ok(())
    }
}

operation_body!(BalanceFreezeOperation => BalanceFreeze);

/// Release an expired freeze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceUnfreezeOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Owning account
    pub account: AccountId,
    /// Amount released
    pub amount: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for BalanceUnfreezeOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        self.amount.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for BalanceUnfreezeOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("amount", &self.amount)
    }
}

operation_body!(BalanceUnfreezeOperation => BalanceUnfreeze);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeze_duration_encoded_after_amount() {
        let op = BalanceFreezeOperation {
            fee: AssetAmount::core(2),
            account: AccountId::account(4),
            amount: AssetAmount::core(1_000),
            duration: 90,
            extensions: Extensions,
        };
        let bytes = op.encode();
        assert_eq!(&bytes[40..42], &90u16.to_le_bytes());
        assert_eq!(bytes.len(), 43);
    }

    #[test]
    fn test_freeze_zero_duration() {
        let op = BalanceFreezeOperation {
            fee: AssetAmount::default(),
            account: AccountId::account(4),
            amount: AssetAmount::core(1),
            duration: 0,
            extensions: Extensions,
        };
        assert!(op.validate().is_err());
    }
}
