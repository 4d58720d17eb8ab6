//! Value transfers between accounts and addresses

use bytes::BytesMut;
use echo_codec::Encode;
use echo_primitives::{AccountId, Address, AssetAmount};
use serde::{Deserialize, Serialize};

use super::{ensure_positive, operation_body, Validate};
use crate::{Extensions, TypesError};

/// Move an amount from one account to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Paying account
    pub from: AccountId,
    /// Receiving account
    pub to: AccountId,
    /// Amount moved
    pub amount: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl TransferOperation {
    /// Transfer with a zero fee
    pub fn new(from: AccountId, to: AccountId, amount: AssetAmount) -> Self {
        Self {
            fee: AssetAmount::default(),
            from,
            to,
            amount,
            extensions: Extensions,
        }
    }
}

impl Encode for TransferOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.from.encode_to(out);
        self.to.encode_to(out);
        self.amount.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for TransferOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("amount", &self.amount)?;
        if self.from == self.to {
            return Err(TypesError::malformed("cannot transfer to self"));
        }
        Ok(())
    }
}

operation_body!(TransferOperation => Transfer);

/// Move an amount from an account to a 20-byte address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferToAddressOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Paying account
    pub from: AccountId,
    /// Receiving address
    pub to: Address,
    /// Amount moved
    pub amount: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for TransferToAddressOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.from.encode_to(out);
        self.to.encode_to(out);
        self.amount.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for TransferToAddressOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("amount", &self.amount)
    }
}

operation_body!(TransferToAddressOperation => TransferToAddress);

/// Issuer-forced transfer of an asset between two holders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideTransferOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Issuer of the transferred asset
    pub issuer: AccountId,
    /// Account the amount is taken from
    pub from: AccountId,
    /// Receiving account
    pub to: AccountId,
    /// Amount moved
    pub amount: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for OverrideTransferOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.issuer.encode_to(out);
        self.from.encode_to(out);
        self.to.encode_to(out);
        self.amount.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for OverrideTransferOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("amount", &self.amount)?;
        if self.from == self.to {
            return Err(TypesError::malformed("from and to must differ"));
        }
        if self.issuer == self.from {
            return Err(TypesError::malformed("issuer cannot override its own balance"));
        }
        Ok(())
    }
}

operation_body!(OverrideTransferOperation => OverrideTransfer);
