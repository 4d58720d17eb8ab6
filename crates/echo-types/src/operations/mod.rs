//! Operation kinds.
//!
//! Every operation encodes as `fee ++ operands ++ extensions` in the field
//! order of the consensus struct. Tags are positions in an append-only
//! enumeration: new kinds go at the end of [`define_operations!`].

use bytes::BytesMut;
use echo_codec::{check_length, Encode};
use echo_primitives::AssetAmount;
use serde::de::{DeserializeOwned, Error as DeError};
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::TypesError;

mod account;
mod asset;
mod balance;
mod contract;
mod reward;
mod sidechain;
mod transfer;

pub use account::{
    AccountAddressCreateOperation, AccountCreateOperation, AccountUpdateBuilder,
    AccountUpdateOperation, AccountWhitelistOperation, Listing,
};
pub use asset::{
    AssetClaimFeesOperation, AssetCreateOperation, AssetFundFeePoolOperation,
    AssetIssueOperation, AssetReserveOperation, AssetUpdateOperation,
};
pub use balance::{BalanceClaimOperation, BalanceFreezeOperation, BalanceUnfreezeOperation};
pub use contract::{
    ContractCallOperation, ContractCreateOperation, ContractFundPoolOperation,
    ContractTransferOperation, ContractUpdateOperation,
};
pub use reward::BlockRewardOperation;
pub use sidechain::{
    SidechainBtcCreateAddressOperation, SidechainBurnOperation,
    SidechainErc20DepositTokenOperation, SidechainErc20RegisterTokenOperation,
    SidechainErc20WithdrawTokenOperation, SidechainEthCreateAddressOperation,
    SidechainEthWithdrawOperation, SidechainIssueOperation,
};
pub use transfer::{OverrideTransferOperation, TransferOperation, TransferToAddressOperation};

/// Build-time checks of a caller-constructed operation.
///
/// Operations without constraints beyond their types keep the default.
pub trait Validate {
    /// Reject values the node would refuse or the codec cannot carry
    fn validate(&self) -> Result<(), TypesError> {
        Ok(())
    }
}

/// Shared shape of every operation body
pub trait OperationBody:
    Encode + Validate + Serialize + DeserializeOwned + Clone + fmt::Debug + Into<Operation>
{
    /// Kind, and therefore wire tag, of this body
    const KIND: OperationKind;

    /// Fee paid for this operation
    fn fee(&self) -> &AssetAmount;

    /// Mutable fee, replaced by the transaction assembler
    fn fee_mut(&mut self) -> &mut AssetAmount;
}

/// Implements [`OperationBody`] and the conversion into [`Operation`]
macro_rules! operation_body {
    ($body:ident => $kind:ident) => {
        impl $crate::operations::OperationBody for $body {
            const KIND: $crate::operations::OperationKind =
                $crate::operations::OperationKind::$kind;

            fn fee(&self) -> &echo_primitives::AssetAmount {
                &self.fee
            }

            fn fee_mut(&mut self) -> &mut echo_primitives::AssetAmount {
                &mut self.fee
            }
        }

        impl From<$body> for $crate::operations::Operation {
            fn from(op: $body) -> Self {
                $crate::operations::Operation::$kind(op)
            }
        }
    };
}
pub(crate) use operation_body;

macro_rules! define_operations {
    ($($tag:literal => $kind:ident($body:ident),)*) => {
        /// Wire tag of each operation kind
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u8)]
        pub enum OperationKind {
            $(
                #[allow(missing_docs)]
                $kind = $tag,
            )*
        }

        impl OperationKind {
            /// Every kind in tag order
            pub const ALL: &'static [OperationKind] = &[$(OperationKind::$kind,)*];

            /// Wire tag
            pub fn tag(self) -> u8 {
                self as u8
            }

            /// Look up a kind by tag
            pub fn from_tag(tag: u8) -> Option<Self> {
                match tag {
                    $($tag => Some(OperationKind::$kind),)*
                    _ => None,
                }
            }
        }

        /// Any operation, tagged by kind
        #[derive(Debug, Clone, PartialEq)]
        pub enum Operation {
            $(
                #[allow(missing_docs)]
                $kind($body),
            )*
        }

        impl Operation {
            /// Kind of this operation
            pub fn kind(&self) -> OperationKind {
                match self {
                    $(Operation::$kind(_) => OperationKind::$kind,)*
                }
            }

            /// Fee currently set on this operation
            pub fn fee(&self) -> &AssetAmount {
                match self {
                    $(Operation::$kind(op) => op.fee(),)*
                }
            }

            /// Replace the fee
            pub fn set_fee(&mut self, fee: AssetAmount) {
                match self {
                    $(Operation::$kind(op) => *op.fee_mut() = fee,)*
                }
            }

            /// Run the body's build-time checks
            pub fn validate(&self) -> Result<(), TypesError> {
                match self {
                    $(Operation::$kind(op) => op.validate(),)*
                }
            }

            fn body_json(&self) -> Result<Value, serde_json::Error> {
                match self {
                    $(Operation::$kind(op) => serde_json::to_value(op),)*
                }
            }

            /// Decode a body given its tag
            pub fn from_tagged_json(tag: u64, body: Value) -> Result<Self, TypesError> {
                let kind = u8::try_from(tag)
                    .ok()
                    .and_then(OperationKind::from_tag)
                    .ok_or(TypesError::UnknownOperation(tag))?;
                match kind {
                    $(OperationKind::$kind => Ok(Operation::$kind(serde_json::from_value(body)?)),)*
                }
            }
        }

        impl Encode for Operation {
            fn encode_to(&self, out: &mut BytesMut) {
                match self {
                    $(Operation::$kind(op) => op.encode_to(out),)*
                }
            }
        }
    };
}

define_operations! {
    0 => Transfer(TransferOperation),
    1 => TransferToAddress(TransferToAddressOperation),
    2 => OverrideTransfer(OverrideTransferOperation),
    3 => AccountCreate(AccountCreateOperation),
    4 => AccountUpdate(AccountUpdateOperation),
    5 => AccountWhitelist(AccountWhitelistOperation),
    6 => AccountAddressCreate(AccountAddressCreateOperation),
    7 => AssetCreate(AssetCreateOperation),
    8 => AssetUpdate(AssetUpdateOperation),
    9 => AssetIssue(AssetIssueOperation),
    10 => AssetReserve(AssetReserveOperation),
    11 => AssetFundFeePool(AssetFundFeePoolOperation),
    12 => AssetClaimFees(AssetClaimFeesOperation),
    13 => BalanceClaim(BalanceClaimOperation),
    14 => BalanceFreeze(BalanceFreezeOperation),
    15 => BalanceUnfreeze(BalanceUnfreezeOperation),
    16 => ContractCreate(ContractCreateOperation),
    17 => ContractCall(ContractCallOperation),
    18 => ContractTransfer(ContractTransferOperation),
    19 => ContractUpdate(ContractUpdateOperation),
    20 => ContractFundPool(ContractFundPoolOperation),
    21 => SidechainEthCreateAddress(SidechainEthCreateAddressOperation),
    22 => SidechainEthWithdraw(SidechainEthWithdrawOperation),
    23 => SidechainErc20RegisterToken(SidechainErc20RegisterTokenOperation),
    24 => SidechainErc20DepositToken(SidechainErc20DepositTokenOperation),
    25 => SidechainIssue(SidechainIssueOperation),
    26 => SidechainBurn(SidechainBurnOperation),
    27 => SidechainBtcCreateAddress(SidechainBtcCreateAddressOperation),
    28 => SidechainErc20WithdrawToken(SidechainErc20WithdrawTokenOperation),
    29 => BlockReward(BlockRewardOperation),
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = self.body_json().map_err(S::Error::custom)?;
        (self.kind().tag(), body).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (tag, body) = <(u64, Value)>::deserialize(deserializer)?;
        Operation::from_tagged_json(tag, body).map_err(D::Error::custom)
    }
}

pub(crate) fn ensure_positive(what: &str, amount: &AssetAmount) -> Result<(), TypesError> {
    if amount.is_zero() {
        return Err(TypesError::malformed(format!("{what} must be positive")));
    }
    Ok(())
}

pub(crate) fn ensure_text(what: &'static str, value: &str) -> Result<(), TypesError> {
    if value.is_empty() {
        return Err(TypesError::malformed(format!("{what} is empty")));
    }
    check_length(what, value.len())?;
    Ok(())
}

pub(crate) fn ensure_hex(what: &'static str, value: &str) -> Result<(), TypesError> {
    ensure_text(what, value)?;
    if value.len() % 2 != 0 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(TypesError::malformed(format!("{what} is not a hex string")));
    }
    Ok(())
}

/// 40 hex characters, no `0x` prefix
pub(crate) fn ensure_eth_address(what: &'static str, value: &str) -> Result<(), TypesError> {
    ensure_hex(what, value)?;
    if value.len() != 40 {
        return Err(TypesError::malformed(format!(
            "{what} must be 40 hex characters, got {}",
            value.len()
        )));
    }
    Ok(())
}
