//! Ethereum and Bitcoin sidechain operations

use bytes::{BufMut, BytesMut};
use echo_codec::Encode;
use echo_primitives::serde_helpers::u64_from_number_or_string;
use echo_primitives::{AccountId, AssetAmount, ObjectId};
use serde::{Deserialize, Serialize};

use super::{ensure_eth_address, ensure_hex, ensure_positive, ensure_text, operation_body, Validate};
use crate::{Extensions, TypesError};

/// Ask the committee to generate an Ethereum deposit address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainEthCreateAddressOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Account receiving the address
    pub account: AccountId,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainEthCreateAddressOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainEthCreateAddressOperation {}

operation_body!(SidechainEthCreateAddressOperation => SidechainEthCreateAddress);

/// Withdraw wrapped ETH to an Ethereum address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainEthWithdrawOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Withdrawing account
    pub account: AccountId,
    /// Destination, 40 hex characters
    pub eth_addr: String,
    /// Amount in the wrapped asset's units
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub value: u64,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainEthWithdrawOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        self.eth_addr.encode_to(out);
        out.put_u64_le(self.value);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainEthWithdrawOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_eth_address("eth_addr", &self.eth_addr)?;
        if self.value == 0 {
            return Err(TypesError::malformed("value must be positive"));
        }
        Ok(())
    }
}

operation_body!(SidechainEthWithdrawOperation => SidechainEthWithdraw);

/// Register an ERC-20 token for bridging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainErc20RegisterTokenOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Registering account
    pub account: AccountId,
    /// Token contract, 40 hex characters
    pub eth_addr: String,
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Token decimals
    pub decimals: u8,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainErc20RegisterTokenOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        self.eth_addr.encode_to(out);
        self.name.encode_to(out);
        self.symbol.encode_to(out);
        out.put_u8(self.decimals);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainErc20RegisterTokenOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_eth_address("eth_addr", &self.eth_addr)?;
        ensure_text("name", &self.name)?;
        ensure_text("symbol", &self.symbol)
    }
}

operation_body!(SidechainErc20RegisterTokenOperation => SidechainErc20RegisterToken);

/// Committee report of an ERC-20 deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainErc20DepositTokenOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Reporting committee member
    pub committee_member_id: AccountId,
    /// Credited account
    pub account: AccountId,
    /// Token contract, 40 hex characters
    pub erc20_token_addr: String,
    /// Deposited amount as a decimal string (uint256)
    pub value: String,
    /// Ethereum transaction hash, hex
    pub transaction_hash: String,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainErc20DepositTokenOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.committee_member_id.encode_to(out);
        self.account.encode_to(out);
        self.erc20_token_addr.encode_to(out);
        self.value.encode_to(out);
        self.transaction_hash.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainErc20DepositTokenOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_eth_address("erc20_token_addr", &self.erc20_token_addr)?;
        ensure_text("value", &self.value)?;
        if !self.value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypesError::malformed("value must be a decimal string"));
        }
        ensure_hex("transaction_hash", &self.transaction_hash)
    }
}

operation_body!(SidechainErc20DepositTokenOperation => SidechainErc20DepositToken);

/// Mint wrapped assets for a confirmed deposit (committee)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainIssueOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Minted amount
    pub value: AssetAmount,
    /// Credited account
    pub account: AccountId,
    /// Deposit object being settled
    pub deposit_id: ObjectId,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainIssueOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.value.encode_to(out);
        self.account.encode_to(out);
        self.deposit_id.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainIssueOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("value", &self.value)
    }
}

operation_body!(SidechainIssueOperation => SidechainIssue);

/// Burn wrapped assets for a confirmed withdrawal (committee)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainBurnOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Burned amount
    pub value: AssetAmount,
    /// Debited account
    pub account: AccountId,
    /// Withdrawal object being settled
    pub withdraw_id: ObjectId,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainBurnOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.value.encode_to(out);
        self.account.encode_to(out);
        self.withdraw_id.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainBurnOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_positive("value", &self.value)
    }
}

operation_body!(SidechainBurnOperation => SidechainBurn);

/// Ask the committee for a Bitcoin deposit address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainBtcCreateAddressOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Account receiving the address
    pub account: AccountId,
    /// User's own Bitcoin address for refunds
    pub backup_address: String,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainBtcCreateAddressOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        self.backup_address.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainBtcCreateAddressOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_text("backup_address", &self.backup_address)
    }
}

operation_body!(SidechainBtcCreateAddressOperation => SidechainBtcCreateAddress);

/// Withdraw a bridged ERC-20 token to Ethereum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidechainErc20WithdrawTokenOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Withdrawing account
    pub account: AccountId,
    /// Destination, 40 hex characters
    pub to: String,
    /// Registered token object
    pub erc20_token: ObjectId,
    /// Amount as a decimal string (uint256)
    pub value: String,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for SidechainErc20WithdrawTokenOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.account.encode_to(out);
        self.to.encode_to(out);
        self.erc20_token.encode_to(out);
        self.value.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for SidechainErc20WithdrawTokenOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_eth_address("to", &self.to)?;
        ensure_text("value", &self.value)
    }
}

operation_body!(SidechainErc20WithdrawTokenOperation => SidechainErc20WithdrawToken);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_withdraw_layout() {
        let op = SidechainEthWithdrawOperation {
            fee: AssetAmount::core(20),
            account: AccountId::account(8),
            eth_addr: "ab".repeat(20),
            value: 77,
            extensions: Extensions,
        };
        assert!(op.validate().is_ok());
        let bytes = op.encode();
        assert_eq!(bytes[24], 40);
        assert_eq!(&bytes[65..73], &77u64.to_le_bytes());
        assert_eq!(bytes.len(), 74);
    }

    #[test]
    fn test_withdraw_rejects_prefixed_address() {
        let op = SidechainEthWithdrawOperation {
            fee: AssetAmount::default(),
            account: AccountId::account(8),
            eth_addr: format!("0x{}", "ab".repeat(19)),
            value: 1,
            extensions: Extensions,
        };
        assert!(op.validate().is_err());
    }

    #[test]
    fn test_deposit_value_decimal() {
        let mut op = SidechainErc20DepositTokenOperation {
            fee: AssetAmount::default(),
            committee_member_id: AccountId::account(1),
            account: AccountId::account(8),
            erc20_token_addr: "cd".repeat(20),
            value: "1000000000000000000000".to_string(),
            transaction_hash: "ef".repeat(32),
            extensions: Extensions,
        };
        assert!(op.validate().is_ok());
        op.value = "1e21".to_string();
        assert!(op.validate().is_err());
    }
}
