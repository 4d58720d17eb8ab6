//! Smart contract operations

use bytes::BytesMut;
use echo_codec::{encode_optional, Encode, Presence};
use echo_primitives::{AccountId, AssetAmount, AssetId, ContractId, ObjectId};
use serde::{Deserialize, Serialize};

use super::{ensure_hex, ensure_positive, operation_body, Validate};
use crate::{Extensions, TypesError};

fn ensure_contract(what: &str, id: &ContractId) -> Result<(), TypesError> {
    if !id.is_contract() {
        return Err(TypesError::malformed(format!("{what} {id} is not a contract id")));
    }
    Ok(())
}

/// Deploy a contract from hex bytecode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCreateOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Deploying account
    pub registrar: AccountId,
    /// Value sent to the constructor
    pub value: AssetAmount,
    /// Hex bytecode plus constructor arguments
    pub code: String,
    /// Use 18-decimal ETH accuracy for the core asset
    #[serde(default)]
    pub eth_accuracy: bool,
    /// Asset the contract accepts, when restricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_asset_id: Option<AssetId>,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for ContractCreateOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.registrar.encode_to(out);
        self.value.encode_to(out);
        self.code.encode_to(out);
        self.eth_accuracy.encode_to(out);
        encode_optional(out, self.supported_asset_id.as_ref(), Presence::Bare);
        self.extensions.encode_to(out);
    }
}

impl Validate for ContractCreateOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_hex("code", &self.code)
    }
}

operation_body!(ContractCreateOperation => ContractCreate);

/// Call a deployed contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCallOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Calling account
    pub registrar: AccountId,
    /// Value sent with the call
    pub value: AssetAmount,
    /// Hex call data
    pub code: String,
    /// Called contract
    pub callee: ContractId,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for ContractCallOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.registrar.encode_to(out);
        self.value.encode_to(out);
        self.code.encode_to(out);
        self.callee.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for ContractCallOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_hex("code", &self.code)?;
        ensure_contract("callee", &self.callee)
    }
}

operation_body!(ContractCallOperation => ContractCall);

/// Value moved out of a contract during execution (virtual)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTransferOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Sending contract
    pub from: ContractId,
    /// Receiving account or contract
    pub to: ObjectId,
    /// Amount moved
    pub amount: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for ContractTransferOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.from.encode_to(out);
        self.to.encode_to(out);
        self.amount.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for ContractTransferOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_contract("from", &self.from)
    }
}

operation_body!(ContractTransferOperation => ContractTransfer);

/// Hand a contract to a new owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractUpdateOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Current owner
    pub sender: AccountId,
    /// Contract being changed
    pub contract: ContractId,
    /// New owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_owner: Option<AccountId>,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for ContractUpdateOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.sender.encode_to(out);
        self.contract.encode_to(out);
        encode_optional(out, self.new_owner.as_ref(), Presence::Flagged);
        self.extensions.encode_to(out);
    }
}

impl Validate for ContractUpdateOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_contract("contract", &self.contract)?;
        if self.new_owner.is_none() {
            return Err(TypesError::malformed("contract update sets no new owner"));
        }
        Ok(())
    }
}

operation_body!(ContractUpdateOperation => ContractUpdate);

/// Fund the pool paying a contract's callers' fees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFundPoolOperation {
    /// Fee, zero until assigned
    #[serde(default)]
    pub fee: AssetAmount,
    /// Funding account
    pub sender: AccountId,
    /// Funded contract
    pub contract: ContractId,
    /// Amount added
    pub value: AssetAmount,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
}

impl Encode for ContractFundPoolOperation {
    fn encode_to(&self, out: &mut BytesMut) {
        self.fee.encode_to(out);
        self.sender.encode_to(out);
        self.contract.encode_to(out);
        self.value.encode_to(out);
        self.extensions.encode_to(out);
    }
}

impl Validate for ContractFundPoolOperation {
    fn validate(&self) -> Result<(), TypesError> {
        ensure_contract("contract", &self.contract)?;
        ensure_positive("value", &self.value)
    }
}

operation_body!(ContractFundPoolOperation => ContractFundPool);
