//! Transaction assembly and signing

use bytes::{BufMut, BytesMut};
use echo_codec::{check_length, Encode, MAX_PREFIXED_LEN};
use echo_crypto::{sha256, CryptoProvider, SecretKeyBytes, Signature};
use echo_primitives::{AssetAmount, ChainId, H256};
use serde::{Deserialize, Serialize};

use crate::{format_chain_time, BlockData, Extensions, Operation, TypesError};

/// Most operations a transaction can carry (1-byte count)
pub const MAX_OPERATIONS: usize = MAX_PREFIXED_LEN;

/// An unsigned transaction under assembly.
///
/// The signing payload is only defined once every operation carries a
/// concrete fee, which [`Transaction::set_fees`] assigns. Adding an
/// operation afterwards requires fees to be set again.
#[derive(Debug, Clone)]
pub struct Transaction {
    block_data: BlockData,
    operations: Vec<Operation>,
    chain_id: ChainId,
    signing_keys: Vec<SecretKeyBytes>,
    extensions: Extensions,
    fees_set: bool,
}

impl Transaction {
    /// Create a transaction; `operations` must not be empty
    pub fn new(
        block_data: BlockData,
        operations: Vec<Operation>,
        chain_id: ChainId,
    ) -> Result<Self, TypesError> {
        if operations.is_empty() {
            return Err(TypesError::EmptyOperations);
        }
        check_length("operations", operations.len())?;
        Ok(Self {
            block_data,
            operations,
            chain_id,
            signing_keys: Vec::new(),
            extensions: Extensions,
            fees_set: false,
        })
    }

    /// Reference block data
    pub fn block_data(&self) -> &BlockData {
        &self.block_data
    }

    /// Replace the reference block data, e.g. after the head moved on
    pub fn set_block_data(&mut self, block_data: BlockData) {
        self.block_data = block_data;
    }

    /// Operations in order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Chain the transaction is bound to
    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    /// Number of attached signing keys
    pub fn signing_key_count(&self) -> usize {
        self.signing_keys.len()
    }

    /// Whether every operation has an assigned fee
    pub fn fees_set(&self) -> bool {
        self.fees_set
    }

    /// Append an operation; fees must be set again afterwards
    pub fn push_operation(&mut self, op: impl Into<Operation>) -> Result<(), TypesError> {
        if self.operations.len() >= MAX_OPERATIONS {
            return Err(TypesError::malformed(format!(
                "transaction already carries {MAX_OPERATIONS} operations"
            )));
        }
        self.operations.push(op.into());
        self.fees_set = false;
        Ok(())
    }

    /// Assign fees positionally, one per operation
    pub fn set_fees(&mut self, fees: &[AssetAmount]) -> Result<(), TypesError> {
        if fees.len() != self.operations.len() {
            return Err(TypesError::FeeCountMismatch {
                expected: self.operations.len(),
                got: fees.len(),
            });
        }
        for (op, fee) in self.operations.iter_mut().zip(fees) {
            op.set_fee(*fee);
        }
        self.fees_set = true;
        Ok(())
    }

    /// Attach a signing key; duplicates are kept
    pub fn add_signing_key(&mut self, key: SecretKeyBytes) {
        self.signing_keys.push(key);
    }

    fn ensure_ready(&self) -> Result<(), TypesError> {
        if !self.fees_set {
            return Err(TypesError::FeesNotSet);
        }
        for op in &self.operations {
            op.validate()?;
        }
        Ok(())
    }

    fn encode_body(&self, out: &mut BytesMut) {
        self.block_data.encode_to(out);
        out.put_u8(self.operations.len() as u8);
        for op in &self.operations {
            out.put_u8(op.kind().tag());
            op.encode_to(out);
        }
        self.extensions.encode_to(out);
    }

    /// `chain_id ++ block_data ++ count ++ (tag ++ op)* ++ extensions`
    pub fn signing_bytes(&self) -> Result<Vec<u8>, TypesError> {
        self.ensure_ready()?;
        let mut out = BytesMut::with_capacity(128);
        self.chain_id.encode_to(&mut out);
        self.encode_body(&mut out);
        Ok(out.to_vec())
    }

    /// SHA-256 of the signing payload
    pub fn digest(&self) -> Result<H256, TypesError> {
        Ok(sha256(&self.signing_bytes()?))
    }

    /// Transaction id: first 20 bytes of SHA-256 of the payload without
    /// the chain id, as hex
    pub fn id(&self) -> Result<String, TypesError> {
        self.ensure_ready()?;
        let mut out = BytesMut::with_capacity(128);
        self.encode_body(&mut out);
        let hash = sha256(&out);
        Ok(hex::encode(&hash.as_bytes()[..20]))
    }

    /// Sign with every attached key, in attachment order
    pub fn sign(&self, provider: &dyn CryptoProvider) -> Result<SignedTransaction, TypesError> {
        if self.signing_keys.is_empty() {
            return Err(TypesError::NoSigningKeys);
        }
        let payload = self.signing_bytes()?;
        let signatures = self
            .signing_keys
            .iter()
            .map(|key| provider.sign(&payload, key))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SignedTransaction {
            ref_block_num: self.block_data.ref_block_num,
            ref_block_prefix: self.block_data.ref_block_prefix,
            expiration: format_chain_time(self.block_data.relative_expiration),
            operations: self.operations.clone(),
            extensions: self.extensions,
            signatures,
        })
    }
}

/// Broadcast form of a signed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Reference block number (low 16 bits)
    pub ref_block_num: u16,
    /// Reference block prefix
    pub ref_block_prefix: u32,
    /// Expiration timestamp
    pub expiration: String,
    /// Operations as `[tag, body]` pairs
    pub operations: Vec<Operation>,
    /// Reserved
    #[serde(default)]
    pub extensions: Extensions,
    /// One compact signature per signing key
    pub signatures: Vec<Signature>,
}
