//! Transaction builder

use echo_crypto::SecretKeyBytes;
use echo_primitives::{AssetAmount, ChainId};

use crate::{BlockData, DynamicGlobalProperties, Operation, Transaction, TypesError, DEFAULT_EXPIRATION_WINDOW_SECS};

/// Transaction builder with fluent API
#[derive(Debug, Clone)]
pub struct TxBuilder {
    chain_id: Option<ChainId>,
    block_data: Option<BlockData>,
    head: Option<DynamicGlobalProperties>,
    expiration_window_secs: u32,
    operations: Vec<Operation>,
    fees: Option<Vec<AssetAmount>>,
    signing_keys: Vec<SecretKeyBytes>,
}

impl Default for TxBuilder {
    fn default() -> Self {
        Self {
            chain_id: None,
            block_data: None,
            head: None,
            expiration_window_secs: DEFAULT_EXPIRATION_WINDOW_SECS,
            operations: Vec::new(),
            fees: None,
            signing_keys: Vec::new(),
        }
    }
}

impl TxBuilder {
    /// Create a new transaction builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chain id
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Use explicit reference block data
    pub fn block_data(mut self, block_data: BlockData) -> Self {
        self.block_data = Some(block_data);
        self
    }

    /// Derive reference block data from the chain head at build time
    pub fn head(mut self, props: DynamicGlobalProperties) -> Self {
        self.head = Some(props);
        self
    }

    /// Seconds between head block time and expiration
    pub fn expiration_window(mut self, secs: u32) -> Self {
        self.expiration_window_secs = secs;
        self
    }

    /// Append an operation
    pub fn operation(mut self, op: impl Into<Operation>) -> Self {
        self.operations.push(op.into());
        self
    }

    /// Fees, one per operation in order
    pub fn fees(mut self, fees: Vec<AssetAmount>) -> Self {
        self.fees = Some(fees);
        self
    }

    /// Attach a signing key
    pub fn signing_key(mut self, key: SecretKeyBytes) -> Self {
        self.signing_keys.push(key);
        self
    }

    /// Build the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The chain id or reference block source is missing
    /// - There are no operations
    /// - Fees were supplied with the wrong count
    pub fn build(self) -> Result<Transaction, TypesError> {
        let chain_id = self
            .chain_id
            .ok_or_else(|| TypesError::MissingField("chain_id".to_string()))?;
        let block_data = match (self.block_data, &self.head) {
            (Some(data), _) => data,
            (None, Some(props)) => BlockData::from_properties(props, self.expiration_window_secs)?,
            (None, None) => return Err(TypesError::MissingField("block_data".to_string())),
        };

        let mut tx = Transaction::new(block_data, self.operations, chain_id)?;
        if let Some(fees) = &self.fees {
            tx.set_fees(fees)?;
        }
        for key in self.signing_keys {
            tx.add_signing_key(key);
        }
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::TransferOperation;
    use echo_primitives::{AccountId, ObjectId};

    fn props() -> DynamicGlobalProperties {
        DynamicGlobalProperties {
            id: ObjectId::DYNAMIC_GLOBAL_PROPERTIES,
            head_block_number: 70000,
            head_block_id: "00011170a1b2c3d4e5f60718293a4b5c6d7e8f90".to_string(),
            time: "2019-01-01T00:00:00".to_string(),
            next_maintenance_time: None,
            last_irreversible_block_num: 0,
        }
    }

    fn transfer() -> TransferOperation {
        TransferOperation::new(AccountId::account(1), AccountId::account(2), AssetAmount::core(3))
    }

    #[test]
    fn test_missing_chain_id() {
        let err = TxBuilder::new().head(props()).operation(transfer()).build().unwrap_err();
        assert_eq!(err, TypesError::MissingField("chain_id".to_string()));
    }

    #[test]
    fn test_missing_block_source() {
        let err = TxBuilder::new()
            .chain_id(ChainId::ZERO)
            .operation(transfer())
            .build()
            .unwrap_err();
        assert_eq!(err, TypesError::MissingField("block_data".to_string()));
    }

    #[test]
    fn test_block_data_from_head_and_window() {
        let tx = TxBuilder::new()
            .chain_id(ChainId::ZERO)
            .head(props())
            .expiration_window(60)
            .operation(transfer())
            .fees(vec![AssetAmount::core(20)])
            .build()
            .unwrap();
        assert_eq!(tx.block_data().ref_block_num, 4464);
        assert_eq!(tx.block_data().ref_block_prefix, 0xd4c3b2a1);
        assert_eq!(tx.block_data().relative_expiration, 1_546_300_860);
        assert!(tx.fees_set());
        assert_eq!(tx.operations()[0].fee(), &AssetAmount::core(20));
    }

    #[test]
    fn test_fee_count_checked() {
        let err = TxBuilder::new()
            .chain_id(ChainId::ZERO)
            .block_data(BlockData::default())
            .operation(transfer())
            .fees(vec![])
            .build()
            .unwrap_err();
        assert_eq!(err, TypesError::FeeCountMismatch { expected: 1, got: 0 });
    }
}
