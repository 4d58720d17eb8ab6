//! Connection-scoped subscription state

use echo_primitives::ChainId;

use crate::subscription::{
    AccountSubscriptionManager, BlockSubscriptionManager, BlockchainDataSubscriptionManager,
    TransactionResultSubscriptionManager,
};

/// Everything that lives exactly as long as one connection.
///
/// Replaced wholesale on disconnect, so no listener or cached id survives
/// into the next connection.
#[derive(Default)]
pub struct Session {
    /// Account update listeners and the name cache
    pub accounts: AccountSubscriptionManager,
    /// Head block listeners
    pub blocks: BlockSubscriptionManager,
    /// Raw object batch listeners
    pub blockchain_data: BlockchainDataSubscriptionManager,
    /// Broadcast result listeners
    pub transactions: TransactionResultSubscriptionManager,
    /// Callback id installed with `set_subscribe_callback`, if any
    pub subscribe_callback_id: Option<u64>,
    /// Chain id fetched on this connection
    pub chain_id: Option<ChainId>,
}

impl Session {
    /// Whether any object update listener is registered
    pub fn has_object_listeners(&self) -> bool {
        !self.accounts.is_empty() || !self.blocks.is_empty() || !self.blockchain_data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_primitives::AccountId;

    #[test]
    fn test_default_is_empty() {
        let session = Session::default();
        assert!(!session.has_object_listeners());
        assert!(session.subscribe_callback_id.is_none());
        assert!(session.transactions.is_empty());
    }

    #[test]
    fn test_has_object_listeners() {
        let mut session = Session::default();
        session.accounts.register(AccountId::account(1), |_| {});
        assert!(session.has_object_listeners());
        session.accounts.clear();
        session.blocks.register(|_| {});
        assert!(session.has_object_listeners());
    }
}
