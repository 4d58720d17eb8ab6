//! Raw object update subscriptions

use serde_json::Value;
use std::sync::Arc;

use super::block::find_head_object;
use super::{updated_objects, Deliveries, SubscriptionId, Topic};

/// Listener for a batch of updated objects
pub type BlockchainDataListener = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Hands every batch that touches `2.1.0` (one per applied block) to all
/// listeners, unfiltered
#[derive(Default)]
pub struct BlockchainDataSubscriptionManager {
    listeners: Vec<(SubscriptionId, BlockchainDataListener)>,
}

impl BlockchainDataSubscriptionManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener
    pub fn register<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next(Topic::BlockchainData);
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener
    pub fn unregister(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(entry_id, _)| *entry_id != id);
        self.listeners.len() != before
    }

    /// Check if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Collect invocations for a notice payload
    pub fn route(&self, payload: &Value) -> Deliveries {
        let mut deliveries = Deliveries::default();
        if self.listeners.is_empty() || find_head_object(payload).is_none() {
            return deliveries;
        }
        let batch: Arc<Vec<Value>> =
            Arc::new(updated_objects(payload).into_iter().cloned().collect());
        for (_, listener) in &self.listeners {
            let listener = listener.clone();
            let batch = batch.clone();
            deliveries.push(move || listener(&batch));
        }
        deliveries
    }

    /// Route and fire immediately
    pub fn notify(&self, payload: &Value) -> usize {
        self.route(payload).fire()
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_whole_batch_delivered() {
        let mut manager = BlockchainDataSubscriptionManager::new();
        let size = Arc::new(AtomicUsize::new(0));
        let seen = size.clone();
        manager.register(move |batch| seen.store(batch.len(), Ordering::SeqCst));

        let payload = json!([[{"id": "2.1.0"}, {"id": "1.2.7"}, "1.11.3"]]);
        assert_eq!(manager.notify(&payload), 1);
        assert_eq!(size.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_batch_without_head_ignored() {
        let mut manager = BlockchainDataSubscriptionManager::new();
        manager.register(|_| panic!("must not fire"));
        assert_eq!(manager.notify(&json!([[{"id": "1.2.7"}]])), 0);
    }

    #[test]
    fn test_clear() {
        let mut manager = BlockchainDataSubscriptionManager::new();
        let id = manager.register(|_| {});
        manager.clear();
        assert!(!manager.unregister(id));
        assert_eq!(manager.notify(&json!([[{"id": "2.1.0"}]])), 0);
    }
}
