//! Broadcast result subscriptions

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use super::Deliveries;
use crate::SdkError;

/// Single-shot listener for a broadcast result
pub type TransactionResultListener = Box<dyn FnOnce(Result<Value, SdkError>) + Send>;

/// Keyed by the callback id passed to `broadcast_transaction_with_callback`.
/// The first matching notice removes its listener.
#[derive(Default)]
pub struct TransactionResultSubscriptionManager {
    listeners: HashMap<u64, TransactionResultListener>,
}

impl TransactionResultSubscriptionManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the listener for `callback_id`, replacing any previous one
    pub fn register<F>(&mut self, callback_id: u64, listener: F)
    where
        F: FnOnce(Result<Value, SdkError>) + Send + 'static,
    {
        self.listeners.insert(callback_id, Box::new(listener));
    }

    /// Remove the listener without firing it
    pub fn unregister(&mut self, callback_id: u64) -> bool {
        self.listeners.remove(&callback_id).is_some()
    }

    /// Check if a listener waits on `callback_id`
    pub fn contains(&self, callback_id: u64) -> bool {
        self.listeners.contains_key(&callback_id)
    }

    /// Number of waiting listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Check if no listener waits
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Take the listener for `callback_id` and schedule it with the notice
    /// payload. The node wraps the confirmation in a one-element array.
    pub fn route(&mut self, callback_id: u64, payload: Value) -> Deliveries {
        let mut deliveries = Deliveries::default();
        match self.listeners.remove(&callback_id) {
            Some(listener) => {
                let result = match payload {
                    Value::Array(mut items) if items.len() == 1 => items.remove(0),
                    other => other,
                };
                deliveries.push(move || listener(Ok(result)));
            }
            None => debug!(callback_id, "notice without listener dropped"),
        }
        deliveries
    }

    /// Route and fire immediately
    pub fn notify(&mut self, callback_id: u64, payload: Value) -> usize {
        self.route(callback_id, payload).fire()
    }

    /// Remove every listener, scheduling each with
    /// [`SdkError::Disconnected`]
    pub fn fail_all(&mut self) -> Deliveries {
        let mut deliveries = Deliveries::default();
        for (_, listener) in self.listeners.drain() {
            deliveries.push(move || listener(Err(SdkError::Disconnected)));
        }
        deliveries
    }

    /// Drop every listener without firing
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_single_shot() {
        let mut manager = TransactionResultSubscriptionManager::new();
        let results = Arc::new(Mutex::new(Vec::new()));
        let sink = results.clone();
        manager.register(7, move |outcome| sink.lock().push(outcome));

        let confirmation = json!({"id": "abcd", "block_num": 12, "trx_num": 0});
        assert_eq!(manager.notify(7, json!([confirmation.clone()])), 1);
        assert_eq!(manager.notify(7, json!([confirmation.clone()])), 0);

        let results = results.lock();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap(), &confirmation);
    }

    #[test]
    fn test_unknown_callback_dropped() {
        let mut manager = TransactionResultSubscriptionManager::new();
        manager.register(1, |_| panic!("must not fire"));
        assert_eq!(manager.notify(2, json!([])), 0);
        assert!(manager.contains(1));
    }

    #[test]
    fn test_fail_all() {
        let mut manager = TransactionResultSubscriptionManager::new();
        let failures = Arc::new(Mutex::new(0));
        for id in 0..3 {
            let failures = failures.clone();
            manager.register(id, move |outcome| {
                assert!(matches!(outcome, Err(SdkError::Disconnected)));
                *failures.lock() += 1;
            });
        }
        assert_eq!(manager.fail_all().fire(), 3);
        assert_eq!(*failures.lock(), 3);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_clear_drops_silently() {
        let mut manager = TransactionResultSubscriptionManager::new();
        manager.register(1, |_| panic!("must not fire"));
        manager.clear();
        assert_eq!(manager.notify(1, json!([{}])), 0);
    }
}
