//! New block subscriptions

use echo_primitives::ObjectId;
use echo_types::DynamicGlobalProperties;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::{updated_objects, Deliveries, SubscriptionId, Topic};

/// Block listener, called with the new head state
pub type BlockListener = Arc<dyn Fn(&DynamicGlobalProperties) + Send + Sync>;

/// Fans every update of `2.1.0` out to all listeners
#[derive(Default)]
pub struct BlockSubscriptionManager {
    listeners: Vec<(SubscriptionId, BlockListener)>,
}

impl BlockSubscriptionManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener
    pub fn register<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&DynamicGlobalProperties) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next(Topic::Block);
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

    /// Collect invocations for a notice payload. A malformed head object is
    /// logged and skipped.
    pub fn route(&self, payload: &Value) -> Deliveries {
        let mut deliveries = Deliveries::default();
        if self.listeners.is_empty() {
            return deliveries;
        }
        let Some(object) = find_head_object(payload) else {
            return deliveries;
        };
        let props: DynamicGlobalProperties = match serde_json::from_value(object.clone()) {
            Ok(props) => props,
            Err(e) => {
                warn!(error = %e, "undecodable head object in notice");
                return deliveries;
            }
        };
        let props = Arc::new(props);
        for (_, listener) in &self.listeners {
            let listener = listener.clone();
            let props = props.clone();
            deliveries.push(move || listener(&props));
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

pub(crate) fn find_head_object(payload: &Value) -> Option<&Value> {
    let head = ObjectId::DYNAMIC_GLOBAL_PROPERTIES.to_string();
    updated_objects(payload)
        .into_iter()
        .find(|object| object.get("id").and_then(Value::as_str) == Some(head.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn head(number: u64) -> Value {
        json!({
            "id": "2.1.0",
            "head_block_number": number,
            "head_block_id": "00011170a1b2c3d4e5f60718293a4b5c6d7e8f90",
            "time": "2019-01-01T00:00:00"
        })
    }

    #[test]
    fn test_fans_out_head() {
        let mut manager = BlockSubscriptionManager::new();
        let last = Arc::new(AtomicU64::new(0));
        for _ in 0..2 {
            let last = last.clone();
            manager.register(move |props| last.store(props.head_block_number, Ordering::SeqCst));
        }
        assert_eq!(manager.notify(&json!([[{"id": "1.2.5"}, head(70000)]])), 2);
        assert_eq!(last.load(Ordering::SeqCst), 70000);
    }

    #[test]
    fn test_ignores_other_objects() {
        let mut manager = BlockSubscriptionManager::new();
        manager.register(|_| panic!("must not fire"));
        assert_eq!(manager.notify(&json!([[{"id": "1.2.5"}]])), 0);
    }

    #[test]
    fn test_malformed_head_fails_soft() {
        let mut manager = BlockSubscriptionManager::new();
        manager.register(|_| panic!("must not fire"));
        assert_eq!(manager.notify(&json!([[{"id": "2.1.0", "time": 5}]])), 0);
    }

    #[test]
    fn test_unregister_and_clear() {
        let mut manager = BlockSubscriptionManager::new();
        let a = manager.register(|_| {});
        manager.register(|_| {});
        assert!(manager.unregister(a));
        assert_eq!(manager.listener_count(), 1);
        manager.clear();
        assert!(manager.is_empty());
        assert_eq!(manager.notify(&json!([[head(1)]])), 0);
    }
}
