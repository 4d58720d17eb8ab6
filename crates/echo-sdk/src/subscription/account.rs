//! Account update subscriptions

use echo_primitives::{AccountId, ObjectId};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::{updated_objects, Deliveries, SubscriptionId, Topic};

/// An updated object belonging to a subscribed account
#[derive(Debug, Clone, PartialEq)]
pub struct AccountEvent {
    /// Account the object belongs to
    pub account: AccountId,
    /// The object as pushed by the node
    pub object: Value,
}

/// Account listener
pub type AccountListener = Arc<dyn Fn(&AccountEvent) + Send + Sync>;

/// Routes object updates to listeners of the owning account.
///
/// Notices carry only object ids, while callers often subscribe by name;
/// the name cache is filled on the first successful lookup.
#[derive(Default)]
pub struct AccountSubscriptionManager {
    listeners: BTreeMap<AccountId, Vec<(SubscriptionId, AccountListener)>>,
    names: HashMap<String, AccountId>,
}

impl AccountSubscriptionManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener for `account`
    pub fn register<F>(&mut self, account: AccountId, listener: F) -> SubscriptionId
    where
        F: Fn(&AccountEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::next(Topic::Account);
        self.listeners
            .entry(account)
            .or_default()
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove one listener
    pub fn unregister(&mut self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.listeners.retain(|_, entries| {
            let before = entries.len();
            entries.retain(|(entry_id, _)| *entry_id != id);
            removed |= entries.len() != before;
            !entries.is_empty()
        });
        removed
    }

    /// Remove every listener of `account`; returns how many were removed
    pub fn unregister_account(&mut self, account: &AccountId) -> usize {
        self.listeners.remove(account).map_or(0, |entries| entries.len())
    }

    /// Accounts with at least one listener
    pub fn accounts(&self) -> Vec<AccountId> {
        self.listeners.keys().copied().collect()
    }

    /// Total number of listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Check if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Remember the id of an account name
    pub fn cache_name(&mut self, name: impl Into<String>, account: AccountId) {
        self.names.insert(name.into(), account);
    }

    /// Cached id of an account name
    pub fn resolve_name(&self, name: &str) -> Option<AccountId> {
        self.names.get(name).copied()
    }

    /// Collect listener invocations for the objects in a notice payload
    pub fn route(&self, payload: &Value) -> Deliveries {
        let mut deliveries = Deliveries::default();
        for object in updated_objects(payload) {
            let Some(account) = account_key(object) else {
                continue;
            };
            let Some(entries) = self.listeners.get(&account) else {
                continue;
            };
            let event = Arc::new(AccountEvent {
                account,
                object: object.clone(),
            });
            for (_, listener) in entries {
                let listener = listener.clone();
                let event = event.clone();
                deliveries.push(move || listener(&event));
            }
        }
        deliveries
    }

    /// Route and fire immediately; returns how many listeners ran
    pub fn notify(&self, payload: &Value) -> usize {
        self.route(payload).fire()
    }

    /// Drop every listener and cached name
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.names.clear();
    }
}

/// The account an object belongs to: the object itself when it is an
/// account, otherwise its `owner` (balances, statistics)
fn account_key(object: &Value) -> Option<AccountId> {
    let parse = |field: &str| {
        object
            .get(field)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<ObjectId>().ok())
            .filter(ObjectId::is_account)
    };
    parse("id").or_else(|| parse("owner"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    fn recorder() -> (Arc<Mutex<Vec<AccountEvent>>>, impl Fn(&AccountEvent) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |event: &AccountEvent| sink.lock().push(event.clone()))
    }

    #[test]
    fn test_account_key() {
        assert_eq!(account_key(&json!({"id": "1.2.5"})), Some(AccountId::account(5)));
        assert_eq!(
            account_key(&json!({"id": "2.6.5", "owner": "1.2.5"})),
            Some(AccountId::account(5))
        );
        assert_eq!(account_key(&json!({"id": "1.3.0", "issuer": "1.2.5"})), None);
        assert_eq!(account_key(&json!({"id": "garbage"})), None);
    }

    #[test]
    fn test_each_listener_once() {
        let mut manager = AccountSubscriptionManager::new();
        let (seen_a, a) = recorder();
        let (seen_b, b) = recorder();
        manager.register(AccountId::account(100), a);
        manager.register(AccountId::account(100), b);

        let fired = manager.notify(&json!([[{"id": "1.2.100", "name": "alice"}]]));
        assert_eq!(fired, 2);
        assert_eq!(seen_a.lock().len(), 1);
        assert_eq!(seen_b.lock().len(), 1);
        assert_eq!(seen_a.lock()[0].account, AccountId::account(100));
    }

    #[test]
    fn test_other_accounts_filtered() {
        let mut manager = AccountSubscriptionManager::new();
        let (seen, listener) = recorder();
        manager.register(AccountId::account(1), listener);
        assert_eq!(manager.notify(&json!([[{"id": "1.2.2"}, {"id": "2.5.9", "owner": "1.2.3"}]])), 0);
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_clear_then_notify() {
        let mut manager = AccountSubscriptionManager::new();
        let (seen, listener) = recorder();
        manager.register(AccountId::account(1), listener);
        manager.cache_name("alice", AccountId::account(1));
        manager.clear();
        assert_eq!(manager.notify(&json!([[{"id": "1.2.1"}]])), 0);
        assert!(seen.lock().is_empty());
        assert!(manager.is_empty());
        assert_eq!(manager.resolve_name("alice"), None);
    }

    #[test]
    fn test_unregister() {
        let mut manager = AccountSubscriptionManager::new();
        let (_, a) = recorder();
        let (_, b) = recorder();
        let id_a = manager.register(AccountId::account(1), a);
        manager.register(AccountId::account(2), b);
        assert!(manager.unregister(id_a));
        assert!(!manager.unregister(id_a));
        assert_eq!(manager.accounts(), vec![AccountId::account(2)]);
        assert_eq!(manager.unregister_account(&AccountId::account(2)), 1);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_name_cache() {
        let mut manager = AccountSubscriptionManager::new();
        assert_eq!(manager.resolve_name("bob"), None);
        manager.cache_name("bob", AccountId::account(12));
        assert_eq!(manager.resolve_name("bob"), Some(AccountId::account(12)));
    }
}
