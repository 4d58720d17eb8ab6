//! Subscription managers.
//!
//! Each manager maps a key to its listeners and turns a notice payload into
//! [`Deliveries`]. Routing happens under the caller's lock; the returned
//! deliveries are fired after the lock is released, so listeners may call
//! back into the client. `clear` drops every listener.

mod account;
mod block;
mod blockchain_data;
mod transaction_result;

use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

pub use account::{AccountEvent, AccountListener, AccountSubscriptionManager};
pub use block::{BlockListener, BlockSubscriptionManager};
pub use blockchain_data::{BlockchainDataListener, BlockchainDataSubscriptionManager};
pub use transaction_result::{TransactionResultListener, TransactionResultSubscriptionManager};

/// Manager a subscription belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Account object updates
    Account,
    /// New head blocks
    Block,
    /// Raw object update batches
    BlockchainData,
}

static SUBSCRIPTION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Handle returned by `register`, used to unregister.
///
/// Ids are unique for the life of the process, so a handle kept across a
/// reconnect never matches a listener registered on the new connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    topic: Topic,
    seq: u64,
}

impl SubscriptionId {
    pub(crate) fn next(topic: Topic) -> Self {
        Self {
            topic,
            seq: SUBSCRIPTION_SEQ.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Manager the subscription belongs to
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

/// Listener invocations ready to run
#[must_use = "deliveries do nothing until fired"]
#[derive(Default)]
pub struct Deliveries(Vec<Box<dyn FnOnce() + Send>>);

impl Deliveries {
    pub(crate) fn push(&mut self, delivery: impl FnOnce() + Send + 'static) {
        self.0.push(Box::new(delivery));
    }

    /// Append another batch
    pub fn extend(&mut self, other: Deliveries) {
        self.0.extend(other.0);
    }

    /// Number of pending invocations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if nothing would fire
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Invoke every listener; returns how many ran
    pub fn fire(self) -> usize {
        let count = self.0.len();
        for delivery in self.0 {
            delivery();
        }
        count
    }
}

impl fmt::Debug for Deliveries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deliveries({})", self.0.len())
    }
}

/// Updated objects of a subscribe-callback notice.
///
/// Payloads are `[[object_or_removed_id, ...], ...]`; removed ids (plain
/// strings) are skipped.
pub(crate) fn updated_objects(payload: &Value) -> Vec<&Value> {
    let mut objects = Vec::new();
    let batches = match payload.as_array() {
        Some(batches) => batches,
        None => return objects,
    };
    for entry in batches {
        match entry {
            Value::Array(items) => objects.extend(items.iter().filter(|item| item.is_object())),
            Value::Object(_) => objects.push(entry),
            _ => {}
        }
    }
    objects
}
