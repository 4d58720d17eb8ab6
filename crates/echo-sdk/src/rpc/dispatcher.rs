//! Call correlation over the shared socket

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::{encode_request, parse_inbound, Api, ApiRegistry, CallState, Inbound, Notice, SocketOperation};
use crate::transport::Transport;
use crate::SdkError;

type Completion = Box<dyn FnOnce(Result<Value, SdkError>) + Send>;

struct PendingCall {
    method: &'static str,
    state: CallState,
    complete: Completion,
}

/// Owns the socket's outbound half and every in-flight call.
///
/// Each submitted call completes exactly once: with its decoded result, a
/// node error, a decode failure, a send failure, cancellation, or
/// [`SdkError::Disconnected`] when the socket closes. Completions run
/// outside the pending-table lock.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingCall>>,
    apis: RwLock<ApiRegistry>,
    call_timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher writing to `transport`
    pub fn new(transport: Arc<dyn Transport>, call_timeout: Duration) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            apis: RwLock::new(ApiRegistry::default()),
            call_timeout,
        }
    }

    /// Allocate an id from the call id sequence (also used for callback ids)
    pub fn next_call_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Bound applied by [`Dispatcher::call`]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Record an API id assigned by the node
    pub fn register_api(&self, api: Api, id: u64) {
        self.apis.write().register(api, id);
    }

    /// Id of `api` on the current connection
    pub fn api_id(&self, api: Api) -> Result<u64, SdkError> {
        self.apis.read().id(api)
    }

    /// Number of calls awaiting a response
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// State of an in-flight call; `None` once it has completed
    pub fn call_state(&self, call_id: u64) -> Option<CallState> {
        self.pending.lock().get(&call_id).map(|call| call.state)
    }

    /// Send `op` and invoke `callback` with its outcome. Returns the call id
    /// immediately; the callback may already have run if sending failed.
    pub fn submit<Op, F>(&self, op: Op, callback: F) -> u64
    where
        Op: SocketOperation,
        F: FnOnce(Result<Op::Output, SdkError>) + Send + 'static,
    {
        let call_id = self.next_call_id();
        let method = op.method();

        let api_id = match self.api_id(op.api()) {
            Ok(id) => id,
            Err(e) => {
                warn!(call_id, method, error = %e, "call rejected before sending");
                callback(Err(e));
                return call_id;
            }
        };

        let frame = encode_request(call_id, api_id, method, op.params());
        let complete: Completion = Box::new(move |outcome| {
            callback(outcome.and_then(|result| op.decode(result)));
        });

        self.pending.lock().insert(
            call_id,
            PendingCall {
                method,
                state: CallState::Created,
                complete,
            },
        );

        match self.transport.send(frame) {
            Ok(()) => {
                if let Some(call) = self.pending.lock().get_mut(&call_id) {
                    call.state = CallState::Sent;
                }
                debug!(call_id, method, api_id, "call sent");
            }
            Err(e) => {
                warn!(call_id, method, error = %e, "send failed");
                self.complete(call_id, Err(e));
            }
        }
        call_id
    }

    /// Send `op` and wait for its outcome, bounded by the call timeout.
    ///
    /// On timeout the call is cancelled, so nothing stays pending.
    pub async fn call<Op: SocketOperation>(&self, op: Op) -> Result<Op::Output, SdkError> {
        let (tx, rx) = oneshot::channel();
        let call_id = self.submit(op, move |outcome| {
            let _ = tx.send(outcome);
        });

        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(SdkError::Disconnected),
            Err(_) => {
                self.cancel(call_id);
                let ms = self.call_timeout.as_millis() as u64;
                warn!(call_id, timeout_ms = ms, "call timed out");
                Err(SdkError::Timeout(ms))
            }
        }
    }

    /// Fail an in-flight call with [`SdkError::Cancelled`]. Returns whether
    /// the call was still pending.
    pub fn cancel(&self, call_id: u64) -> bool {
        self.complete(call_id, Err(SdkError::Cancelled))
    }

    fn complete(&self, call_id: u64, outcome: Result<Value, SdkError>) -> bool {
        let call = self.pending.lock().remove(&call_id);
        match call {
            Some(call) => {
                let state = CallState::after(&outcome);
                debug!(call_id, method = call.method, ?state, "call completed");
                (call.complete)(outcome);
                true
            }
            None => false,
        }
    }

    /// Handle one inbound frame. Responses complete their call; notices are
    /// handed back for routing. A malformed frame carrying a call id fails
    /// that call; other malformed frames are logged and dropped.
    pub fn handle_message(&self, text: &str) -> Option<Notice> {
        match parse_inbound(text) {
            Ok(Inbound::Response { id, outcome }) => {
                if !self.complete(id, outcome) {
                    debug!(call_id = id, "response for unknown call dropped");
                }
                None
            }
            Ok(Inbound::Notice(notice)) => Some(notice),
            Err(e) => {
                warn!(error = %e, "malformed inbound frame dropped");
                None
            }
        }
    }

    /// Fail every pending call with [`SdkError::Disconnected`] and forget
    /// the connection's API ids
    pub fn handle_close(&self, reason: &str) {
        let drained: Vec<(u64, PendingCall)> = self.pending.lock().drain().collect();
        self.apis.write().clear();
        info!(pending = drained.len(), reason, "socket closed, failing pending calls");
        for (call_id, call) in drained {
            debug!(call_id, method = call.method, "call orphaned by disconnect");
            (call.complete)(Err(SdkError::Disconnected));
        }
    }
}
