//! RPC call layer.
//!
//! A [`SocketOperation`] describes one outbound call: which API it targets,
//! the method name, its parameters and how to decode the `result`. The
//! [`Dispatcher`] owns the socket, assigns call ids and completes each call
//! exactly once.

mod api;
mod dispatcher;
mod envelope;
pub mod operations;

use serde_json::Value;

pub use api::{Api, ApiRegistry};
pub use dispatcher::Dispatcher;
pub use envelope::{encode_request, parse_inbound, Inbound, Notice};

use crate::SdkError;

/// One outbound call and the decoding of its response
pub trait SocketOperation: Send + 'static {
    /// Decoded result type
    type Output: Send + 'static;

    /// API the method lives on
    fn api(&self) -> Api;

    /// Method name
    fn method(&self) -> &'static str;

    /// Arguments as a JSON array; must be pure
    fn params(&self) -> Value;

    /// Decode the `result` member; `null` is passed through
    fn decode(&self, result: Value) -> Result<Self::Output, SdkError>;
}

/// Lifecycle of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallState {
    /// Registered but not yet written to the socket
    Created,
    /// Written, awaiting a response
    Sent,
    /// Result decoded and delivered
    Resolved,
    /// Error delivered (node error, decode failure, transport loss)
    Failed,
}

impl CallState {
    /// State reached after delivering `outcome`
    pub fn after<T>(outcome: &Result<T, SdkError>) -> Self {
        match outcome {
            Ok(_) => CallState::Resolved,
            Err(_) => CallState::Failed,
        }
    }

    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, CallState::Resolved | CallState::Failed)
    }
}
