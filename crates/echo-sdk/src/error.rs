//! SDK error types

use echo_crypto::CryptoError;
use echo_primitives::PrimitiveError;
use echo_types::TypesError;
use serde_json::Value;
use thiserror::Error;

/// SDK error type
#[derive(Debug, Clone, Error)]
pub enum SdkError {
    /// Caller-built input rejected before reaching the wire
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Response or notice did not match the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Transport failed to deliver a frame
    #[error("Transport error: {0}")]
    Transport(String),

    /// Socket closed before the call completed
    #[error("Disconnected")]
    Disconnected,

    /// No response within the configured bound
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// Call was cancelled before a response arrived
    #[error("Call cancelled")]
    Cancelled,

    /// Structured error returned by the node, carried verbatim
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
        /// Node-specific detail
        data: Option<Value>,
    },

    /// Node rejected the login credentials
    #[error("Login rejected")]
    LoginFailed,

    /// API has not been accessed on this connection
    #[error("API not available: {0}")]
    ApiUnavailable(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Model error
    #[error(transparent)]
    Types(#[from] TypesError),

    /// Crypto error
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Primitive parse error
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Decode(e.to_string())
    }
}

impl SdkError {
    /// Whether the error came from the connection rather than the request
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SdkError::Transport(_) | SdkError::Disconnected | SdkError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_display_keeps_message() {
        let err = SdkError::Rpc {
            code: 1,
            message: "Assert Exception: insufficient fee".to_string(),
            data: None,
        };
        assert_eq!(err.to_string(), "RPC error: 1 - Assert Exception: insufficient fee");
    }

    #[test]
    fn test_is_transport() {
        assert!(SdkError::Disconnected.is_transport());
        assert!(SdkError::Timeout(10).is_transport());
        assert!(!SdkError::Decode("x".into()).is_transport());
    }

    #[test]
    fn test_from_types_error() {
        let err: SdkError = TypesError::FeesNotSet.into();
        assert_eq!(err.to_string(), "fees have not been set on every operation");
    }
}
