//! Model error types

use echo_codec::CodecError;
use echo_crypto::CryptoError;
use echo_primitives::PrimitiveError;
use thiserror::Error;

/// Errors raised while building, encoding or signing operations and transactions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypesError {
    /// Caller-built operation is missing or violates a mandatory field
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Transaction has no operations
    #[error("transaction has no operations")]
    EmptyOperations,

    /// Fee list length does not match the operation list
    #[error("fee count mismatch: expected {expected}, got {got}")]
    FeeCountMismatch {
        /// Number of operations
        expected: usize,
        /// Number of fees supplied
        got: usize,
    },

    /// Signing payload requested before fees were assigned
    #[error("fees have not been set on every operation")]
    FeesNotSet,

    /// Builder is missing a required field
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Transaction has no signing keys
    #[error("transaction has no signing keys")]
    NoSigningKeys,

    /// JSON operation tag is not a known kind
    #[error("unknown operation tag: {0}")]
    UnknownOperation(u64),

    /// JSON payload did not match the expected shape
    #[error("invalid json: {0}")]
    Json(String),

    /// Chain timestamp could not be parsed
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Head block id could not yield a reference prefix
    #[error("invalid block id: {0}")]
    InvalidBlockId(String),

    /// Codec error
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Primitive error
    #[error("primitive error: {0}")]
    Primitive(#[from] PrimitiveError),

    /// Crypto error
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl From<serde_json::Error> for TypesError {
    fn from(e: serde_json::Error) -> Self {
        TypesError::Json(e.to_string())
    }
}

impl TypesError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        TypesError::MalformedInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_fee_mismatch() {
        let err = TypesError::FeeCountMismatch { expected: 2, got: 1 };
        assert_eq!(err.to_string(), "fee count mismatch: expected 2, got 1");
    }

    #[test]
    fn test_from_codec_error() {
        let err: TypesError = CodecError::LengthOverflow { what: "name", len: 300 }.into();
        assert!(matches!(err, TypesError::Codec(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        assert!(matches!(TypesError::from(json_err), TypesError::Json(_)));
    }
}
