//! Common error types for primitives

use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Object id is not of the form `space.type.instance`
    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    /// Arithmetic between amounts of different assets
    #[error("incompatible operation: asset {left} does not match asset {right}")]
    IncompatibleAssets {
        /// Asset of the left operand
        left: String,
        /// Asset of the right operand
        right: String,
    },

    /// Invalid hex string
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Wrong byte length
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Public key text form could not be parsed
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
