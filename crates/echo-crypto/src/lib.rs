//! # echo-crypto
//!
//! Cryptographic collaborator for the Echo SDK.
//!
//! The transaction assembler never touches curve math directly; it asks a
//! [`CryptoProvider`] to sign payloads, derive public keys and decode WIF
//! private keys. [`Secp256k1Provider`] is the default implementation.
//!
//! - SHA-256 digests of signing payloads
//! - Recoverable ECDSA (secp256k1) with low-s normalization
//! - 65-byte compact signatures
//! - WIF (base58check) private key decoding

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod keys;
mod provider;
mod signature;

pub use error::CryptoError;
pub use hash::sha256;
pub use keys::{decode_wif, encode_wif, SecretKeyBytes};
pub use provider::{CryptoProvider, Secp256k1Provider};
pub use signature::{derive_public_key, sign, verify, Signature};
