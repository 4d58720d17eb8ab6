//! The crypto collaborator interface

use echo_primitives::PublicKey;

use crate::{decode_wif, derive_public_key, sign, CryptoError, SecretKeyBytes, Signature};

/// Key and signing operations the SDK delegates to.
///
/// Implementations may wrap hardware wallets or remote signers; the SDK
/// only ever hands them the raw signing payload.
pub trait CryptoProvider: Send + Sync {
    /// Sign a transaction signing payload
    fn sign(&self, payload: &[u8], key: &SecretKeyBytes) -> Result<Signature, CryptoError>;

    /// Derive the public key for a private key
    fn derive_public_key(&self, key: &SecretKeyBytes) -> Result<PublicKey, CryptoError>;

    /// Decode a WIF private key
    fn decode_from_wif(&self, wif: &str) -> Result<SecretKeyBytes, CryptoError>;
}

/// In-process secp256k1 provider
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Provider;

impl CryptoProvider for Secp256k1Provider {
    fn sign(&self, payload: &[u8], key: &SecretKeyBytes) -> Result<Signature, CryptoError> {
        sign(payload, key)
    }

    fn derive_public_key(&self, key: &SecretKeyBytes) -> Result<PublicKey, CryptoError> {
        derive_public_key(key)
    }

    fn decode_from_wif(&self, wif: &str) -> Result<SecretKeyBytes, CryptoError> {
        decode_wif(wif)
    }
}
