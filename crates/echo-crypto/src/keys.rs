//! Private key bytes and WIF text form

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::CryptoError;

/// WIF version byte for private keys
const WIF_VERSION: u8 = 0x80;

/// Raw 32-byte private key, wiped from memory on drop.
///
/// Debug output never shows the key material.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKeyBytes([u8; 32]);

impl SecretKeyBytes {
    /// Size in bytes
    pub const LEN: usize = 32;

    /// Wrap raw key bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from slice
    pub fn from_slice(slice: &[u8]) -> Result<Self, CryptoError> {
        if slice.len() != Self::LEN {
            return Err(CryptoError::InvalidPrivateKey);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    /// Borrow the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SecretKeyBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKeyBytes(..)")
    }
}

/// Decode a WIF string (base58check of `0x80 ++ key`).
pub fn decode_wif(wif: &str) -> Result<SecretKeyBytes, CryptoError> {
    let mut payload = bs58::decode(wif.trim())
        .with_check(None)
        .into_vec()
        .map_err(|e| CryptoError::InvalidWif(e.to_string()))?;

    let result = match payload.split_first() {
        Some((&WIF_VERSION, key)) if key.len() == SecretKeyBytes::LEN => {
            SecretKeyBytes::from_slice(key)
        }
        Some((&WIF_VERSION, key)) => Err(CryptoError::InvalidWif(format!(
            "expected {} key bytes, got {}",
            SecretKeyBytes::LEN,
            key.len()
        ))),
        _ => Err(CryptoError::InvalidWif("unexpected version byte".to_string())),
    };
    payload.zeroize();
    result
}

/// Encode a private key as WIF
pub fn encode_wif(key: &SecretKeyBytes) -> String {
    let mut payload = Vec::with_capacity(1 + SecretKeyBytes::LEN);
    payload.push(WIF_VERSION);
    payload.extend_from_slice(key.as_bytes());
    let wif = bs58::encode(&payload).with_check().into_string();
    payload.zeroize();
    wif
}
