//! ECDSA signature operations using secp256k1

use echo_primitives::{PublicKey, H256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::{sha256, CryptoError, SecretKeyBytes};

/// Half of the secp256k1 curve order (n/2)
/// n/2 = 0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0
const SECP256K1_N_DIV_2: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D,
    0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Full secp256k1 curve order (n)
const SECP256K1_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Header offset of a compact signature over a compressed key (27 + 4)
const COMPACT_HEADER: u8 = 31;

/// Compact recoverable signature: `header || r || s` (65 bytes)
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 65]);

impl Signature {
    /// Size in bytes
    pub const LEN: usize = 65;

    /// Build from components
    pub fn new(recovery_id: u8, r: [u8; 32], s: [u8; 32]) -> Self {
        let mut bytes = [0u8; 65];
        bytes[0] = recovery_id + COMPACT_HEADER;
        bytes[1..33].copy_from_slice(&r);
        bytes[33..].copy_from_slice(&s);
        Signature(bytes)
    }

    /// Raw compact bytes
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// Recovery id (0 or 1)
    pub fn recovery_id(&self) -> u8 {
        self.0[0].wrapping_sub(COMPACT_HEADER)
    }

    /// r component
    pub fn r(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.0[1..33]);
        r
    }

    /// s component
    pub fn s(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.0[33..]);
        s
    }

    /// Check if signature has a low-s value
    pub fn is_low_s(&self) -> bool {
        compare_bytes(&self.s(), &SECP256K1_N_DIV_2) != Ordering::Greater
    }

    /// Lowercase hex, the form used in broadcast JSON
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        if bytes.len() != Self::LEN {
            return Err(CryptoError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                Self::LEN,
                bytes.len()
            )));
        }
        let mut arr = [0u8; 65];
        arr.copy_from_slice(&bytes);
        Ok(Signature(arr))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Signature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Compare two 32-byte arrays as big-endian integers
fn compare_bytes(a: &[u8; 32], b: &[u8; 32]) -> Ordering {
    for i in 0..32 {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Subtract s from n (secp256k1 order), result = n - s
fn subtract_from_n(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: u16 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_N[i] as u16).wrapping_sub(s[i] as u16).wrapping_sub(borrow);
        result[i] = diff as u8;
        borrow = if diff > 255 { 1 } else { 0 };
    }

    result
}

fn signing_key(key: &SecretKeyBytes) -> Result<SigningKey, CryptoError> {
    SigningKey::from_slice(key.as_bytes()).map_err(|_| CryptoError::InvalidPrivateKey)
}

/// Sign the SHA-256 digest of `payload`, normalized to low-s
pub fn sign(payload: &[u8], key: &SecretKeyBytes) -> Result<Signature, CryptoError> {
    let digest = sha256(payload);
    let (signature, mut recovery_id) = signing_key(key)?
        .sign_prehash_recoverable(digest.as_bytes())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;

    let r_bytes: [u8; 32] = signature.r().to_bytes().into();
    let mut s_bytes: [u8; 32] = signature.s().to_bytes().into();

    // If s > n/2, replace s with n - s and flip recovery_id
    if compare_bytes(&s_bytes, &SECP256K1_N_DIV_2) == Ordering::Greater {
        s_bytes = subtract_from_n(&s_bytes);
        recovery_id = RecoveryId::try_from(recovery_id.to_byte() ^ 1).map_err(|_| {
            CryptoError::SigningFailed("invalid recovery id after normalization".to_string())
        })?;
    }

    Ok(Signature::new(recovery_id.to_byte(), r_bytes, s_bytes))
}

/// Verify a signature over `payload` against a public key
pub fn verify(
    payload: &[u8],
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<bool, CryptoError> {
    if !signature.is_low_s() {
        return Ok(false);
    }

    let r: k256::FieldBytes = signature.r().into();
    let s: k256::FieldBytes = signature.s().into();
    let k256_sig = K256Signature::from_scalars(r, s)
        .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;

    let verifying_key = VerifyingKey::from_sec1_bytes(public_key.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    use k256::ecdsa::signature::hazmat::PrehashVerifier;
    Ok(verifying_key
        .verify_prehash(sha256(payload).as_bytes(), &k256_sig)
        .is_ok())
}

/// Derive the compressed public key for a private key
pub fn derive_public_key(key: &SecretKeyBytes) -> Result<PublicKey, CryptoError> {
    let signing_key = signing_key(key)?;
    let encoded = signing_key.verifying_key().to_encoded_point(true);
    PublicKey::from_slice(encoded.as_bytes())
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rand::RngCore;

    fn random_key() -> SecretKeyBytes {
        loop {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            let key = SecretKeyBytes::new(bytes);
            if derive_public_key(&key).is_ok() {
                return key;
            }
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let key = random_key();
        let public_key = derive_public_key(&key).unwrap();

        let signature = sign(b"payload", &key).unwrap();

        assert!(signature.is_low_s(), "Signature should have low-s value");
        assert!(verify(b"payload", &signature, &public_key).unwrap());
        assert!(!verify(b"other payload", &signature, &public_key).unwrap());
    }

    #[test]
    fn test_compact_header() {
        let key = random_key();
        let signature = sign(b"payload", &key).unwrap();
        let header = signature.as_bytes()[0];
        assert!(header == 31 || header == 32);
        assert!(signature.recovery_id() <= 1);
    }

    #[test]
    fn test_low_s_enforcement() {
        for _ in 0..10 {
            let key = random_key();
            let signature = sign(b"test", &key).unwrap();
            assert!(signature.is_low_s(), "All signatures must have low-s");
        }
    }

    #[test]
    fn test_reject_high_s_signature() {
        let key = random_key();
        let public_key = derive_public_key(&key).unwrap();
        let signature = sign(b"test", &key).unwrap();

        let high = Signature::new(signature.recovery_id(), signature.r(), [0xFF; 32]);
        assert!(!verify(b"test", &high, &public_key).unwrap());
    }

    #[test]
    fn test_derived_key_is_compressed() {
        let key = random_key();
        let public_key = derive_public_key(&key).unwrap();
        let prefix = public_key.as_bytes()[0];
        assert!(prefix == 0x02 || prefix == 0x03);
    }

    #[test]
    fn test_zero_key_rejected() {
        let key = SecretKeyBytes::new([0u8; 32]);
        assert_eq!(derive_public_key(&key), Err(CryptoError::InvalidPrivateKey));
    }

    #[test]
    fn test_signature_hex_roundtrip() {
        let key = random_key();
        let signature = sign(b"hex", &key).unwrap();
        let parsed = Signature::from_hex(&signature.to_hex()).unwrap();
        assert_eq!(parsed, signature);
        assert!(Signature::from_hex("abcd").is_err());
    }

    #[test]
    fn test_signing_is_deterministic() {
        // RFC 6979 nonces
        let key = random_key();
        assert_eq!(sign(b"same", &key).unwrap(), sign(b"same", &key).unwrap());
    }
}
