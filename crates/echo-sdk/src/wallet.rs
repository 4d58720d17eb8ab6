//! Signing key management

use echo_crypto::{CryptoProvider, SecretKeyBytes};
use echo_primitives::PublicKey;
use zeroize::Zeroize;

use crate::SdkError;

/// A private key together with its public key
///
/// Note: Clone is intentionally not implemented to prevent accidental key duplication.
/// Use `from_private_key` to create a new wallet with the same key if needed.
pub struct Wallet {
    secret: SecretKeyBytes,
    public_key: PublicKey,
}

impl Wallet {
    /// Create a wallet from a WIF private key
    pub fn from_wif(wif: &str, provider: &dyn CryptoProvider) -> Result<Self, SdkError> {
        let secret = provider.decode_from_wif(wif)?;
        Self::from_secret(secret, provider)
    }

    /// Create a wallet from a 32-byte private key
    pub fn from_private_key(key: &[u8; 32], provider: &dyn CryptoProvider) -> Result<Self, SdkError> {
        Self::from_secret(SecretKeyBytes::new(*key), provider)
    }

    /// Create a wallet from a hex-encoded private key
    ///
    /// Accepts both with and without "0x" prefix.
    pub fn from_private_key_hex(hex: &str, provider: &dyn CryptoProvider) -> Result<Self, SdkError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes = hex::decode(hex).map_err(|e| SdkError::MalformedInput(e.to_string()))?;
        let secret = SecretKeyBytes::from_slice(&bytes);
        bytes.zeroize();
        Self::from_secret(secret?, provider)
    }

    fn from_secret(secret: SecretKeyBytes, provider: &dyn CryptoProvider) -> Result<Self, SdkError> {
        let public_key = provider.derive_public_key(&secret)?;
        Ok(Self { secret, public_key })
    }

    /// Public key in chain form
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Copy of the key for a transaction's signing set
    pub(crate) fn signing_key(&self) -> SecretKeyBytes {
        self.secret.clone()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_crypto::{decode_wif, Secp256k1Provider};

    const WIF: &str = "5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ";
    const KEY_HEX: &str = "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";

    #[test]
    fn test_wallet_from_wif() {
        let wallet = Wallet::from_wif(WIF, &Secp256k1Provider).unwrap();
        assert!(wallet.public_key().to_text().starts_with("ECHO"));
        assert_eq!(wallet.signing_key(), decode_wif(WIF).unwrap());
    }

    #[test]
    fn test_wallet_from_hex_matches_wif() {
        let from_wif = Wallet::from_wif(WIF, &Secp256k1Provider).unwrap();
        let from_hex = Wallet::from_private_key_hex(&format!("0x{KEY_HEX}"), &Secp256k1Provider).unwrap();
        assert_eq!(from_wif.public_key(), from_hex.public_key());
    }

    #[test]
    fn test_wallet_invalid_key() {
        assert!(Wallet::from_private_key(&[0u8; 32], &Secp256k1Provider).is_err());
        assert!(Wallet::from_private_key_hex("0x1234", &Secp256k1Provider).is_err());
        assert!(Wallet::from_wif("garbage", &Secp256k1Provider).is_err());
    }

    #[test]
    fn test_debug_hides_private_key() {
        let wallet = Wallet::from_private_key_hex(KEY_HEX, &Secp256k1Provider).unwrap();
        let debug = format!("{:?}", wallet);
        assert!(!debug.contains(KEY_HEX));
        assert!(debug.contains("public_key"));
    }
}
