//! # Credential Handle
//!
//! Secret signing material with a scoped lifetime: acquired immediately
//! before one submission, consumed by the relay, zeroed on drop. Never
//! logged, never serialized, never retained in any component's state.

use async_trait::async_trait;
use k256::ecdsa::signature::Signer;
use k256::ecdsa::{Signature, SigningKey};
use primitive_types::H160;
use sha3::{Digest, Keccak256};
use shared_types::BridgeError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A private signing key, zeroized when the handle is dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    key_bytes: [u8; 32],
}

impl Credential {
    /// Wrap raw key bytes. Fails with [`BridgeError::Credential`] if the
    /// bytes are not a valid secp256k1 scalar.
    pub fn from_bytes(key_bytes: [u8; 32]) -> Result<Self, BridgeError> {
        SigningKey::from_slice(&key_bytes)
            .map_err(|e| BridgeError::Credential(e.to_string()))?;
        Ok(Self { key_bytes })
    }

    /// Parse a hex-encoded key, with or without `0x` prefix.
    pub fn from_hex(hex_key: &str) -> Result<Self, BridgeError> {
        let trimmed = hex_key.strip_prefix("0x").unwrap_or(hex_key);
        let decoded = hex::decode(trimmed.trim())
            .map_err(|e| BridgeError::Credential(e.to_string()))?;
        if decoded.len() != 32 {
            return Err(BridgeError::Credential(
                "key must be 32 bytes".to_string(),
            ));
        }
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&decoded);
        Self::from_bytes(key_bytes)
    }

    /// Ledger address derived from the public key (keccak-256 of the
    /// uncompressed point, last 20 bytes).
    pub fn address(&self) -> Result<H160, BridgeError> {
        let key = SigningKey::from_slice(&self.key_bytes)
            .map_err(|e| BridgeError::Credential(e.to_string()))?;
        let point = key.verifying_key().to_encoded_point(false);
        let mut hasher = Keccak256::new();
        hasher.update(&point.as_bytes()[1..]);
        let digest = hasher.finalize();
        Ok(H160::from_slice(&digest[12..]))
    }

    /// Sign an envelope digest. The signature leaves; the key never does.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>, BridgeError> {
        let key = SigningKey::from_slice(&self.key_bytes)
            .map_err(|e| BridgeError::Credential(e.to_string()))?;
        let signature: Signature = key.sign(digest);
        Ok(signature.to_bytes().to_vec())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.write_str("Credential(***)")
    }
}

/// Source of fresh credentials, one per submission.
///
/// Implementations must not cache a [`Credential`]: every `acquire` hands
/// out a new handle whose lifetime ends with the submission it signs.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Acquire a fresh signing handle.
    async fn acquire(&self) -> Result<Credential, BridgeError>;
}

/// Reads the key from an environment variable at acquire time.
///
/// The variable is re-read on every call, so rotating the key needs no
/// process restart and no component ever holds the secret at rest.
pub struct EnvCredentialSource {
    var_name: String,
}

impl EnvCredentialSource {
    /// Source keyed by environment variable name.
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
        }
    }
}

#[async_trait]
impl CredentialSource for EnvCredentialSource {
    async fn acquire(&self) -> Result<Credential, BridgeError> {
        let mut raw = std::env::var(&self.var_name)
            .map_err(|_| BridgeError::Credential(format!("{} not set", self.var_name)))?;
        let credential = Credential::from_hex(&raw);
        raw.zeroize();
        credential
    }
}
