//! Local key material.
//!
//! Account keys default to secp256k1: ECDSA over the SHA-256 digest of the
//! sign bytes, 64-byte `r || s` with low `s`. Ed25519 signs the raw sign
//! bytes.

use ed25519_dalek::{Signer as _, SigningKey as Ed25519Key};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature as Secp256k1Signature, SigningKey as Secp256k1Key};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{SdkError, SdkResult};
use crate::shared::PublicKey;

/// Secret key length for both algorithms.
pub const SECRET_KEY_LEN: usize = 32;

/// Signature algorithm of a [`LocalKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAlgorithm {
    #[default]
    Secp256k1,
    Ed25519,
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyAlgorithm::Secp256k1 => write!(f, "secp256k1"),
            KeyAlgorithm::Ed25519 => write!(f, "ed25519"),
        }
    }
}

#[derive(Clone)]
enum KeyPair {
    Secp256k1(Secp256k1Key),
    Ed25519(Ed25519Key),
}

/// An in-memory secret key.
///
/// Signing reads the key only, so one instance may sign from several threads
/// at once.
#[derive(Clone)]
pub struct LocalKey {
    inner: KeyPair,
}

impl std::fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKey")
            .field("algorithm", &self.algorithm())
            .field("public_key", &self.public_key().to_hex())
            .finish()
    }
}

impl LocalKey {
    /// Fresh secp256k1 key.
    pub fn generate() -> Self {
        Self::generate_with(KeyAlgorithm::default())
    }

    pub fn generate_with(algorithm: KeyAlgorithm) -> Self {
        let inner = match algorithm {
            KeyAlgorithm::Secp256k1 => KeyPair::Secp256k1(Secp256k1Key::random(&mut OsRng)),
            KeyAlgorithm::Ed25519 => KeyPair::Ed25519(Ed25519Key::generate(&mut OsRng)),
        };
        Self { inner }
    }

    /// Load a 32-byte secp256k1 secret scalar.
    pub fn from_bytes(secret: &[u8]) -> SdkResult<Self> {
        Self::from_bytes_with(KeyAlgorithm::default(), secret)
    }

    /// Load a 32-byte secret for `algorithm` (a scalar for secp256k1, a seed
    /// for ed25519).
    pub fn from_bytes_with(algorithm: KeyAlgorithm, secret: &[u8]) -> SdkResult<Self> {
        if secret.len() != SECRET_KEY_LEN {
            return Err(SdkError::SigningFailure(format!(
                "{} secret key must be {} bytes, got {}",
                algorithm,
                SECRET_KEY_LEN,
                secret.len()
            )));
        }

        let inner = match algorithm {
            KeyAlgorithm::Secp256k1 => KeyPair::Secp256k1(
                Secp256k1Key::from_slice(secret)
                    .map_err(|e| SdkError::SigningFailure(format!("secp256k1 secret key: {}", e)))?,
            ),
            KeyAlgorithm::Ed25519 => {
                let mut seed = [0u8; SECRET_KEY_LEN];
                seed.copy_from_slice(secret);
                KeyPair::Ed25519(Ed25519Key::from_bytes(&seed))
            }
        };
        Ok(Self { inner })
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self.inner {
            KeyPair::Secp256k1(_) => KeyAlgorithm::Secp256k1,
            KeyPair::Ed25519(_) => KeyAlgorithm::Ed25519,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        match &self.inner {
            KeyPair::Secp256k1(key) => {
                let point = key.verifying_key().to_encoded_point(true);
                PublicKey::Secp256k1(point.as_bytes().to_vec())
            }
            KeyPair::Ed25519(key) => PublicKey::ed25519(key.verifying_key().to_bytes()),
        }
    }

    pub(crate) fn sign(&self, message: &[u8]) -> SdkResult<Vec<u8>> {
        match &self.inner {
            KeyPair::Secp256k1(key) => {
                let digest = Sha256::digest(message);
                let signature: Secp256k1Signature = key
                    .sign_prehash(digest.as_slice())
                    .map_err(|e| SdkError::SigningFailure(e.to_string()))?;
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_bytes().to_vec())
            }
            KeyPair::Ed25519(key) => {
                let signature = key
                    .try_sign(message)
                    .map_err(|e| SdkError::SigningFailure(e.to_string()))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }
}
