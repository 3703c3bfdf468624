//! Signer abstraction.
//!
//! A signer advertises the [`SignMode`]s it can sign and refuses any other.
//! Three variants are provided, all backed by a [`LocalKey`]:
//!
//! | Signer | Modes |
//! |---|---|
//! | [`DirectCapableSigner`] | direct |
//! | [`LegacyOnlySigner`] | legacy JSON |
//! | [`DualModeSigner`] | direct, legacy JSON |
//!
//! Keys are secp256k1 unless built from a [`LocalKey`] of another
//! [`KeyAlgorithm`].
//!
//! Use [`select_mode`] before building a document so that a builder is only
//! invoked for a mode the signer accepts.

pub mod keypair;

use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey as Ed25519VerifyingKey};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature as Secp256k1Signature, VerifyingKey as Secp256k1VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{SdkError, SdkResult};
use crate::shared::serde_util;
use crate::shared::PublicKey;
use crate::signing::{SignMode, SigningDocument};

pub use keypair::{KeyAlgorithm, LocalKey};

// ============================================================================
// Signature
// ============================================================================

/// A signature over one signing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub signer_public_key: PublicKey,
    #[serde(with = "serde_util::base64_bytes")]
    pub signature_bytes: Vec<u8>,
    pub mode: SignMode,
}

// ============================================================================
// Signer trait
// ============================================================================

/// Something that can sign a [`SigningDocument`].
///
/// Implementations that hold non-thread-safe key state must document that a
/// single instance requires exclusive access per `sign` call. The variants in
/// this module are safe to share.
pub trait Signer: Send + Sync {
    fn public_key(&self) -> PublicKey;

    fn supported_modes(&self) -> &[SignMode];

    /// Sign the document. Fails with `UnsupportedMode` if the document's
    /// mode is not supported, or `SigningFailure` on a crypto error.
    fn sign(&self, document: &SigningDocument) -> SdkResult<Signature>;

    fn supports(&self, mode: SignMode) -> bool {
        self.supported_modes().contains(&mode)
    }
}

fn sign_gated(key: &LocalKey, modes: &[SignMode], document: &SigningDocument) -> SdkResult<Signature> {
    let mode = document.mode();
    if !modes.contains(&mode) {
        return Err(SdkError::UnsupportedMode { mode });
    }
    Ok(Signature {
        signer_public_key: key.public_key(),
        signature_bytes: key.sign(&document.sign_bytes())?,
        mode,
    })
}

macro_rules! local_signer {
    ($(#[$doc:meta])* $name:ident, [$($mode:expr),+]) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name {
            key: LocalKey,
        }

        impl $name {
            const MODES: &'static [SignMode] = &[$($mode),+];

            pub fn new(key: LocalKey) -> Self {
                Self { key }
            }

            pub fn from_secret_bytes(secret: &[u8]) -> SdkResult<Self> {
                Ok(Self::new(LocalKey::from_bytes(secret)?))
            }

            pub fn generate() -> Self {
                Self::new(LocalKey::generate())
            }
        }

        impl Signer for $name {
            fn public_key(&self) -> PublicKey {
                self.key.public_key()
            }

            fn supported_modes(&self) -> &[SignMode] {
                Self::MODES
            }

            fn sign(&self, document: &SigningDocument) -> SdkResult<Signature> {
                sign_gated(&self.key, Self::MODES, document)
            }
        }
    };
}

local_signer!(
    /// Signs direct-mode documents only.
    DirectCapableSigner,
    [SignMode::Direct]
);

local_signer!(
    /// Signs legacy JSON documents only, like hardware wallets that cannot
    /// parse protobuf.
    LegacyOnlySigner,
    [SignMode::LegacyJson]
);

local_signer!(
    /// Signs either mode.
    DualModeSigner,
    [SignMode::Direct, SignMode::LegacyJson]
);

// ============================================================================
// Mode selection
// ============================================================================

/// Caller intent for choosing a sign mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModePreference {
    /// Direct, falling back to legacy JSON.
    #[default]
    PreferDirect,
    /// Legacy JSON, falling back to direct.
    PreferLegacy,
}

impl ModePreference {
    pub fn order(self) -> [SignMode; 2] {
        match self {
            ModePreference::PreferDirect => [SignMode::Direct, SignMode::LegacyJson],
            ModePreference::PreferLegacy => [SignMode::LegacyJson, SignMode::Direct],
        }
    }
}

/// Pick the first mode in preference order that the signer supports.
pub fn select_mode(signer: &dyn Signer, preference: ModePreference) -> SdkResult<SignMode> {
    let order = preference.order();
    let mode = order
        .into_iter()
        .find(|mode| signer.supports(*mode))
        .ok_or(SdkError::UnsupportedMode { mode: order[0] })?;
    tracing::debug!(mode = %mode, preference = ?preference, "Selected sign mode");
    Ok(mode)
}

// ============================================================================
// Verification
// ============================================================================

/// Verify `signature` against the document it claims to sign.
///
/// Secp256k1 signatures must be 64-byte `r || s` with low `s`.
pub fn verify_signature(document: &SigningDocument, signature: &Signature) -> SdkResult<()> {
    if document.mode() != signature.mode {
        return Err(SdkError::SigningFailure(format!(
            "signature mode {} does not match document mode {}",
            signature.mode,
            document.mode()
        )));
    }

    let message = document.sign_bytes();
    match &signature.signer_public_key {
        PublicKey::Ed25519(key_bytes) => {
            verify_ed25519(key_bytes, &message, &signature.signature_bytes)
        }
        PublicKey::Secp256k1(key_bytes) => {
            verify_secp256k1(key_bytes, &message, &signature.signature_bytes)
        }
    }
}

fn verify_ed25519(key_bytes: &[u8], message: &[u8], signature: &[u8]) -> SdkResult<()> {
    let key_bytes: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| SdkError::SigningFailure("malformed ed25519 public key".into()))?;
    let key = Ed25519VerifyingKey::from_bytes(&key_bytes)
        .map_err(|e| SdkError::SigningFailure(e.to_string()))?;
    let sig = Ed25519Signature::from_slice(signature)
        .map_err(|e| SdkError::SigningFailure(e.to_string()))?;

    key.verify(message, &sig)
        .map_err(|e| SdkError::SigningFailure(e.to_string()))
}

fn verify_secp256k1(key_bytes: &[u8], message: &[u8], signature: &[u8]) -> SdkResult<()> {
    let key = Secp256k1VerifyingKey::from_sec1_bytes(key_bytes)
        .map_err(|_| SdkError::SigningFailure("malformed secp256k1 public key".into()))?;
    let sig = Secp256k1Signature::from_slice(signature)
        .map_err(|e| SdkError::SigningFailure(e.to_string()))?;
    if sig.normalize_s().is_some() {
        return Err(SdkError::SigningFailure(
            "secp256k1 signature is not low-s".into(),
        ));
    }

    key.verify_prehash(Sha256::digest(message).as_slice(), &sig)
        .map_err(|e| SdkError::SigningFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MessageRegistry;
    use crate::signing::test_util::*;
    use crate::signing::DocumentBuilder;

    fn doc(mode: SignMode) -> SigningDocument {
        let registry = MessageRegistry::with_defaults();
        DocumentBuilder::for_mode(mode, &registry)
            .build(&send_tx("gate"), &signer_data())
            .unwrap()
    }

    #[test]
    fn test_mode_gating() {
        let direct = DirectCapableSigner::generate();
        let legacy = LegacyOnlySigner::generate();
        let dual = DualModeSigner::generate();

        assert!(matches!(
            direct.sign(&doc(SignMode::LegacyJson)),
            Err(SdkError::UnsupportedMode {
                mode: SignMode::LegacyJson
            })
        ));
        assert!(matches!(
            legacy.sign(&doc(SignMode::Direct)),
            Err(SdkError::UnsupportedMode {
                mode: SignMode::Direct
            })
        ));
        assert!(dual.sign(&doc(SignMode::Direct)).is_ok());
        assert!(dual.sign(&doc(SignMode::LegacyJson)).is_ok());
    }

    #[test]
    fn test_signature_verifies() {
        let signer = DualModeSigner::from_secret_bytes(&[4u8; 32]).unwrap();
        for mode in [SignMode::Direct, SignMode::LegacyJson] {
            let document = doc(mode);
            let signature = signer.sign(&document).unwrap();
            assert_eq!(signature.mode, mode);
            assert_eq!(signature.signer_public_key, signer.public_key());
            assert!(verify_signature(&document, &signature).is_ok());
        }
    }

    #[test]
    fn test_default_signers_use_secp256k1() {
        let signer = DualModeSigner::from_secret_bytes(&[4u8; 32]).unwrap();
        assert!(matches!(signer.public_key(), PublicKey::Secp256k1(_)));
        let signature = signer.sign(&doc(SignMode::Direct)).unwrap();
        assert_eq!(signature.signature_bytes.len(), 64);
    }

    #[test]
    fn test_ed25519_signature_verifies() {
        let key = LocalKey::from_bytes_with(KeyAlgorithm::Ed25519, &[4u8; 32]).unwrap();
        let signer = DualModeSigner::new(key);
        assert!(matches!(signer.public_key(), PublicKey::Ed25519(_)));
        for mode in [SignMode::Direct, SignMode::LegacyJson] {
            let document = doc(mode);
            let signature = signer.sign(&document).unwrap();
            assert!(verify_signature(&document, &signature).is_ok());
        }
    }

    #[test]
    fn test_verify_rejects_high_s() {
        let signer = DirectCapableSigner::from_secret_bytes(&[6u8; 32]).unwrap();
        let document = doc(SignMode::Direct);
        let mut signature = signer.sign(&document).unwrap();

        let low = Secp256k1Signature::from_slice(&signature.signature_bytes).unwrap();
        let (r, s) = low.split_scalars();
        let high = Secp256k1Signature::from_scalars(r, -*s).unwrap();
        signature.signature_bytes = high.to_bytes().to_vec();

        let err = verify_signature(&document, &signature).unwrap_err();
        assert!(err.to_string().contains("low-s"));
    }

    #[test]
    fn test_verify_rejects_key_of_other_signer() {
        let signer = DirectCapableSigner::from_secret_bytes(&[6u8; 32]).unwrap();
        let other = DirectCapableSigner::from_secret_bytes(&[7u8; 32]).unwrap();
        let document = doc(SignMode::Direct);
        let mut signature = signer.sign(&document).unwrap();
        signature.signer_public_key = other.public_key();
        assert!(verify_signature(&document, &signature).is_err());
    }

    #[test]
    fn test_verify_rejects_tampered_signature() {
        let signer = DirectCapableSigner::generate();
        let document = doc(SignMode::Direct);
        let mut signature = signer.sign(&document).unwrap();
        signature.signature_bytes[0] ^= 0xFF;
        assert!(verify_signature(&document, &signature).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_mode() {
        let signer = DualModeSigner::generate();
        let signature = signer.sign(&doc(SignMode::Direct)).unwrap();
        assert!(verify_signature(&doc(SignMode::LegacyJson), &signature).is_err());
    }

    #[test]
    fn test_select_mode() {
        let dual = DualModeSigner::generate();
        assert_eq!(
            select_mode(&dual, ModePreference::PreferDirect).unwrap(),
            SignMode::Direct
        );
        assert_eq!(
            select_mode(&dual, ModePreference::PreferLegacy).unwrap(),
            SignMode::LegacyJson
        );
        assert_eq!(
            select_mode(&LegacyOnlySigner::generate(), ModePreference::PreferDirect).unwrap(),
            SignMode::LegacyJson
        );
        assert_eq!(
            select_mode(&DirectCapableSigner::generate(), ModePreference::PreferLegacy).unwrap(),
            SignMode::Direct
        );
    }

    struct NoModes;

    impl Signer for NoModes {
        fn public_key(&self) -> PublicKey {
            PublicKey::ed25519([0u8; 32])
        }

        fn supported_modes(&self) -> &[SignMode] {
            &[]
        }

        fn sign(&self, document: &SigningDocument) -> SdkResult<Signature> {
            Err(SdkError::UnsupportedMode {
                mode: document.mode(),
            })
        }
    }

    #[test]
    fn test_select_mode_none_supported() {
        assert!(matches!(
            select_mode(&NoModes, ModePreference::PreferDirect),
            Err(SdkError::UnsupportedMode { .. })
        ));
    }
}
