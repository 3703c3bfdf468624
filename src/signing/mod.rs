//! Canonical signing documents.
//!
//! Two encodings authorize the same semantic transaction:
//! - [`SignMode::Direct`]: protobuf `SignDoc` embedding the exact body and
//!   auth-info bytes that are later broadcast
//! - [`SignMode::LegacyJson`]: key-sorted compact JSON (`StdSignDoc`)
//!
//! Callers pick a [`DocumentBuilder`] by the signer's capability; both
//! variants are pure functions of their inputs.

pub mod direct;
pub mod legacy;

use serde::{Deserialize, Serialize};

use crate::error::SdkResult;
use crate::proto;
use crate::registry::{MessageRegistry, TypedOperation};
use crate::shared::{Fee, PublicKey};

pub use direct::{DirectBuilder, DirectDoc};
pub use legacy::{LegacyJsonBuilder, LegacyJsonDoc};

// ============================================================================
// SignMode
// ============================================================================

/// Signing document encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignMode {
    Direct,
    LegacyJson,
}

impl SignMode {
    pub fn to_proto(self) -> proto::SignMode {
        match self {
            SignMode::Direct => proto::SignMode::Direct,
            SignMode::LegacyJson => proto::SignMode::LegacyAminoJson,
        }
    }

    pub fn from_proto(mode: proto::SignMode) -> Option<Self> {
        match mode {
            proto::SignMode::Direct => Some(SignMode::Direct),
            proto::SignMode::LegacyAminoJson => Some(SignMode::LegacyJson),
            proto::SignMode::Unspecified => None,
        }
    }
}

impl std::fmt::Display for SignMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignMode::Direct => write!(f, "direct"),
            SignMode::LegacyJson => write!(f, "legacy_json"),
        }
    }
}

// ============================================================================
// Inputs
// ============================================================================

/// One signer's entry in the transaction's auth info.
///
/// `sequence` is supplied by the caller and never modified here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    pub public_key: PublicKey,
    #[serde(with = "crate::shared::serde_util::u64_string")]
    pub sequence: u64,
    pub sign_mode: SignMode,
}

impl SignerInfo {
    pub fn new(public_key: PublicKey, sequence: u64, sign_mode: SignMode) -> Self {
        Self {
            public_key,
            sequence,
            sign_mode,
        }
    }

    pub fn to_proto(&self) -> proto::SignerInfo {
        proto::SignerInfo {
            public_key: Some(self.public_key.to_any()),
            mode_info: Some(proto::ModeInfo {
                sum: Some(proto::mode_info::Sum::Single(proto::mode_info::Single {
                    mode: self.sign_mode.to_proto() as i32,
                })),
            }),
            sequence: self.sequence,
        }
    }
}

/// Chain and account context of the signer a document is built for.
///
/// `sequence` must equal the sequence of this signer's entry in
/// `UnsignedTx::signer_infos`. The legacy JSON document embeds it and the
/// legacy builder refuses a value no signer info carries; direct documents
/// take the sequence from the auth-info bytes instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerData {
    pub chain_id: String,
    #[serde(with = "crate::shared::serde_util::u64_string")]
    pub account_number: u64,
    #[serde(with = "crate::shared::serde_util::u64_string")]
    pub sequence: u64,
}

impl SignerData {
    pub fn new(chain_id: impl Into<String>, account_number: u64, sequence: u64) -> Self {
        Self {
            chain_id: chain_id.into(),
            account_number,
            sequence,
        }
    }
}

/// Everything a transaction carries before it is signed.
///
/// `signer_infos` order is the signature order of the final envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedTx {
    pub operations: Vec<TypedOperation>,
    pub fee: Fee,
    #[serde(default)]
    pub memo: String,
    pub signer_infos: Vec<SignerInfo>,
}

// ============================================================================
// SigningDocument
// ============================================================================

/// Mode-tagged signing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningDocument {
    Direct(DirectDoc),
    LegacyJson(LegacyJsonDoc),
}

impl SigningDocument {
    pub fn mode(&self) -> SignMode {
        match self {
            SigningDocument::Direct(_) => SignMode::Direct,
            SigningDocument::LegacyJson(_) => SignMode::LegacyJson,
        }
    }

    /// The exact bytes a signature is computed over.
    pub fn sign_bytes(&self) -> Vec<u8> {
        match self {
            SigningDocument::Direct(doc) => doc.sign_bytes(),
            SigningDocument::LegacyJson(doc) => doc.json.as_bytes().to_vec(),
        }
    }
}

// ============================================================================
// DocumentBuilder
// ============================================================================

/// The two builders behind one interface.
#[derive(Debug, Clone, Copy)]
pub enum DocumentBuilder<'a> {
    Direct(DirectBuilder<'a>),
    LegacyJson(LegacyJsonBuilder<'a>),
}

impl<'a> DocumentBuilder<'a> {
    pub fn for_mode(mode: SignMode, registry: &'a MessageRegistry) -> Self {
        match mode {
            SignMode::Direct => DocumentBuilder::Direct(DirectBuilder::new(registry)),
            SignMode::LegacyJson => DocumentBuilder::LegacyJson(LegacyJsonBuilder::new(registry)),
        }
    }

    pub fn mode(&self) -> SignMode {
        match self {
            DocumentBuilder::Direct(_) => SignMode::Direct,
            DocumentBuilder::LegacyJson(_) => SignMode::LegacyJson,
        }
    }

    pub fn build(&self, tx: &UnsignedTx, signer: &SignerData) -> SdkResult<SigningDocument> {
        let doc = match self {
            DocumentBuilder::Direct(b) => SigningDocument::Direct(b.build(tx, signer)?),
            DocumentBuilder::LegacyJson(b) => SigningDocument::LegacyJson(b.build(tx, signer)?),
        };
        tracing::debug!(
            mode = %doc.mode(),
            operations = tx.operations.len(),
            signers = tx.signer_infos.len(),
            "Built signing document"
        );
        Ok(doc)
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::*;
    use super::*;

    #[test]
    fn test_sign_mode_proto_mapping() {
        assert_eq!(SignMode::Direct.to_proto() as i32, 1);
        assert_eq!(SignMode::LegacyJson.to_proto() as i32, 127);
        assert_eq!(
            SignMode::from_proto(proto::SignMode::LegacyAminoJson),
            Some(SignMode::LegacyJson)
        );
        assert_eq!(SignMode::from_proto(proto::SignMode::Unspecified), None);
    }

    #[test]
    fn test_builder_for_mode() {
        let registry = MessageRegistry::with_defaults();
        for mode in [SignMode::Direct, SignMode::LegacyJson] {
            let builder = DocumentBuilder::for_mode(mode, &registry);
            assert_eq!(builder.mode(), mode);
            let doc = builder.build(&send_tx(""), &signer_data()).unwrap();
            assert_eq!(doc.mode(), mode);
        }
    }

    #[test]
    fn test_modes_produce_different_bytes() {
        let registry = MessageRegistry::with_defaults();
        let tx = send_tx("hello");
        let direct = DocumentBuilder::for_mode(SignMode::Direct, &registry)
            .build(&tx, &signer_data())
            .unwrap();
        let legacy = DocumentBuilder::for_mode(SignMode::LegacyJson, &registry)
            .build(&tx, &signer_data())
            .unwrap();
        assert_ne!(direct.sign_bytes(), legacy.sign_bytes());
    }

    #[test]
    fn test_signer_info_proto() {
        let info = SignerInfo::new(PublicKey::ed25519([1u8; 32]), 3, SignMode::LegacyJson);
        let encoded = info.to_proto();
        assert_eq!(encoded.sequence, 3);
        let Some(proto::ModeInfo {
            sum: Some(proto::mode_info::Sum::Single(single)),
        }) = encoded.mode_info
        else {
            panic!("expected single mode info");
        };
        assert_eq!(single.mode, 127);
    }
}
