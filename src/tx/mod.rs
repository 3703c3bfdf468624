//! Transaction assembly.
//!
//! [`Assembler::assemble`] pairs the unsigned transaction with its
//! signatures and produces an immutable [`SignedTransaction`]. Signatures are
//! kept in the order given; position `i` must belong to `signer_infos[i]`.

use prost::Message;
use sha2::{Digest, Sha256};

use crate::error::{SdkError, SdkResult};
use crate::proto;
use crate::registry::{MessageRegistry, TypedOperation};
use crate::shared::Fee;
use crate::signer::Signature;
use crate::signing::direct::{encode_auth_info, encode_body};
use crate::signing::{SignerInfo, UnsignedTx};

// ============================================================================
// SignedTransaction
// ============================================================================

/// A fully signed transaction, ready for broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    operations: Vec<TypedOperation>,
    fee: Fee,
    memo: String,
    signer_infos: Vec<SignerInfo>,
    signatures: Vec<Signature>,
    body_bytes: Vec<u8>,
    auth_info_bytes: Vec<u8>,
}

impl SignedTransaction {
    pub fn operations(&self) -> &[TypedOperation] {
        &self.operations
    }

    pub fn fee(&self) -> &Fee {
        &self.fee
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn signer_infos(&self) -> &[SignerInfo] {
        &self.signer_infos
    }

    /// Signatures in signer order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    pub fn auth_info_bytes(&self) -> &[u8] {
        &self.auth_info_bytes
    }

    pub fn to_raw(&self) -> proto::TxRaw {
        proto::TxRaw {
            body_bytes: self.body_bytes.clone(),
            auth_info_bytes: self.auth_info_bytes.clone(),
            signatures: self
                .signatures
                .iter()
                .map(|s| s.signature_bytes.clone())
                .collect(),
        }
    }

    /// Encoded `TxRaw`, the blob handed to a transport.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_raw().encode_to_vec()
    }

    /// Uppercase hex SHA-256 of [`to_bytes`](Self::to_bytes).
    pub fn hash(&self) -> String {
        tx_hash(&self.to_bytes())
    }
}

/// Transaction hash of an encoded `TxRaw`.
pub fn tx_hash(tx_bytes: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(tx_bytes))
}

// ============================================================================
// Assembler
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Assembler<'a> {
    registry: &'a MessageRegistry,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a MessageRegistry) -> Self {
        Self { registry }
    }

    /// Combine an unsigned transaction with one signature per signer info.
    ///
    /// Fails with `SignatureCountMismatch` when the counts differ and with
    /// `SignatureMismatch` when a signature's key or mode disagrees with the
    /// signer info at the same position.
    pub fn assemble(&self, tx: UnsignedTx, signatures: Vec<Signature>) -> SdkResult<SignedTransaction> {
        if signatures.len() != tx.signer_infos.len() {
            return Err(SdkError::SignatureCountMismatch {
                expected: tx.signer_infos.len(),
                actual: signatures.len(),
            });
        }

        for (index, (info, signature)) in tx.signer_infos.iter().zip(&signatures).enumerate() {
            if info.public_key != signature.signer_public_key {
                return Err(SdkError::SignatureMismatch {
                    index,
                    reason: "public key differs from signer info".into(),
                });
            }
            if info.sign_mode != signature.mode {
                return Err(SdkError::SignatureMismatch {
                    index,
                    reason: format!(
                        "signed in {} mode, signer info declares {}",
                        signature.mode, info.sign_mode
                    ),
                });
            }
        }

        tx.fee.validate()?;
        let body_bytes = encode_body(self.registry, &tx.operations, &tx.memo)?;
        let auth_info_bytes = encode_auth_info(&tx.signer_infos, &tx.fee);

        tracing::debug!(
            operations = tx.operations.len(),
            signatures = signatures.len(),
            "Assembled transaction"
        );

        Ok(SignedTransaction {
            operations: tx.operations,
            fee: tx.fee,
            memo: tx.memo,
            signer_infos: tx.signer_infos,
            signatures,
            body_bytes,
            auth_info_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::{DirectCapableSigner, DualModeSigner, LegacyOnlySigner, Signer};
    use crate::signing::test_util::*;
    use crate::signing::{DocumentBuilder, SignMode, SignerData};

    fn two_signer_tx(a: &dyn Signer, b: &dyn Signer) -> UnsignedTx {
        let mut tx = send_tx("multi");
        tx.signer_infos = vec![
            SignerInfo::new(a.public_key(), 1, SignMode::Direct),
            SignerInfo::new(b.public_key(), 2, SignMode::Direct),
        ];
        tx
    }

    fn sign_direct(registry: &MessageRegistry, tx: &UnsignedTx, signer: &dyn Signer) -> Signature {
        let doc = DocumentBuilder::for_mode(SignMode::Direct, registry)
            .build(tx, &SignerData::new("testing", 1, 1))
            .unwrap();
        signer.sign(&doc).unwrap()
    }

    #[test]
    fn test_assemble_preserves_order() {
        let registry = MessageRegistry::with_defaults();
        let a = DirectCapableSigner::generate();
        let b = DualModeSigner::generate();
        let tx = two_signer_tx(&a, &b);
        let sig_a = sign_direct(&registry, &tx, &a);
        let sig_b = sign_direct(&registry, &tx, &b);

        let signed = Assembler::new(&registry)
            .assemble(tx, vec![sig_a.clone(), sig_b.clone()])
            .unwrap();
        assert_eq!(signed.signatures(), &[sig_a.clone(), sig_b.clone()]);

        let raw = proto::TxRaw::decode(signed.to_bytes().as_slice()).unwrap();
        assert_eq!(raw.signatures, vec![sig_a.signature_bytes, sig_b.signature_bytes]);
    }

    #[test]
    fn test_assemble_rejects_swapped_signatures() {
        let registry = MessageRegistry::with_defaults();
        let a = DirectCapableSigner::generate();
        let b = DirectCapableSigner::generate();
        let tx = two_signer_tx(&a, &b);
        let sig_a = sign_direct(&registry, &tx, &a);
        let sig_b = sign_direct(&registry, &tx, &b);

        let err = Assembler::new(&registry)
            .assemble(tx, vec![sig_b, sig_a])
            .unwrap_err();
        assert!(matches!(err, SdkError::SignatureMismatch { index: 0, .. }));
    }

    #[test]
    fn test_assemble_count_mismatch() {
        let registry = MessageRegistry::with_defaults();
        let a = DirectCapableSigner::generate();
        let b = DirectCapableSigner::generate();
        let tx = two_signer_tx(&a, &b);
        let sig_a = sign_direct(&registry, &tx, &a);

        let err = Assembler::new(&registry).assemble(tx, vec![sig_a]).unwrap_err();
        assert!(matches!(
            err,
            SdkError::SignatureCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_assemble_rejects_mode_mismatch() {
        let registry = MessageRegistry::with_defaults();
        let signer = LegacyOnlySigner::generate();
        let mut tx = send_tx("");
        tx.signer_infos = vec![SignerInfo::new(signer.public_key(), 7, SignMode::Direct)];
        let doc = DocumentBuilder::for_mode(SignMode::LegacyJson, &registry)
            .build(&tx, &signer_data())
            .unwrap();
        let signature = signer.sign(&doc).unwrap();

        assert!(matches!(
            Assembler::new(&registry).assemble(tx, vec![signature]),
            Err(SdkError::SignatureMismatch { index: 0, .. })
        ));
    }

    #[test]
    fn test_direct_body_matches_signed_document() {
        let registry = MessageRegistry::with_defaults();
        let signer = DirectCapableSigner::generate();
        let mut tx = send_tx("same bytes");
        tx.signer_infos = vec![SignerInfo::new(signer.public_key(), 0, SignMode::Direct)];
        let doc = crate::signing::DirectBuilder::new(&registry)
            .build(&tx, &signer_data())
            .unwrap();
        let signature = signer
            .sign(&crate::signing::SigningDocument::Direct(doc.clone()))
            .unwrap();

        let signed = Assembler::new(&registry).assemble(tx, vec![signature]).unwrap();
        assert_eq!(signed.body_bytes(), doc.body_bytes.as_slice());
        assert_eq!(signed.auth_info_bytes(), doc.auth_info_bytes.as_slice());
    }

    #[test]
    fn test_hash_is_uppercase_sha256() {
        let hash = tx_hash(b"");
        assert_eq!(
            hash,
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }
}
