//! Direct-mode builder: protobuf `SignDoc`.

use prost::Message;

use crate::error::SdkResult;
use crate::proto;
use crate::registry::{MessageRegistry, TypedOperation};
use crate::shared::Fee;
use crate::signing::{SignerData, SignerInfo, UnsignedTx};

/// Direct-mode signing document.
///
/// `body_bytes` and `auth_info_bytes` are the exact bytes that go into the
/// broadcast envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectDoc {
    pub body_bytes: Vec<u8>,
    pub auth_info_bytes: Vec<u8>,
    pub chain_id: String,
    pub account_number: u64,
}

impl DirectDoc {
    pub fn to_proto(&self) -> proto::SignDoc {
        proto::SignDoc {
            body_bytes: self.body_bytes.clone(),
            auth_info_bytes: self.auth_info_bytes.clone(),
            chain_id: self.chain_id.clone(),
            account_number: self.account_number,
        }
    }

    pub fn sign_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }
}

/// Encode the transaction body.
pub(crate) fn encode_body(
    registry: &MessageRegistry,
    operations: &[TypedOperation],
    memo: &str,
) -> SdkResult<Vec<u8>> {
    let messages = operations
        .iter()
        .map(|op| registry.encode_any(op))
        .collect::<SdkResult<Vec<_>>>()?;

    Ok(proto::TxBody {
        messages,
        memo: memo.to_string(),
        timeout_height: 0,
    }
    .encode_to_vec())
}

/// Encode the auth info. Signer infos keep the caller's order.
pub(crate) fn encode_auth_info(signer_infos: &[SignerInfo], fee: &Fee) -> Vec<u8> {
    proto::AuthInfo {
        signer_infos: signer_infos.iter().map(SignerInfo::to_proto).collect(),
        fee: Some(fee.to_proto()),
    }
    .encode_to_vec()
}

#[derive(Debug, Clone, Copy)]
pub struct DirectBuilder<'a> {
    registry: &'a MessageRegistry,
}

impl<'a> DirectBuilder<'a> {
    pub fn new(registry: &'a MessageRegistry) -> Self {
        Self { registry }
    }

    pub fn build(&self, tx: &UnsignedTx, signer: &SignerData) -> SdkResult<DirectDoc> {
        tx.fee.validate()?;
        Ok(DirectDoc {
            body_bytes: encode_body(self.registry, &tx.operations, &tx.memo)?,
            auth_info_bytes: encode_auth_info(&tx.signer_infos, &tx.fee),
            chain_id: signer.chain_id.clone(),
            account_number: signer.account_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use crate::registry::TypedOperation;
    use crate::signing::test_util::*;
    use serde_json::Value;

    #[test]
    fn test_direct_build_is_deterministic() {
        let registry = MessageRegistry::with_defaults();
        let builder = DirectBuilder::new(&registry);
        let a = builder.build(&send_tx("memo"), &signer_data()).unwrap();
        let b = builder.build(&send_tx("memo"), &signer_data()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.sign_bytes(), b.sign_bytes());
    }

    #[test]
    fn test_direct_doc_embeds_body() {
        let registry = MessageRegistry::with_defaults();
        let doc = DirectBuilder::new(&registry)
            .build(&send_tx("memo"), &signer_data())
            .unwrap();

        let body = proto::TxBody::decode(doc.body_bytes.as_slice()).unwrap();
        assert_eq!(body.memo, "memo");
        assert_eq!(body.messages[0].type_url, "/cosmos.bank.v1beta1.MsgSend");

        let auth = proto::AuthInfo::decode(doc.auth_info_bytes.as_slice()).unwrap();
        assert_eq!(auth.signer_infos[0].sequence, 7);
        assert_eq!(auth.fee.unwrap().gas_limit, 200_000);

        let sign_doc = proto::SignDoc::decode(doc.sign_bytes().as_slice()).unwrap();
        assert_eq!(sign_doc.chain_id, "testing");
        assert_eq!(sign_doc.account_number, 11);
    }

    #[test]
    fn test_direct_unknown_type_id() {
        let registry = MessageRegistry::with_defaults();
        let mut tx = send_tx("");
        tx.operations.push(TypedOperation::new("/unknown.Msg", Value::Null));
        assert!(matches!(
            DirectBuilder::new(&registry).build(&tx, &signer_data()),
            Err(SdkError::UnknownTypeId(_))
        ));
    }

    #[test]
    fn test_direct_rejects_zero_gas() {
        let registry = MessageRegistry::with_defaults();
        let mut tx = send_tx("");
        tx.fee.gas_limit = 0;
        assert!(matches!(
            DirectBuilder::new(&registry).build(&tx, &signer_data()),
            Err(SdkError::InvalidFee(_))
        ));
    }
}
