//! Typed message trait and the generic codec functions that adapt a typed
//! message to the registry's untyped rule signatures.

use prost::Message;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{SdkError, SdkResult};
use crate::registry::TypedOperation;

/// A strongly typed operation kind that can be registered with a
/// [`MessageRegistry`](super::MessageRegistry).
///
/// Payloads travel through the registry as JSON values; implementors define
/// how their typed form maps to protobuf (direct mode) and to the legacy JSON
/// value (legacy mode). `validate` checks structure only, never business rules.
pub trait TypedMsg: Serialize + DeserializeOwned {
    /// Fully qualified type id, e.g. `/cosmos.staking.v1beta1.MsgCreateValidator`.
    const TYPE_URL: &'static str;

    /// Legacy JSON type tag, or `None` for direct-only kinds.
    const LEGACY_TYPE: Option<&'static str>;

    /// Protobuf wire type.
    type Proto: Message + Default;

    fn validate(&self) -> Result<(), String>;

    fn to_proto(&self) -> Result<Self::Proto, String>;

    fn from_proto(proto: Self::Proto) -> Result<Self, String>;

    fn to_legacy_value(&self) -> Result<Value, String>;

    /// Wrap into an untyped operation for the builders.
    fn into_operation(self) -> SdkResult<TypedOperation> {
        self.validate().map_err(|reason| invalid::<Self>(reason))?;
        Ok(TypedOperation::new(Self::TYPE_URL, serde_json::to_value(&self)?))
    }
}

fn invalid<M: TypedMsg>(reason: impl Into<String>) -> SdkError {
    SdkError::InvalidPayload {
        type_id: M::TYPE_URL.to_string(),
        reason: reason.into(),
    }
}

fn parse<M: TypedMsg>(payload: &Value) -> SdkResult<M> {
    let msg: M = serde_json::from_value(payload.clone()).map_err(|e| invalid::<M>(e.to_string()))?;
    msg.validate().map_err(invalid::<M>)?;
    Ok(msg)
}

/// Direct-mode encode rule for `M`.
pub fn encode_direct<M: TypedMsg>(payload: &Value) -> SdkResult<Vec<u8>> {
    let msg = parse::<M>(payload)?;
    let proto = msg.to_proto().map_err(invalid::<M>)?;
    Ok(proto.encode_to_vec())
}

/// Direct-mode decode rule for `M`.
pub fn decode_direct<M: TypedMsg>(bytes: &[u8]) -> SdkResult<Value> {
    let proto = M::Proto::decode(bytes)?;
    let msg = M::from_proto(proto).map_err(SdkError::Decode)?;
    Ok(serde_json::to_value(&msg)?)
}

/// Legacy-mode encode rule for `M`. Returns the inner `value` object only;
/// the registry wraps it with the type tag.
pub fn encode_legacy<M: TypedMsg>(payload: &Value) -> SdkResult<Value> {
    let msg = parse::<M>(payload)?;
    msg.to_legacy_value().map_err(invalid::<M>)
}
