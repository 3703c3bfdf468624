//! Message registry: maps a type id to its encode/decode rules.
//!
//! The registry holds two tables keyed by the same type id:
//! - the direct table (protobuf encode/decode rules), required for every kind
//! - the legacy table (legacy JSON type tag + value rule), optional, since some
//!   kinds support only direct mode
//!
//! The legacy tag (`cosmos-sdk/MsgCreateValidator`) is not derivable from the
//! direct type id (`/cosmos.staking.v1beta1.MsgCreateValidator`), which is why
//! the tables are kept apart.
//!
//! Registration is configuration: do it once at startup, then share the
//! registry immutably (e.g. in an `Arc`) while signing. Re-registering a type
//! id replaces the previous rule.

pub mod codec;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{SdkError, SdkResult};
use crate::msgs::{MsgCreateValidator, MsgEditValidator, MsgSend};
use crate::proto;

pub use codec::TypedMsg;

/// Direct-mode encode rule. Must be injective over well-formed payloads.
pub type EncodeFn = fn(&Value) -> SdkResult<Vec<u8>>;

/// Direct-mode decode rule.
pub type DecodeFn = fn(&[u8]) -> SdkResult<Value>;

/// Legacy-mode rule producing the message's JSON `value` object.
pub type LegacyEncodeFn = fn(&Value) -> SdkResult<Value>;

// ============================================================================
// TypedOperation
// ============================================================================

/// One operation in a transaction: a registered type id plus its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedOperation {
    pub type_id: String,
    pub payload: Value,
}

impl TypedOperation {
    pub fn new(type_id: impl Into<String>, payload: Value) -> Self {
        Self {
            type_id: type_id.into(),
            payload,
        }
    }
}

// ============================================================================
// Registry tables
// ============================================================================

#[derive(Clone, Copy)]
struct DirectCodec {
    encode: EncodeFn,
    decode: DecodeFn,
}

#[derive(Clone)]
struct LegacyCodec {
    type_name: String,
    encode: LegacyEncodeFn,
}

/// Registry of supported operation kinds.
#[derive(Clone, Default)]
pub struct MessageRegistry {
    direct: HashMap<String, DirectCodec>,
    legacy: HashMap<String, LegacyCodec>,
}

impl std::fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageRegistry")
            .field("type_ids", &self.type_ids())
            .field("legacy_types", &self.legacy.len())
            .finish()
    }
}

impl MessageRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the staking and bank kinds this SDK ships.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_msg::<MsgCreateValidator>();
        registry.register_msg::<MsgEditValidator>();
        registry.register_msg::<MsgSend>();
        registry
    }

    /// Register (or replace) the direct-mode rules for `type_id`.
    pub fn register(&mut self, type_id: impl Into<String>, encode: EncodeFn, decode: DecodeFn) {
        let type_id = type_id.into();
        if self
            .direct
            .insert(type_id.clone(), DirectCodec { encode, decode })
            .is_some()
        {
            tracing::debug!(type_id = %type_id, "Replaced direct codec");
        }
    }

    /// Register (or replace) the legacy JSON mapping for `type_id`.
    pub fn register_legacy(
        &mut self,
        type_id: impl Into<String>,
        type_name: impl Into<String>,
        encode: LegacyEncodeFn,
    ) {
        self.legacy.insert(
            type_id.into(),
            LegacyCodec {
                type_name: type_name.into(),
                encode,
            },
        );
    }

    /// Register a typed message kind in both tables.
    ///
    /// A kind without a legacy tag clears any previous legacy mapping for the
    /// same type id.
    pub fn register_msg<M: TypedMsg>(&mut self) {
        self.register(
            M::TYPE_URL,
            codec::encode_direct::<M>,
            codec::decode_direct::<M>,
        );
        match M::LEGACY_TYPE {
            Some(name) => self.register_legacy(M::TYPE_URL, name, codec::encode_legacy::<M>),
            None => {
                self.legacy.remove(M::TYPE_URL);
            }
        }
    }

    pub fn is_registered(&self, type_id: &str) -> bool {
        self.direct.contains_key(type_id)
    }

    pub fn supports_legacy(&self, type_id: &str) -> bool {
        self.direct.contains_key(type_id) && self.legacy.contains_key(type_id)
    }

    /// Registered type ids, sorted.
    pub fn type_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.direct.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    fn direct_codec(&self, type_id: &str) -> SdkResult<&DirectCodec> {
        self.direct
            .get(type_id)
            .ok_or_else(|| SdkError::UnknownTypeId(type_id.to_string()))
    }

    fn legacy_codec(&self, type_id: &str) -> SdkResult<&LegacyCodec> {
        self.direct_codec(type_id)?;
        self.legacy
            .get(type_id)
            .ok_or_else(|| SdkError::UnsupportedLegacyEncoding(type_id.to_string()))
    }

    /// Encode a payload with the direct rule for `type_id`.
    pub fn encode(&self, type_id: &str, payload: &Value) -> SdkResult<Vec<u8>> {
        (self.direct_codec(type_id)?.encode)(payload)
    }

    /// Decode bytes back into a payload with the direct rule for `type_id`.
    pub fn decode(&self, type_id: &str, bytes: &[u8]) -> SdkResult<Value> {
        (self.direct_codec(type_id)?.decode)(bytes)
    }

    /// Legacy tag for `type_id`.
    pub fn legacy_type_name(&self, type_id: &str) -> SdkResult<&str> {
        Ok(self.legacy_codec(type_id)?.type_name.as_str())
    }

    /// Encode an operation as an `Any` for the direct transaction body.
    pub fn encode_any(&self, operation: &TypedOperation) -> SdkResult<proto::Any> {
        Ok(proto::Any {
            type_url: operation.type_id.clone(),
            value: self.encode(&operation.type_id, &operation.payload)?,
        })
    }

    /// Encode an operation as a legacy `{"type": .., "value": ..}` object.
    pub fn encode_legacy(&self, operation: &TypedOperation) -> SdkResult<Value> {
        let codec = self.legacy_codec(&operation.type_id)?;
        let value = (codec.encode)(&operation.payload)?;
        Ok(json!({
            "type": codec.type_name,
            "value": value,
        }))
    }
}
