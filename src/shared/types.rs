//! Shared value types used by messages, fees, and signer infos.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::proto;
use crate::shared::serde_util;

/// Type URL of an ed25519 public key in direct mode.
pub const ED25519_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.ed25519.PubKey";

/// Legacy JSON type tag of an ed25519 public key.
pub const ED25519_PUBKEY_LEGACY_TYPE: &str = "tendermint/PubKeyEd25519";

/// Ed25519 public key length in bytes.
pub const ED25519_PUBKEY_LEN: usize = 32;

/// Type URL of a secp256k1 public key in direct mode.
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Legacy JSON type tag of a secp256k1 public key.
pub const SECP256K1_PUBKEY_LEGACY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// Compressed SEC1 secp256k1 public key length in bytes.
pub const SECP256K1_PUBKEY_LEN: usize = 33;

// ============================================================================
// Coin
// ============================================================================

/// An amount of a single denomination.
///
/// `amount` is an integer in the denomination's base unit and serializes as a
/// decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "serde_util::u128_string")]
    pub amount: u128,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn to_proto(&self) -> proto::Coin {
        proto::Coin {
            denom: self.denom.clone(),
            amount: self.amount.to_string(),
        }
    }

    pub fn from_proto(coin: &proto::Coin) -> Result<Self, String> {
        let amount = coin
            .amount
            .parse::<u128>()
            .map_err(|e| format!("Invalid amount '{}': {}", coin.amount, e))?;
        Ok(Self::new(amount, coin.denom.clone()))
    }

    pub fn to_legacy_json(&self) -> Value {
        json!({
            "amount": self.amount.to_string(),
            "denom": self.denom,
        })
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

// ============================================================================
// PublicKey
// ============================================================================

/// A public key, tagged by algorithm.
///
/// Serializes as `{"type": "secp256k1", "key": "<base64>"}`. Account keys are
/// normally secp256k1 (compressed), validator consensus keys ed25519.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "snake_case")]
pub enum PublicKey {
    Ed25519(#[serde(with = "serde_util::base64_bytes")] Vec<u8>),
    Secp256k1(#[serde(with = "serde_util::base64_bytes")] Vec<u8>),
}

impl PublicKey {
    pub fn ed25519(bytes: [u8; ED25519_PUBKEY_LEN]) -> Self {
        PublicKey::Ed25519(bytes.to_vec())
    }

    pub fn secp256k1(bytes: [u8; SECP256K1_PUBKEY_LEN]) -> Self {
        PublicKey::Secp256k1(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(bytes) | PublicKey::Secp256k1(bytes) => bytes,
        }
    }

    pub fn type_url(&self) -> &'static str {
        match self {
            PublicKey::Ed25519(_) => ED25519_PUBKEY_TYPE_URL,
            PublicKey::Secp256k1(_) => SECP256K1_PUBKEY_TYPE_URL,
        }
    }

    fn legacy_type(&self) -> &'static str {
        match self {
            PublicKey::Ed25519(_) => ED25519_PUBKEY_LEGACY_TYPE,
            PublicKey::Secp256k1(_) => SECP256K1_PUBKEY_LEGACY_TYPE,
        }
    }

    /// Check the key length matches the algorithm.
    pub fn validate(&self) -> Result<(), String> {
        let (algorithm, expected) = match self {
            PublicKey::Ed25519(_) => ("ed25519", ED25519_PUBKEY_LEN),
            PublicKey::Secp256k1(_) => ("secp256k1", SECP256K1_PUBKEY_LEN),
        };
        let actual = self.as_bytes().len();
        if actual != expected {
            return Err(format!(
                "{} key must be {} bytes, got {}",
                algorithm, expected, actual
            ));
        }
        Ok(())
    }

    pub fn to_any(&self) -> proto::Any {
        use prost::Message;

        proto::Any {
            type_url: self.type_url().to_string(),
            value: proto::PubKey {
                key: self.as_bytes().to_vec(),
            }
            .encode_to_vec(),
        }
    }

    pub fn from_any(any: &proto::Any) -> Result<Self, String> {
        use prost::Message;

        let wrap: fn(Vec<u8>) -> PublicKey = match any.type_url.as_str() {
            ED25519_PUBKEY_TYPE_URL => PublicKey::Ed25519,
            SECP256K1_PUBKEY_TYPE_URL => PublicKey::Secp256k1,
            other => return Err(format!("Unsupported public key type: {}", other)),
        };
        let key = proto::PubKey::decode(any.value.as_slice())
            .map_err(|e| format!("Invalid public key: {}", e))?;
        Ok(wrap(key.key))
    }

    pub fn to_legacy_json(&self) -> Value {
        json!({
            "type": self.legacy_type(),
            "value": STANDARD.encode(self.as_bytes()),
        })
    }

    /// Hex encoding of the raw key, for logs and diagnostics.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}
