//! REST gateway wire types (`/cosmos/tx/v1beta1/...`).

use serde::{Deserialize, Serialize};

use crate::shared::serde_util;

/// Body of `POST /cosmos/tx/v1beta1/txs`.
#[derive(Serialize, Debug, Clone)]
pub struct BroadcastTxRequest {
    /// Base64 `TxRaw` bytes.
    pub tx_bytes: String,
    /// `BROADCAST_MODE_SYNC` or `BROADCAST_MODE_ASYNC`.
    pub mode: String,
}

/// Response of both the broadcast and the lookup endpoints.
#[derive(Deserialize, Debug, Clone)]
pub struct TxResponseEnvelope {
    pub tx_response: TxResponse,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TxResponse {
    #[serde(default, with = "serde_util::u64_string")]
    pub height: u64,
    #[serde(default)]
    pub txhash: String,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default, with = "serde_util::u64_string")]
    pub gas_wanted: u64,
    #[serde(default, with = "serde_util::u64_string")]
    pub gas_used: u64,
    #[serde(default)]
    pub events: Vec<WireEvent>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<WireAttribute>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WireAttribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}
