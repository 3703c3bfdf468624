//! Bank operation kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::proto;
use crate::registry::TypedMsg;
use crate::shared::Coin;

/// Transfer coins between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Vec<Coin>,
}

impl TypedMsg for MsgSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";
    const LEGACY_TYPE: Option<&'static str> = Some("cosmos-sdk/MsgSend");
    type Proto = proto::MsgSend;

    fn validate(&self) -> Result<(), String> {
        if self.from_address.is_empty() {
            return Err("missing required field: from_address".into());
        }
        if self.to_address.is_empty() {
            return Err("missing required field: to_address".into());
        }
        if self.amount.is_empty() {
            return Err("amount must contain at least one coin".into());
        }
        if self.amount.iter().any(|c| c.denom.is_empty()) {
            return Err("coin denom must not be empty".into());
        }
        Ok(())
    }

    fn to_proto(&self) -> Result<Self::Proto, String> {
        Ok(proto::MsgSend {
            from_address: self.from_address.clone(),
            to_address: self.to_address.clone(),
            amount: self.amount.iter().map(Coin::to_proto).collect(),
        })
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, String> {
        Ok(Self {
            from_address: proto.from_address,
            to_address: proto.to_address,
            amount: proto
                .amount
                .iter()
                .map(Coin::from_proto)
                .collect::<Result<_, _>>()?,
        })
    }

    fn to_legacy_value(&self) -> Result<Value, String> {
        Ok(serde_json::json!({
            "amount": self.amount.iter().map(Coin::to_legacy_json).collect::<Vec<_>>(),
            "from_address": self.from_address,
            "to_address": self.to_address,
        }))
    }
}
