//! Staking operation kinds: create and edit a validator.
//!
//! Only structural well-formedness is checked here. Chain-side rules such as
//! the commission change cooldown are not modelled; a violation surfaces as a
//! broadcast `Failure` with the chain's log.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::proto;
use crate::registry::TypedMsg;
use crate::shared::serde_util;
use crate::shared::{format_dec, from_atomics, to_atomics, Coin, PublicKey};

// ============================================================================
// Description
// ============================================================================

/// Human-readable validator metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub moniker: String,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub security_contact: String,
    #[serde(default)]
    pub details: String,
}

impl Description {
    fn to_proto(&self) -> proto::Description {
        proto::Description {
            moniker: self.moniker.clone(),
            identity: self.identity.clone(),
            website: self.website.clone(),
            security_contact: self.security_contact.clone(),
            details: self.details.clone(),
        }
    }

    fn from_proto(proto: proto::Description) -> Self {
        Self {
            moniker: proto.moniker,
            identity: proto.identity,
            website: proto.website,
            security_contact: proto.security_contact,
            details: proto.details,
        }
    }

    fn to_legacy_value(&self) -> Value {
        serde_json::json!({
            "details": self.details,
            "identity": self.identity,
            "moniker": self.moniker,
            "security_contact": self.security_contact,
            "website": self.website,
        })
    }
}

// ============================================================================
// CommissionRates
// ============================================================================

/// Commission parameters fixed at validator creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRates {
    pub rate: Decimal,
    pub max_rate: Decimal,
    pub max_change_rate: Decimal,
}

impl CommissionRates {
    fn to_proto(&self) -> Result<proto::CommissionRates, String> {
        Ok(proto::CommissionRates {
            rate: to_atomics(self.rate).map_err(|e| format!("rate: {}", e))?,
            max_rate: to_atomics(self.max_rate).map_err(|e| format!("max_rate: {}", e))?,
            max_change_rate: to_atomics(self.max_change_rate)
                .map_err(|e| format!("max_change_rate: {}", e))?,
        })
    }

    fn from_proto(proto: proto::CommissionRates) -> Result<Self, String> {
        Ok(Self {
            rate: from_atomics(&proto.rate).map_err(|e| e.to_string())?,
            max_rate: from_atomics(&proto.max_rate).map_err(|e| e.to_string())?,
            max_change_rate: from_atomics(&proto.max_change_rate).map_err(|e| e.to_string())?,
        })
    }

    fn to_legacy_value(&self) -> Result<Value, String> {
        Ok(serde_json::json!({
            "max_change_rate": format_dec(self.max_change_rate).map_err(|e| e.to_string())?,
            "max_rate": format_dec(self.max_rate).map_err(|e| e.to_string())?,
            "rate": format_dec(self.rate).map_err(|e| e.to_string())?,
        }))
    }
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("missing required field: {}", field));
    }
    Ok(())
}

// ============================================================================
// MsgCreateValidator
// ============================================================================

/// Register a new validator with a self-delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateValidator {
    pub description: Description,
    pub commission: CommissionRates,
    #[serde(with = "serde_util::u128_string")]
    pub min_self_delegation: u128,
    pub delegator_address: String,
    pub validator_address: String,
    /// Consensus key of the validator node.
    pub pubkey: PublicKey,
    /// Initial self-delegation.
    pub value: Coin,
}

impl TypedMsg for MsgCreateValidator {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgCreateValidator";
    const LEGACY_TYPE: Option<&'static str> = Some("cosmos-sdk/MsgCreateValidator");
    type Proto = proto::MsgCreateValidator;

    fn validate(&self) -> Result<(), String> {
        require("delegator_address", &self.delegator_address)?;
        require("validator_address", &self.validator_address)?;
        require("value.denom", &self.value.denom)?;
        self.pubkey.validate()
    }

    fn to_proto(&self) -> Result<Self::Proto, String> {
        Ok(proto::MsgCreateValidator {
            description: Some(self.description.to_proto()),
            commission: Some(self.commission.to_proto()?),
            min_self_delegation: self.min_self_delegation.to_string(),
            delegator_address: self.delegator_address.clone(),
            validator_address: self.validator_address.clone(),
            pubkey: Some(self.pubkey.to_any()),
            value: Some(self.value.to_proto()),
        })
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, String> {
        let commission = proto.commission.ok_or("missing commission")?;
        let pubkey = proto.pubkey.ok_or("missing pubkey")?;
        let value = proto.value.ok_or("missing value")?;

        Ok(Self {
            description: Description::from_proto(proto.description.unwrap_or_default()),
            commission: CommissionRates::from_proto(commission)?,
            min_self_delegation: proto
                .min_self_delegation
                .parse()
                .map_err(|e| format!("min_self_delegation: {}", e))?,
            delegator_address: proto.delegator_address,
            validator_address: proto.validator_address,
            pubkey: PublicKey::from_any(&pubkey)?,
            value: Coin::from_proto(&value)?,
        })
    }

    fn to_legacy_value(&self) -> Result<Value, String> {
        Ok(serde_json::json!({
            "commission": self.commission.to_legacy_value()?,
            "delegator_address": self.delegator_address,
            "description": self.description.to_legacy_value(),
            "min_self_delegation": self.min_self_delegation.to_string(),
            "pubkey": self.pubkey.to_legacy_json(),
            "validator_address": self.validator_address,
            "value": self.value.to_legacy_json(),
        }))
    }
}

// ============================================================================
// MsgEditValidator
// ============================================================================

/// Update an existing validator's description and optionally its commission
/// rate or minimum self-delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEditValidator {
    pub description: Description,
    pub validator_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_util::opt_u128_string"
    )]
    pub min_self_delegation: Option<u128>,
}

impl TypedMsg for MsgEditValidator {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgEditValidator";
    const LEGACY_TYPE: Option<&'static str> = Some("cosmos-sdk/MsgEditValidator");
    type Proto = proto::MsgEditValidator;

    fn validate(&self) -> Result<(), String> {
        require("validator_address", &self.validator_address)
    }

    fn to_proto(&self) -> Result<Self::Proto, String> {
        let commission_rate = match self.commission_rate {
            Some(rate) => to_atomics(rate).map_err(|e| format!("commission_rate: {}", e))?,
            None => String::new(),
        };

        Ok(proto::MsgEditValidator {
            description: Some(self.description.to_proto()),
            validator_address: self.validator_address.clone(),
            commission_rate,
            min_self_delegation: self
                .min_self_delegation
                .map(|v| v.to_string())
                .unwrap_or_default(),
        })
    }

    fn from_proto(proto: Self::Proto) -> Result<Self, String> {
        let commission_rate = if proto.commission_rate.is_empty() {
            None
        } else {
            Some(from_atomics(&proto.commission_rate).map_err(|e| e.to_string())?)
        };
        let min_self_delegation = if proto.min_self_delegation.is_empty() {
            None
        } else {
            Some(
                proto
                    .min_self_delegation
                    .parse()
                    .map_err(|e| format!("min_self_delegation: {}", e))?,
            )
        };

        Ok(Self {
            description: Description::from_proto(proto.description.unwrap_or_default()),
            validator_address: proto.validator_address,
            commission_rate,
            min_self_delegation,
        })
    }

    fn to_legacy_value(&self) -> Result<Value, String> {
        let mut value = Map::new();
        if let Some(rate) = self.commission_rate {
            let rendered = format_dec(rate).map_err(|e| format!("commission_rate: {}", e))?;
            value.insert("commission_rate".into(), Value::String(rendered));
        }
        value.insert("description".into(), self.description.to_legacy_value());
        if let Some(min) = self.min_self_delegation {
            value.insert("min_self_delegation".into(), Value::String(min.to_string()));
        }
        value.insert(
            "validator_address".into(),
            Value::String(self.validator_address.clone()),
        );
        Ok(Value::Object(value))
    }
}
