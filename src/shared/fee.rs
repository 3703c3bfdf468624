//! Transaction fee and gas price.
//!
//! The engine never picks a gas price or limit. [`Fee::from_gas_price`] only
//! does the arithmetic for values the caller already chose.

use std::collections::HashSet;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{SdkError, SdkResult};
use crate::proto;
use crate::shared::types::Coin;

/// Fee attached to a transaction.
///
/// Invariants: `amount` denoms are unique and `gas_limit > 0`. Use
/// [`Fee::new`] to construct a checked value; builders re-check with
/// [`Fee::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    #[serde(with = "crate::shared::serde_util::u64_string")]
    pub gas_limit: u64,
}

impl Fee {
    pub fn new(amount: Vec<Coin>, gas_limit: u64) -> SdkResult<Self> {
        let fee = Self { amount, gas_limit };
        fee.validate()?;
        Ok(fee)
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.gas_limit == 0 {
            return Err(SdkError::InvalidFee("gas_limit must be greater than 0".into()));
        }
        let mut seen = HashSet::new();
        for coin in &self.amount {
            if coin.denom.is_empty() {
                return Err(SdkError::InvalidFee("empty denom".into()));
            }
            if !seen.insert(coin.denom.as_str()) {
                return Err(SdkError::InvalidFee(format!(
                    "duplicate denom: {}",
                    coin.denom
                )));
            }
        }
        Ok(())
    }

    /// Fee of `ceil(price * gas_limit)` in the price's denomination.
    pub fn from_gas_price(gas_limit: u64, price: &GasPrice) -> SdkResult<Self> {
        let total = price
            .amount
            .checked_mul(Decimal::from(gas_limit))
            .ok_or_else(|| SdkError::InvalidFee("gas price * gas limit overflow".into()))?
            .ceil();
        let amount = total
            .to_u128()
            .ok_or_else(|| SdkError::InvalidFee(format!("fee {} out of range", total)))?;
        Self::new(vec![Coin::new(amount, price.denom.clone())], gas_limit)
    }

    pub fn to_proto(&self) -> proto::Fee {
        proto::Fee {
            amount: self.amount.iter().map(Coin::to_proto).collect(),
            gas_limit: self.gas_limit,
            payer: String::new(),
            granter: String::new(),
        }
    }

    pub fn to_legacy_json(&self) -> Value {
        let amount: Vec<Value> = self.amount.iter().map(Coin::to_legacy_json).collect();
        json!({
            "amount": amount,
            "gas": self.gas_limit.to_string(),
        })
    }
}

/// Price per unit of gas, e.g. `0.025ucosm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub amount: Decimal,
    pub denom: String,
}

impl FromStr for GasPrice {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| SdkError::InvalidFee(format!("gas price '{}' has no denom", s)))?;
        let (amount_str, denom) = s.split_at(split);

        if !denom.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(SdkError::InvalidFee(format!("invalid denom in '{}'", s)));
        }
        let amount = Decimal::from_str(amount_str)
            .map_err(|e| SdkError::InvalidFee(format!("invalid gas price '{}': {}", s, e)))?;
        if amount.is_sign_negative() {
            return Err(SdkError::InvalidFee(format!("negative gas price '{}'", s)));
        }

        Ok(Self {
            amount,
            denom: denom.to_string(),
        })
    }
}

impl std::fmt::Display for GasPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
