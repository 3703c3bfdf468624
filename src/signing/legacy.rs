//! Legacy JSON builder: `StdSignDoc` with sorted keys.
//!
//! Integers are rendered as decimal strings, byte fields as base64, and the
//! output is compact JSON with `&`, `<` and `>` written as unicode escapes.

use serde_json::{json, Map, Value};

use crate::error::{SdkError, SdkResult};
use crate::registry::MessageRegistry;
use crate::signing::{SignerData, UnsignedTx};

/// Legacy JSON signing document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyJsonDoc {
    pub json: String,
}

impl LegacyJsonDoc {
    /// Parse the document back into a JSON value.
    pub fn to_value(&self) -> SdkResult<Value> {
        Ok(serde_json::from_str(&self.json)?)
    }
}

/// Rebuild every object with its keys in lexicographic order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

fn escape_html(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '&' => out.push_str("\\u0026"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            c => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
pub struct LegacyJsonBuilder<'a> {
    registry: &'a MessageRegistry,
}

impl<'a> LegacyJsonBuilder<'a> {
    pub fn new(registry: &'a MessageRegistry) -> Self {
        Self { registry }
    }

    pub fn build(&self, tx: &UnsignedTx, signer: &SignerData) -> SdkResult<LegacyJsonDoc> {
        tx.fee.validate()?;
        if !tx.signer_infos.iter().any(|info| info.sequence == signer.sequence) {
            return Err(SdkError::SequenceMismatch {
                sequence: signer.sequence,
            });
        }
        let msgs = tx
            .operations
            .iter()
            .map(|op| self.registry.encode_legacy(op))
            .collect::<SdkResult<Vec<_>>>()?;

        let doc = json!({
            "account_number": signer.account_number.to_string(),
            "chain_id": signer.chain_id,
            "fee": tx.fee.to_legacy_json(),
            "memo": tx.memo,
            "msgs": msgs,
            "sequence": signer.sequence.to_string(),
        });

        let json = serde_json::to_string(&sort_keys(doc))?;
        Ok(LegacyJsonDoc {
            json: escape_html(&json),
        })
    }
}
