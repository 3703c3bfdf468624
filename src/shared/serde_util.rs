//! Custom serde helpers for chain wire formats.
//!
//! Chain JSON encodes 64-bit and wider integers as strings and byte fields as
//! standard base64.

/// `u64` carried as a base-10 string.
///
/// Deserialization also accepts a bare JSON number, since some gateways are
/// inconsistent about quoting.
pub mod u64_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(u64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(n),
            Raw::Str(s) => s
                .parse::<u64>()
                .map_err(|e| serde::de::Error::custom(format!("Invalid u64 '{}': {}", s, e))),
        }
    }
}

/// `u128` carried as a base-10 string. Monetary amounts never go through
/// floating point.
pub mod u128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<u128>()
            .map_err(|e| serde::de::Error::custom(format!("Invalid amount '{}': {}", s, e)))
    }
}

/// `Option<u128>` carried as a base-10 string, `None` when absent.
pub mod opt_u128_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|s| {
                s.parse::<u128>()
                    .map_err(|e| serde::de::Error::custom(format!("Invalid amount '{}': {}", s, e)))
            })
            .transpose()
    }
}

/// `Vec<u8>` carried as standard base64.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD
            .decode(s.as_bytes())
            .map_err(|e| serde::de::Error::custom(format!("Invalid base64: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wire {
        #[serde(with = "super::u64_string")]
        height: u64,
        #[serde(with = "super::u128_string")]
        amount: u128,
        #[serde(with = "super::base64_bytes")]
        key: Vec<u8>,
    }

    #[test]
    fn test_integers_serialize_as_strings() {
        let wire = Wire {
            height: 42,
            amount: 340_282_366_920_938_463_463_374_607_431_768_211_455,
            key: vec![1, 2, 3],
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["height"], "42");
        assert_eq!(json["amount"], "340282366920938463463374607431768211455");
        assert_eq!(json["key"], "AQID");
    }

    #[test]
    fn test_u64_accepts_bare_number() {
        let wire: Wire =
            serde_json::from_str(r#"{"height":7,"amount":"1","key":""}"#).unwrap();
        assert_eq!(wire.height, 7);
        assert!(wire.key.is_empty());
    }

    #[test]
    fn test_rejects_non_numeric_amount() {
        let result: Result<Wire, _> =
            serde_json::from_str(r#"{"height":"1","amount":"1.5","key":""}"#);
        assert!(result.is_err());
    }
}
