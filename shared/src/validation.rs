//! Input coercion helpers for the SiteStock inventory core
//!
//! The HTTP surface accepts numeric fields as JSON numbers or numeric
//! strings. Creation inputs coerce leniently (garbage becomes the default);
//! update inputs are strict and reject anything that does not parse.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Coerce a JSON value to a decimal, if it carries one.
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Lenient numeric field: number, numeric string, or anything else.
/// Non-numeric input becomes None so the caller can apply its default.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_decimal))
}

/// Strict numeric field: absent/null stays None, anything present must
/// parse as a number or deserialization fails.
pub fn strict_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => coerce_decimal(&v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid numeric value: {v}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "lenient_decimal")]
        quantity: Option<Decimal>,
    }

    #[derive(Deserialize)]
    struct Strict {
        #[serde(default, deserialize_with = "strict_decimal")]
        quantity: Option<Decimal>,
    }

    #[test]
    fn lenient_accepts_numbers_and_strings() {
        let v: Lenient = serde_json::from_str(r#"{"quantity": 12.5}"#).unwrap();
        assert_eq!(v.quantity, Some("12.5".parse().unwrap()));
        let v: Lenient = serde_json::from_str(r#"{"quantity": " 7 "}"#).unwrap();
        assert_eq!(v.quantity, Some("7".parse().unwrap()));
    }

    #[test]
    fn lenient_defaults_garbage_to_none() {
        let v: Lenient = serde_json::from_str(r#"{"quantity": "lots"}"#).unwrap();
        assert_eq!(v.quantity, None);
        let v: Lenient = serde_json::from_str(r#"{"quantity": null}"#).unwrap();
        assert_eq!(v.quantity, None);
        let v: Lenient = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(v.quantity, None);
    }

    #[test]
    fn strict_rejects_garbage() {
        assert!(serde_json::from_str::<Strict>(r#"{"quantity": "lots"}"#).is_err());
        let v: Strict = serde_json::from_str(r#"{"quantity": "12"}"#).unwrap();
        assert_eq!(v.quantity, Some("12".parse().unwrap()));
        let v: Strict = serde_json::from_str(r#"{"quantity": null}"#).unwrap();
        assert_eq!(v.quantity, None);
    }
}
