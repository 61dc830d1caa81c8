//! Exact decimal money on the JSON boundary.
//!
//! Amounts arrive either as strings (`"50000000.10"`) or as bare JSON numbers
//! (`50000000.10`). Numbers are read through `serde_json`'s
//! `arbitrary_precision` representation so the literal digits reach
//! [`BigDecimal`] without passing through `f64`.

use bigdecimal::BigDecimal;
use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// `deserialize_with` target for monetary input fields
pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text,
        other => {
            return Err(de::Error::custom(format!(
                "expected a decimal number or numeric string, found {other}"
            )))
        }
    };

    BigDecimal::from_str(text.trim())
        .map_err(|err| de::Error::custom(format!("invalid decimal '{text}': {err}")))
}
