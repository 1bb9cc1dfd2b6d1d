//! Forgiving deserializers for caller bodies and model replies.
//!
//! A single mistyped field should cost that field, not the whole request:
//! values that cannot be read fall back to `None`, the type's default, or
//! are skipped from a list.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::assessment::Domain;

fn number_to_u64(value: &Value) -> Option<u64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    let rounded = f.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > u64::MAX as f64 {
        return None;
    }
    Some(rounded as u64)
}

/// Reads a 0–255 level from an integer, a float (rounded) or a numeric string.
///
/// ```json
/// { "motivationLevel": 2 }      // Some(2)
/// { "motivationLevel": 3.5 }    // Some(4)
/// { "motivationLevel": "1" }    // Some(1)
/// { "motivationLevel": "low" }  // None
/// ```
pub fn de_option_u8_forgiving<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = number_to_u64(&value).and_then(|n| u8::try_from(n).ok());
    if parsed.is_none() && !value.is_null() {
        tracing::debug!("ignoring unreadable level value: {}", value);
    }
    Ok(parsed)
}

/// Like [`de_option_u8_forgiving`], for counts such as XP or minutes.
pub fn de_option_u32_forgiving<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_to_u64(&value).and_then(|n| u32::try_from(n).ok()))
}

/// Accepts any spelling of a domain name; unknown names become `None`.
pub fn de_option_domain_forgiving<'de, D>(deserializer: D) -> Result<Option<Domain>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(Domain::from_loose))
}

/// Decodes `T`, or yields `T::default()` when the value has the wrong shape.
pub fn de_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::debug!("field unreadable, using default: {}", e);
        T::default()
    }))
}

/// Decodes a list, dropping the elements that do not decode.
pub fn de_vec_skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::debug!("expected a list, got {}", other);
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!("skipping unreadable list entry: {}", e);
                None
            }
        })
        .collect())
}
