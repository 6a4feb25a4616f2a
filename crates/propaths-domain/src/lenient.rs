//! Forgiving field decoders for payload documents
//!
//! Worker output is not always well typed. These decoders read the raw JSON
//! value and coerce what they can; anything unusable becomes absent so the
//! validator can flag or default it instead of the whole document failing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Text of a scalar; `None` for null, arrays and objects
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A protein symbol; null or structured values become an empty symbol
pub(crate) fn symbol<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value).map(|s| s.trim().to_string()).unwrap_or_default())
}

/// A hop count from a number or numeric string; anything else is dropped
pub(crate) fn depth<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|d| u32::try_from(d).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    })
}

/// Symbols from a list, or a single symbol from a bare string
pub(crate) fn symbol_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(strings(&items)),
        Value::String(s) if s.trim().is_empty() => Some(Vec::new()),
        Value::String(s) => Some(vec![s.trim().to_string()]),
        _ => None,
    })
}

/// Direction buckets; null or malformed buckets become empty
pub(crate) fn buckets<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(BTreeMap::new());
    };

    Ok(map
        .into_iter()
        .map(|(bucket, arrows)| {
            let arrows = match arrows {
                Value::Array(items) => strings(&items),
                Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
                _ => Vec::new(),
            };
            (bucket, arrows)
        })
        .collect())
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(scalar_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
