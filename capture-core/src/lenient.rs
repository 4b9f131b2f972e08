//! Forgiving field readers: wrong JSON types read as missing.
//!
//! The storefront shim serializes whatever the page holds, so a field may
//! carry a DOM handle, a numeric string or `null` where a typed value is
//! expected. One bad field never fails the surrounding snapshot.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::geometry::Point;
use crate::object::FabricCanvas;

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(as_number(&Value::deserialize(d)?))
}

/// Like [`number`], with missing read as `0`.
pub fn number_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(number(d)?.unwrap_or(0.0))
}

pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Bool(b) => Some(b),
        _ => None,
    })
}

/// Any typed value; unreadable input is `None`.
pub fn value<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(d)?).ok())
}

/// A canvas instance; anything but a JSON object (a DOM handle, a string) is `None`.
pub fn canvas<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FabricCanvas>, D::Error> {
    let raw = Value::deserialize(d)?;
    if !raw.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(raw).ok())
}

pub fn points<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Point>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| {
                    Some(Point {
                        x: as_number(item.get("x")?)?,
                        y: as_number(item.get("y")?)?,
                    })
                })
                .collect(),
        ),
        _ => None,
    })
}

/// A list whose unreadable entries are dropped with a warning.
pub fn list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(d)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Dropping unreadable entry {index}: {e}");
                None
            }
        })
        .collect())
}
