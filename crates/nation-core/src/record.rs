//! Nation records — opaque attribute bags with two reserved meanings.
//!
//! A record is whatever JSON object the client last registered, plus the
//! server-maintained `lastSeen` timestamp and any resource quantities that
//! trades have touched. Field order is preserved so a registered payload is
//! returned exactly as it was sent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Reserved attribute holding the epoch-millisecond presence timestamp.
pub const LAST_SEEN: &str = "lastSeen";

/// The whole store: nation name → record.
pub type Nations = BTreeMap<String, NationRecord>;

/// A single nation's attribute bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationRecord(Map<String, Value>);

impl NationRecord {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// The presence timestamp. Absent or non-numeric values read as `0`,
  /// i.e. offline.
  pub fn last_seen(&self) -> i64 {
    self.0.get(LAST_SEEN).and_then(coerce_quantity).unwrap_or(0)
  }

  pub fn set_last_seen(&mut self, millis: i64) {
    self.0.insert(LAST_SEEN.to_owned(), Value::from(millis));
  }

  /// The integer quantity stored under `key`, `0` when absent.
  ///
  /// Fails with [`Error::InvalidQuantity`] when the stored value cannot be
  /// read as an integer.
  pub fn quantity(&self, key: &str) -> Result<i64> {
    match self.0.get(key) {
      None => Ok(0),
      Some(value) => coerce_quantity(value)
        .ok_or_else(|| Error::InvalidQuantity { key: key.to_owned() }),
    }
  }

  pub fn set_quantity(&mut self, key: &str, quantity: i64) {
    self.0.insert(key.to_owned(), Value::from(quantity));
  }
}

impl From<Map<String, Value>> for NationRecord {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}

/// Read a JSON value as an integer quantity.
///
/// Integers pass through, floats truncate toward zero (saturating at the
/// `i64` bounds), booleans become `0`/`1` and strings are parsed as base-10
/// integers. Everything else is rejected.
pub fn coerce_quantity(value: &Value) -> Option<i64> {
  match value {
    Value::Number(n) => n
      .as_i64()
      .or_else(|| n.as_u64().map(|_| i64::MAX))
      .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
    Value::Bool(b) => Some(i64::from(*b)),
    Value::String(s) => s.trim().parse().ok(),
    Value::Null | Value::Array(_) | Value::Object(_) => None,
  }
}

/// Extract a required, non-empty string field from a request payload.
pub(crate) fn required_str<'a>(payload: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
  payload
    .get(field)
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
}
