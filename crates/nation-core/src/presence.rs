//! Presence tracking: registration, logoff and the online window.
//!
//! A nation is online when its `lastSeen` timestamp is strictly newer than
//! `now - window`. Logging off writes the `0` sentinel, which is offline for
//! any positive `now`.

use std::time::Duration;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  record::{NationRecord, Nations, required_str},
};

/// Five minutes, in milliseconds.
pub const DEFAULT_WINDOW_MS: i64 = 5 * 60 * 1000;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
  Utc::now().timestamp_millis()
}

/// How recently a nation must have been seen to count as online.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceWindow {
  millis: i64,
}

impl PresenceWindow {
  pub fn from_millis(millis: i64) -> Self {
    Self { millis: millis.max(0) }
  }

  pub fn from_duration(duration: Duration) -> Self {
    Self::from_millis(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
  }

  pub fn as_millis(&self) -> i64 {
    self.millis
  }

  /// Timestamps must be strictly greater than this to be online.
  pub fn threshold(&self, now: i64) -> i64 {
    now.saturating_sub(self.millis)
  }

  pub fn is_online(&self, record: &NationRecord, now: i64) -> bool {
    record.last_seen() > self.threshold(now)
  }

  /// Names of every online nation, in name order.
  pub fn online(&self, nations: &Nations, now: i64) -> Vec<String> {
    nations
      .iter()
      .filter(|(_, record)| self.is_online(record, now))
      .map(|(name, _)| name.clone())
      .collect()
  }
}

impl Default for PresenceWindow {
  fn default() -> Self {
    Self::from_millis(DEFAULT_WINDOW_MS)
  }
}

/// A validated `POST /online` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
  pub name:   String,
  /// The full payload, `name` included, to be stored as the nation's record.
  pub record: NationRecord,
}

impl Registration {
  /// The payload must carry a non-empty string `name`, else
  /// [`Error::MissingName`].
  pub fn from_payload(payload: Map<String, Value>) -> Result<Self> {
    let name = payload_name(&payload)?.to_owned();
    Ok(Self { name, record: NationRecord::from(payload) })
  }
}

/// Store a registration as the nation's full record, stamping `lastSeen`
/// with `now`. Any previous record under that name is replaced wholesale.
/// Returns the registered name.
pub fn register(nations: &mut Nations, registration: Registration, now: i64) -> String {
  let Registration { name, mut record } = registration;
  record.set_last_seen(now);
  if nations.insert(name.clone(), record).is_none() {
    tracing::info!(nation = %name, "registered new nation");
  }
  name
}

/// Mark `name` offline by resetting its `lastSeen` to `0`.
pub fn log_off(nations: &mut Nations, name: &str) -> Result<()> {
  let record = nations
    .get_mut(name)
    .ok_or_else(|| Error::NationNotFound(name.to_owned()))?;
  record.set_last_seen(0);
  Ok(())
}

/// Pull the required nation `name` out of a request payload.
pub fn payload_name(payload: &Map<String, Value>) -> Result<&str> {
  required_str(payload, "name").ok_or(Error::MissingName)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  const NOW: i64 = 1_700_000_000_000;

  fn payload(value: Value) -> Map<String, Value> {
    match value {
      Value::Object(map) => map,
      other => panic!("not an object: {other}"),
    }
  }

  fn registration(value: Value) -> Registration {
    Registration::from_payload(payload(value)).unwrap()
  }

  fn seen_at(last_seen: i64) -> NationRecord {
    let mut record = NationRecord::new();
    record.set_last_seen(last_seen);
    record
  }

  #[test]
  fn window_boundary_is_exclusive() {
    let window = PresenceWindow::default();
    let mut nations = Nations::new();
    nations.insert("fresh".into(), seen_at(NOW - 299_999));
    nations.insert("edge".into(), seen_at(NOW - 300_000));
    nations.insert("stale".into(), seen_at(NOW - 300_001));

    assert_eq!(window.online(&nations, NOW), vec!["fresh".to_string()]);
  }

  #[test]
  fn missing_last_seen_is_offline() {
    let mut nations = Nations::new();
    nations.insert("ghost".into(), NationRecord::new());
    assert!(PresenceWindow::default().online(&nations, NOW).is_empty());
  }

  #[test]
  fn window_from_duration() {
    let window = PresenceWindow::from_duration(Duration::from_secs(60));
    assert_eq!(window.as_millis(), 60_000);
    assert_eq!(window.threshold(NOW), NOW - 60_000);
  }

  #[test]
  fn register_stamps_and_replaces() {
    let mut nations = Nations::new();
    let name = register(
      &mut nations,
      registration(json!({ "name": "Atlantis", "gold": 100, "motto": "deep" })),
      NOW,
    );
    assert_eq!(name, "Atlantis");

    let record = &nations["Atlantis"];
    assert_eq!(record.last_seen(), NOW);
    assert_eq!(record.get("name"), Some(&json!("Atlantis")));
    assert_eq!(record.get("gold"), Some(&json!(100)));

    register(&mut nations, registration(json!({ "name": "Atlantis" })), NOW + 1);
    let record = &nations["Atlantis"];
    assert_eq!(record.last_seen(), NOW + 1);
    assert!(record.get("gold").is_none(), "registration replaces the record");
  }

  #[test]
  fn registration_requires_a_name() {
    for bad in [json!({}), json!({ "name": "" }), json!({ "name": 7 }), json!({ "name": null })] {
      assert!(matches!(
        Registration::from_payload(payload(bad)),
        Err(Error::MissingName)
      ));
    }
  }

  #[test]
  fn registration_keeps_the_whole_payload() {
    let parsed = registration(json!({ "name": "Mu", "gold": 1 }));
    assert_eq!(parsed.name, "Mu");
    assert_eq!(parsed.record.get("name"), Some(&json!("Mu")));
    assert_eq!(parsed.record.get("gold"), Some(&json!(1)));
    assert_eq!(parsed.record.last_seen(), 0);
  }

  #[test]
  fn log_off_resets_last_seen_but_keeps_record() {
    let mut nations = Nations::new();
    register(&mut nations, registration(json!({ "name": "Atlantis", "gold": 3 })), NOW);

    log_off(&mut nations, "Atlantis").unwrap();
    assert_eq!(nations["Atlantis"].last_seen(), 0);
    assert_eq!(nations["Atlantis"].get("gold"), Some(&json!(3)));
    assert!(PresenceWindow::default().online(&nations, NOW).is_empty());
  }

  #[test]
  fn log_off_unknown_nation() {
    let mut nations = Nations::new();
    match log_off(&mut nations, "Lemuria") {
      Err(Error::NationNotFound(name)) => assert_eq!(name, "Lemuria"),
      other => panic!("expected NationNotFound, got {other:?}"),
    }
  }

  #[test]
  fn payload_name_validation() {
    assert_eq!(payload_name(&payload(json!({ "name": "Mu" }))).unwrap(), "Mu");
    assert!(matches!(payload_name(&payload(json!({}))), Err(Error::MissingName)));
  }
}
