//! Integration tests for `SqliteStore` against an in-memory database.

use nation_core::{
  Error as CoreError, NationRecord,
  presence::{PresenceWindow, Registration, register},
  store::{NationStore, StoreError},
  trade::{TradeRequest, apply_trade},
};
use serde_json::{Value, json};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn object(value: Value) -> serde_json::Map<String, Value> {
  value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn new_store_is_empty() {
  let s = store().await;
  assert!(s.load().await.unwrap().is_empty());
  assert!(s.get("Atlantis").await.unwrap().is_none());
}

#[tokio::test]
async fn registration_round_trips_through_the_database() {
  let s = store().await;
  let registration = Registration::from_payload(object(json!({
    "name": "Atlantis",
    "zeta": [1, 2],
    "alpha": { "x": true },
  })))
  .unwrap();

  let name = s
    .update(move |nations| Ok(register(nations, registration, 1_000)))
    .await
    .unwrap();
  assert_eq!(name, "Atlantis");

  let record = s.get("Atlantis").await.unwrap().unwrap();
  assert_eq!(
    serde_json::to_string(&record).unwrap(),
    r#"{"name":"Atlantis","zeta":[1,2],"alpha":{"x":true},"lastSeen":1000}"#
  );
  assert_eq!(
    PresenceWindow::default().online(&s.load().await.unwrap(), 1_000),
    vec!["Atlantis".to_string()]
  );
}

#[tokio::test]
async fn trade_updates_both_rows() {
  let s = store().await;
  let mut atlantis = NationRecord::new();
  atlantis.set_quantity("gold", 100);
  s.update(move |nations| {
    nations.insert("Atlantis".into(), atlantis);
    nations.insert("Lemuria".into(), NationRecord::new());
    Ok(())
  })
  .await
  .unwrap();

  let request = TradeRequest::from_payload(&object(json!({
    "nation": "Atlantis",
    "target": "Lemuria",
    "tradeData": { "gold": 40 },
  })))
  .unwrap();

  let updated = s
    .update(move |nations| apply_trade(nations, &request, 2_000))
    .await
    .unwrap();
  assert_eq!(updated.quantity("gold").unwrap(), 60);

  let lemuria = s.get("Lemuria").await.unwrap().unwrap();
  assert_eq!(lemuria.quantity("gold").unwrap(), 40);
}

#[tokio::test]
async fn domain_errors_are_recoverable_and_write_nothing() {
  let s = store().await;
  let err = s
    .update(|nations| -> nation_core::Result<()> {
      nations.insert("Atlantis".into(), NationRecord::new());
      Err(CoreError::NationNotFound("Mu".into()))
    })
    .await
    .unwrap_err();

  match err.into_domain() {
    Ok(CoreError::NationNotFound(name)) => assert_eq!(name, "Mu"),
    other => panic!("expected NationNotFound, got {other:?}"),
  }
  assert!(s.load().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_rows_are_reported() {
  let s = store().await;
  s.conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO nations (name, record_json) VALUES ('Mu', 'not json')",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  assert!(matches!(s.load().await, Err(Error::Corrupt { .. })));
  assert!(matches!(s.get("Mu").await, Err(Error::Corrupt { ref name, .. }) if name == "Mu"));
}
