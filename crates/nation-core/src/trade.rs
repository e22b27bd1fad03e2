//! The trade applicator.
//!
//! A trade moves quantities from a sender record to a target record, one key
//! at a time. Requested deltas are clamped to be non-negative and the
//! sender's balance is floored at zero. The target is always credited with
//! the full clamped delta, even when the sender could not cover it; callers
//! that want insufficient-balance trades rejected must check first.

use serde_json::{Map, Value};

use crate::{
  Error, Result,
  record::{NationRecord, Nations, coerce_quantity, required_str},
};

/// A validated `POST /trade` request.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRequest {
  pub sender: String,
  pub target: String,
  /// Resource key → requested delta, in payload order. Values are coerced
  /// when the trade is applied.
  pub items:  Map<String, Value>,
}

impl TradeRequest {
  /// Parse `{nation, target, tradeData}`.
  ///
  /// `nation` and `target` must be non-empty strings and `tradeData` a
  /// non-empty object; anything else is [`Error::MissingTradeParameters`].
  pub fn from_payload(payload: &Map<String, Value>) -> Result<Self> {
    let sender = required_str(payload, "nation");
    let target = required_str(payload, "target");
    let items = payload
      .get("tradeData")
      .and_then(Value::as_object)
      .filter(|items| !items.is_empty());

    match (sender, target, items) {
      (Some(sender), Some(target), Some(items)) => Ok(Self {
        sender: sender.to_owned(),
        target: target.to_owned(),
        items:  items.clone(),
      }),
      _ => Err(Error::MissingTradeParameters),
    }
  }
}

/// Apply `request` to `nations` and return the sender's updated record.
///
/// Every delta and every quantity the trade reads is validated before any
/// record is touched, so a rejected trade leaves `nations` unchanged.
pub fn apply_trade(nations: &mut Nations, request: &TradeRequest, now: i64) -> Result<NationRecord> {
  let (Some(sender), Some(target)) = (
    nations.get(&request.sender),
    nations.get(&request.target),
  ) else {
    return Err(Error::TradeParticipantNotFound);
  };

  let mut deltas = Vec::with_capacity(request.items.len());
  for (key, requested) in &request.items {
    let delta = coerce_quantity(requested)
      .ok_or_else(|| Error::InvalidQuantity { key: key.clone() })?
      .max(0);
    sender.quantity(key)?;
    target.quantity(key)?;
    deltas.push((key.as_str(), delta));
  }

  for (key, delta) in deltas {
    let sender = participant(nations, &request.sender)?;
    let remaining = sender.quantity(key)?.saturating_sub(delta).max(0);
    sender.set_quantity(key, remaining);

    // Re-borrowed per key: sender and target may be the same record.
    let target = participant(nations, &request.target)?;
    let credited = target.quantity(key)?.saturating_add(delta);
    target.set_quantity(key, credited);
  }

  let sender = participant(nations, &request.sender)?;
  sender.set_last_seen(now);

  tracing::debug!(
    sender = %request.sender,
    target = %request.target,
    keys = request.items.len(),
    "applied trade"
  );
  Ok(sender.clone())
}

fn participant<'a>(nations: &'a mut Nations, name: &str) -> Result<&'a mut NationRecord> {
  nations.get_mut(name).ok_or(Error::TradeParticipantNotFound)
}
