//! Encoding and decoding helpers between review types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision, so ordering the column as text orders it chronologically.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use reviewbox_core::review::Review;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Drop sub-microsecond precision so a value survives an encode/decode trip
/// unchanged.
pub fn truncate_to_micros(dt: DateTime<Utc>) -> DateTime<Utc> {
  DateTime::from_timestamp_micros(dt.timestamp_micros()).unwrap_or(dt)
}

// ─── Rating ───────────────────────────────────────────────────────────────────

pub fn decode_rating(n: i64) -> Result<u8> {
  u8::try_from(n).map_err(|_| Error::Rating(n))
}

// ─── Raw row type ─────────────────────────────────────────────────────────────

/// A `reviews` row as read from SQLite, before decoding.
pub struct RawReview {
  pub name:     String,
  pub rating:   i64,
  pub review:   String,
  pub date:     String,
  pub approved: bool,
}

impl RawReview {
  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      name:     self.name,
      rating:   decode_rating(self.rating)?,
      review:   self.review,
      date:     decode_dt(&self.date)?,
      approved: self.approved,
    })
  }
}
