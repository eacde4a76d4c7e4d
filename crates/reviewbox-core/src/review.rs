//! Review types, the single entity held by the store.
//!
//! A review enters the system as an untrusted [`ReviewSubmission`], is
//! validated into a [`NewReview`], and is persisted by a
//! [`ReviewStore`](crate::store::ReviewStore) as a [`Review`]. Reviews are
//! never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ValidationError;

/// Maximum length of a trimmed reviewer name, in characters.
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length of a trimmed review body, in characters.
pub const REVIEW_MAX_CHARS: usize = 1000;

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

// ─── Stored record ───────────────────────────────────────────────────────────

/// A persisted review as returned by a list. Storage-internal identity is not
/// part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub name:     String,
  pub rating:   u8,
  pub review:   String,
  /// Server-assigned creation time.
  pub date:     DateTime<Utc>,
  pub approved: bool,
}

/// A validated review ready to be written. The store assigns `date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
  pub name:     String,
  pub rating:   u8,
  pub review:   String,
  pub approved: bool,
}

// ─── Untrusted input ─────────────────────────────────────────────────────────

/// The body of a submit request, exactly as the client sent it.
///
/// Unknown fields (including `approved` and `date`) are ignored. Every field
/// is kept as a raw JSON value so that mistyped input becomes a validation
/// error rather than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewSubmission {
  #[serde(default)]
  pub name:   Option<Value>,
  #[serde(default)]
  pub rating: Option<Value>,
  #[serde(default)]
  pub review: Option<Value>,
}

impl ReviewSubmission {
  #[cfg(test)]
  pub(crate) fn new(name: &str, rating: impl Into<Value>, review: &str) -> Self {
    Self {
      name:   Some(name.into()),
      rating: Some(rating.into()),
      review: Some(review.into()),
    }
  }

  /// Check every field constraint and produce a trimmed [`NewReview`].
  ///
  /// Checks run in a fixed order and stop at the first failure: presence of
  /// all three fields, then their types, then the rating range, then the
  /// length limits.
  pub fn validate(&self) -> Result<NewReview, ValidationError> {
    let present = |v: &Option<Value>| v.as_ref().filter(|v| is_truthy(v)).cloned();
    let (Some(name), Some(rating), Some(review)) =
      (present(&self.name), present(&self.rating), present(&self.review))
    else {
      return Err(ValidationError::MissingFields);
    };

    let name = name.as_str().map(str::trim).ok_or(ValidationError::NotText)?;
    let review = review.as_str().map(str::trim).ok_or(ValidationError::NotText)?;
    if name.is_empty() || review.is_empty() {
      return Err(ValidationError::MissingFields);
    }

    let rating = parse_rating(&rating).ok_or(ValidationError::RatingOutOfRange)?;

    if name.chars().count() > NAME_MAX_CHARS {
      return Err(ValidationError::NameTooLong { max: NAME_MAX_CHARS });
    }
    if review.chars().count() > REVIEW_MAX_CHARS {
      return Err(ValidationError::ReviewTooLong { max: REVIEW_MAX_CHARS });
    }

    Ok(NewReview {
      name: name.to_owned(),
      rating,
      review: review.to_owned(),
      approved: true,
    })
  }
}

/// `null`, `false`, `0` and `""` count as an absent field.
fn is_truthy(v: &Value) -> bool {
  match v {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Accept JSON integers, or floats with no fractional part, in range.
fn parse_rating(v: &Value) -> Option<u8> {
  let n = v.as_i64().or_else(|| {
    v.as_f64()
      .filter(|f| f.is_finite() && f.fract() == 0.0)
      .map(|f| f as i64)
  })?;
  u8::try_from(n)
    .ok()
    .filter(|r| (RATING_MIN..=RATING_MAX).contains(r))
}
