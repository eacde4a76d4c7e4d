//! Handler for `GET /health`.

use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
  pub status:    &'static str,
  /// ISO 8601, millisecond precision, `Z` suffix.
  pub timestamp: String,
}

/// `GET /health`. Liveness only; the store is not consulted.
pub async fn handler() -> Json<Health> {
  Json(Health {
    status:    "ok",
    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
  })
}
