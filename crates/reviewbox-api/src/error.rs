//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Client input defect; the message is returned verbatim.
  #[error("bad request: {0}")]
  BadRequest(String),

  /// Store failure, including an unreachable store. Only `public` reaches
  /// the client; `source` is logged.
  #[error("{public}: {source}")]
  Store {
    public: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Map a core error, using `public` as the client message for store
  /// failures.
  pub fn from_core(e: reviewbox_core::Error, public: &'static str) -> Self {
    use reviewbox_core::Error;
    match e {
      Error::Validation(v) => ApiError::BadRequest(v.to_string()),
      Error::Persistence(source) => ApiError::Store { public, source },
      other @ Error::StoreUnavailable { .. } => ApiError::Store {
        public,
        source: Box::new(other),
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store { public, source } => {
        tracing::error!(error = %source, "{public}");
        (StatusCode::INTERNAL_SERVER_ERROR, (*public).to_owned())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
