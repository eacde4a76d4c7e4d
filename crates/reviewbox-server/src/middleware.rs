//! Cross-cutting HTTP layers: panic catch-all, CORS, static security headers,
//! and request tracing.

use std::any::Any;

use axum::{
  Json, Router,
  http::{
    HeaderValue, Method, StatusCode,
    header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION},
  },
  response::{IntoResponse, Response},
};
use serde_json::json;
use tower_http::{
  catch_panic::CatchPanicLayer,
  cors::{AllowOrigin, CorsLayer},
  set_header::SetResponseHeaderLayer,
  trace::TraceLayer,
};

use crate::{Error, ServerConfig};

/// Wrap `router` in every layer the public surface needs.
///
/// Layer order, outermost first: trace, security headers, CORS, panic
/// catch-all. Headers therefore land on CORS preflights and panic responses
/// too.
pub fn apply(router: Router, config: &ServerConfig) -> Result<Router, Error> {
  Ok(
    router
      .layer(CatchPanicLayer::custom(handle_panic))
      .layer(cors_layer(&config.allowed_origins)?)
      .layer(SetResponseHeaderLayer::overriding(
        X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
      ))
      .layer(SetResponseHeaderLayer::overriding(
        X_FRAME_OPTIONS,
        HeaderValue::from_static("DENY"),
      ))
      .layer(SetResponseHeaderLayer::overriding(
        X_XSS_PROTECTION,
        HeaderValue::from_static("1; mode=block"),
      ))
      .layer(TraceLayer::new_for_http()),
  )
}

/// Credentialed CORS for a fixed allow-list of origins.
///
/// PATCH is allowed even though no route accepts it.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, Error> {
  let origins = origins
    .iter()
    .map(|o| {
      HeaderValue::from_str(o).map_err(|source| Error::InvalidOrigin {
        origin: o.clone(),
        source,
      })
    })
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::POST, Method::PATCH])
      .allow_headers([CONTENT_TYPE])
      .allow_credentials(true),
  )
}

/// Turn a handler panic into a generic 500. The payload is logged only.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
  let detail = payload
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| payload.downcast_ref::<&str>().copied())
    .unwrap_or("unknown panic payload");
  tracing::error!(panic = detail, "request handler panicked");
  (
    StatusCode::INTERNAL_SERVER_ERROR,
    Json(json!({ "error": "Internal server error" })),
  )
    .into_response()
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
  (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
