//! HTTP server assembly for reviewbox.
//!
//! Connects to the review store with bounded retry, then mounts the JSON API
//! under `/api` behind CORS, security headers, and a panic catch-all.

pub mod config;
pub mod middleware;

pub use self::config::{ConnectConfig, ServerConfig};

use std::time::Duration;

use axum::{Router, http::header::InvalidHeaderValue};
use reviewbox_core::{
  ReviewService,
  connect::{self, Delay},
  store::ReviewStore,
};
use reviewbox_store_sqlite::SqliteStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid CORS origin {origin:?}: {source}")]
  InvalidOrigin {
    origin: String,
    #[source]
    source: InvalidHeaderValue,
  },
}

// ─── Startup ──────────────────────────────────────────────────────────────────

/// Real-time waits between connection attempts.
pub struct TokioDelay;

impl Delay for TokioDelay {
  async fn wait(&self, duration: Duration) { tokio::time::sleep(duration).await }
}

/// Open the configured store, retrying per `config.connect`.
///
/// Fails with [`reviewbox_core::Error::StoreUnavailable`] once the attempts
/// are used up; callers should exit rather than serve.
pub async fn connect_store(
  config: &ServerConfig,
  delay: &impl Delay,
) -> reviewbox_core::Result<SqliteStore> {
  let uri = config.store_uri.as_str();
  connect::establish(&config.retry_policy(), delay, move || {
    SqliteStore::open_uri(uri)
  })
  .await
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S>(service: ReviewService<S>, config: &ServerConfig) -> Result<Router, Error>
where
  S: ReviewStore + 'static,
{
  let app = Router::new()
    .nest("/api", reviewbox_api::api_router(service))
    .fallback(middleware::not_found);
  middleware::apply(app, config)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    routing::get,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  fn test_config() -> ServerConfig {
    ServerConfig {
      store_uri: "sqlite::memory:".to_owned(),
      allowed_origins: vec!["https://reviews.example.com".to_owned()],
      connect: ConnectConfig {
        max_attempts:     3,
        retry_delay_secs: 0,
      },
      ..ServerConfig::default()
    }
  }

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    router(ReviewService::new(Arc::new(store)), &test_config()).unwrap()
  }

  async fn oneshot_raw(
    app: Router,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
    body: &str,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(req).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn assert_security_headers(resp: &Response) {
    let h = resp.headers();
    assert_eq!(h.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(h.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(h.get(header::X_XSS_PROTECTION).unwrap(), "1; mode=block");
  }

  // ── Scenarios ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_and_list_through_full_stack() {
    let app = app().await;
    let resp = oneshot_raw(
      app.clone(),
      "POST",
      "/api/reviews",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"name":"Jo","rating":5,"review":"Great service"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_security_headers(&resp);
    assert_eq!(
      json_body(resp).await,
      json!({ "message": "Review submitted successfully" })
    );

    let resp = oneshot_raw(app, "GET", "/api/reviews", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_security_headers(&resp);
    let body = json_body(resp).await;
    assert_eq!(body[0]["name"], "Jo");
    assert_eq!(body[0]["rating"], 5);
    assert_eq!(body[0]["review"], "Great service");
    assert_eq!(body[0]["approved"], true);
  }

  #[tokio::test]
  async fn validation_errors_carry_headers() {
    let app = app().await;
    let resp = oneshot_raw(
      app,
      "POST",
      "/api/reviews",
      vec![(header::CONTENT_TYPE, "application/json")],
      r#"{"name":"","rating":3,"review":"ok"}"#,
    ).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_security_headers(&resp);
    assert_eq!(json_body(resp).await, json!({ "error": "All fields are required" }));
  }

  #[tokio::test]
  async fn health_is_mounted_under_api() {
    let resp = oneshot_raw(app().await, "GET", "/api/health", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_security_headers(&resp);
    assert_eq!(json_body(resp).await["status"], "ok");
  }

  #[tokio::test]
  async fn unknown_route_returns_json_404() {
    let resp = oneshot_raw(app().await, "GET", "/reviews", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_security_headers(&resp);
    assert_eq!(json_body(resp).await, json!({ "error": "Not found" }));
  }

  // ── CORS ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn allowed_origin_gets_credentialed_cors() {
    let resp = oneshot_raw(
      app().await,
      "GET",
      "/api/reviews",
      vec![(header::ORIGIN, "https://reviews.example.com")],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let h = resp.headers();
    assert_eq!(
      h.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "https://reviews.example.com"
    );
    assert_eq!(h.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
  }

  #[tokio::test]
  async fn unlisted_origin_gets_no_cors_headers() {
    let resp = oneshot_raw(
      app().await,
      "GET",
      "/api/reviews",
      vec![(header::ORIGIN, "https://evil.example.net")],
      "",
    ).await;
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
  }

  #[tokio::test]
  async fn preflight_allows_patch() {
    let resp = oneshot_raw(
      app().await,
      "OPTIONS",
      "/api/reviews",
      vec![
        (header::ORIGIN, "https://reviews.example.com"),
        (header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH"),
      ],
      "",
    ).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_security_headers(&resp);
    let methods = resp
      .headers()
      .get(header::ACCESS_CONTROL_ALLOW_METHODS)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(methods.contains("PATCH"), "allow-methods: {methods}");
  }

  #[test]
  fn invalid_origin_is_a_config_error() {
    let result = middleware::cors_layer(&["bad\norigin".to_owned()]);
    assert!(matches!(result, Err(Error::InvalidOrigin { .. })));
  }

  // ── Catch-all ───────────────────────────────────────────────────────────────

  async fn boom() -> StatusCode { panic!("database password is hunter2") }

  #[tokio::test]
  async fn panics_become_generic_500() {
    let app = middleware::apply(Router::new().route("/boom", get(boom)), &test_config()).unwrap();
    let resp = oneshot_raw(app, "GET", "/boom", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_security_headers(&resp);
    let body = json_body(resp).await;
    assert_eq!(body, json!({ "error": "Internal server error" }));
    assert!(!body.to_string().contains("hunter2"));
  }

  // ── Startup ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn connect_store_opens_configured_uri() {
    let store = connect_store(&test_config(), &TokioDelay).await.unwrap();
    let svc = ReviewService::new(Arc::new(store));
    assert!(svc.list().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn unreachable_store_is_store_unavailable() {
    let config = ServerConfig {
      store_uri: "sqlite:///nonexistent-reviewbox-dir/sub/reviews.db".to_owned(),
      ..test_config()
    };
    let err = connect_store(&config, &TokioDelay).await.err().unwrap();
    assert!(matches!(
      err,
      reviewbox_core::Error::StoreUnavailable { attempts: 3, .. }
    ));
  }
}
