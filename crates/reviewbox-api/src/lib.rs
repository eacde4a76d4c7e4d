//! JSON REST API for reviewbox.
//!
//! Exposes an axum [`Router`] backed by a [`ReviewService`] over any
//! [`ReviewStore`]. CORS, security headers, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", reviewbox_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod health;
pub mod reviews;

use axum::{Router, routing::get};
use reviewbox_core::{ReviewService, store::ReviewStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: ReviewService<S>) -> Router<()>
where
  S: ReviewStore + 'static,
{
  Router::new()
    .route("/reviews", get(reviews::list::<S>).post(reviews::submit::<S>))
    .route("/health", get(health::handler))
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────
