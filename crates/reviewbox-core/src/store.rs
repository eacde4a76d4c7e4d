//! The `ReviewStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `reviewbox-store-sqlite`). Higher layers depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::review::{NewReview, Review};

/// Parameters for [`ReviewStore::list`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewQuery {
  /// Restrict to reviews with `approved = true`.
  pub approved_only: bool,
}

/// Abstraction over a review store backend.
///
/// Writes are append-only: there is no update or delete. All methods return
/// `Send` futures so the trait can be used in multi-threaded async runtimes
/// (e.g. tokio with `axum`).
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new review. The `date` timestamp is set by the store.
  fn insert(
    &self,
    review: NewReview,
  ) -> impl Future<Output = Result<Review, Self::Error>> + Send + '_;

  /// Return all reviews matching `query`, most recent `date` first.
  fn list(
    &self,
    query: ReviewQuery,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;
}
