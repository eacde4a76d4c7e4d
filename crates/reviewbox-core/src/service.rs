//! [`ReviewService`]: validation and persistence for the two review
//! operations.

use std::sync::Arc;

use tracing::debug;

use crate::{
  Error, Result,
  review::{Review, ReviewSubmission},
  store::{ReviewQuery, ReviewStore},
};

/// Submit and list reviews against a store handle owned by the caller.
///
/// Cloning is cheap; the store is reference-counted.
pub struct ReviewService<S> {
  store:              Arc<S>,
  list_approved_only: bool,
}

impl<S> Clone for ReviewService<S> {
  fn clone(&self) -> Self {
    Self {
      store:              Arc::clone(&self.store),
      list_approved_only: self.list_approved_only,
    }
  }
}

impl<S: ReviewStore> ReviewService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, list_approved_only: false }
  }

  /// Only return approved reviews from [`list`](Self::list).
  pub fn with_approved_only(mut self, approved_only: bool) -> Self {
    self.list_approved_only = approved_only;
    self
  }

  /// Validate `submission` and persist it as exactly one new review.
  ///
  /// Validation failures return before the store is touched.
  pub async fn submit(&self, submission: &ReviewSubmission) -> Result<Review> {
    let new = submission.validate()?;
    let stored = self.store.insert(new).await.map_err(Error::persistence)?;
    debug!(rating = stored.rating, "review stored");
    Ok(stored)
  }

  /// All reviews, newest first.
  pub async fn list(&self) -> Result<Vec<Review>> {
    let query = ReviewQuery { approved_only: self.list_approved_only };
    self.store.list(query).await.map_err(Error::persistence)
  }
}
