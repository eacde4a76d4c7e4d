//! Error types for `reviewbox-core`.

use thiserror::Error;

/// A defect in client-supplied review input, detected before any store call.
///
/// The `Display` text is the reason string returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("All fields are required")]
  MissingFields,

  #[error("Name and review must be text")]
  NotText,

  #[error("Rating must be between 1 and 5")]
  RatingOutOfRange,

  #[error("Name must be {max} characters or fewer")]
  NameTooLong { max: usize },

  #[error("Review must be {max} characters or fewer")]
  ReviewTooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// The store failed during a request-scoped read or write.
  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The store could not be reached at boot within the retry budget.
  #[error("store unavailable after {attempts} attempt(s): {last_error}")]
  StoreUnavailable { attempts: u32, last_error: String },
}

impl Error {
  pub(crate) fn persistence<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Persistence(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
