//! Error type for `reviewbox-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored rating that does not fit the review model.
  #[error("invalid stored rating: {0}")]
  Rating(i64),

  #[error("unsupported store uri: {0:?}")]
  Uri(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
