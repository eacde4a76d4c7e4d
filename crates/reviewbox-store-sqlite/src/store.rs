//! [`SqliteStore`] is the SQLite implementation of [`ReviewStore`].

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use reviewbox_core::{
  review::{NewReview, Review},
  store::{ReviewQuery, ReviewStore},
};

use crate::{
  Error, Result,
  encode::{RawReview, encode_dt, encode_uuid, truncate_to_micros},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A review store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a store from a connection URI.
  ///
  /// Accepted forms: `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
  /// `sqlite:<path>`, or a bare filesystem path.
  pub async fn open_uri(uri: &str) -> Result<Self> {
    match parse_uri(uri)? {
      Target::Memory => Self::open_in_memory().await,
      Target::File(path) => Self::open(path).await,
    }
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

enum Target<'a> {
  Memory,
  File(&'a str),
}

fn parse_uri(uri: &str) -> Result<Target<'_>> {
  let uri = uri.trim();
  if uri == ":memory:" || uri == "sqlite::memory:" {
    return Ok(Target::Memory);
  }
  let path = uri
    .strip_prefix("sqlite://")
    .or_else(|| uri.strip_prefix("sqlite:"))
    .unwrap_or(uri);
  if path.is_empty() || path.contains("://") {
    return Err(Error::Uri(uri.to_owned()));
  }
  Ok(Target::File(path))
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewReview) -> Result<Review> {
    let review = Review {
      name:     input.name,
      rating:   input.rating,
      review:   input.review,
      date:     truncate_to_micros(Utc::now()),
      approved: input.approved,
    };

    let id_str   = encode_uuid(Uuid::new_v4());
    let date_str = encode_dt(review.date);
    let name     = review.name.clone();
    let body     = review.review.clone();
    let rating   = i64::from(review.rating);
    let approved = review.approved;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reviews (review_id, name, rating, review, date, approved)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, rating, body, date_str, approved],
        )?;
        Ok(())
      })
      .await?;

    Ok(review)
  }

  async fn list(&self, query: ReviewQuery) -> Result<Vec<Review>> {
    let approved_only = query.approved_only;

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        // rowid breaks ties between reviews stamped in the same microsecond.
        let mut stmt = conn.prepare(
          "SELECT name, rating, review, date, approved
           FROM reviews
           WHERE (?1 = 0 OR approved = 1)
           ORDER BY date DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![approved_only], |row| {
            Ok(RawReview {
              name:     row.get(0)?,
              rating:   row.get(1)?,
              review:   row.get(2)?,
              date:     row.get(3)?,
              approved: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReview::into_review).collect()
  }
}
