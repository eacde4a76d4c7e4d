//! Handlers for `/reviews` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reviews` | All reviews, newest first |
//! | `POST` | `/reviews` | Body: `{"name","rating","review"}`; returns 201 + confirmation |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use reviewbox_core::{
  ReviewService,
  review::{Review, ReviewSubmission},
  store::ReviewStore,
};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;

pub const SUBMITTED_MESSAGE: &str = "Review submitted successfully";
pub const FETCH_FAILED: &str = "Error fetching reviews";
pub const SUBMIT_FAILED: &str = "Error submitting review";

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /reviews`
pub async fn list<S>(
  State(service): State<ReviewService<S>>,
) -> Result<Json<Vec<Review>>, ApiError>
where
  S: ReviewStore,
{
  let reviews = service
    .list()
    .await
    .map_err(|e| ApiError::from_core(e, FETCH_FAILED))?;
  Ok(Json(reviews))
}

// ─── Submit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Submitted {
  pub message: &'static str,
}

/// `POST /reviews`: returns 201 + `{"message": ...}`. Nothing about the
/// stored record is echoed back.
pub async fn submit<S>(
  State(service): State<ReviewService<S>>,
  body: Result<Json<ReviewSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ReviewStore,
{
  let Json(submission) = body.map_err(|rejection| {
    info!(%rejection, "rejected review body");
    ApiError::BadRequest("Invalid request body".to_owned())
  })?;

  let stored = service
    .submit(&submission)
    .await
    .map_err(|e| ApiError::from_core(e, SUBMIT_FAILED))?;
  info!(rating = stored.rating, "review submitted");

  Ok((
    StatusCode::CREATED,
    Json(Submitted { message: SUBMITTED_MESSAGE }),
  ))
}
