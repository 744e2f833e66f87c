//! Handler for `PATCH /investors/:id/status`.
//!
//! Delegates to [`StatusService`](vestor_core::status::StatusService); the
//! response carries both the persisted record and the notification outcome
//! so callers can see whether the approval email went out.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;
use vestor_core::{
  mail::MailDispatcher,
  media::MediaStore,
  status::StatusUpdate,
  store::InvestorStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub is_approved: bool,
  pub is_active:   bool,
}

/// `PATCH /investors/:id/status` — body: `{"is_approved":true,"is_active":true}`
pub async fn handler<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<StatusUpdate>, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let update = state
    .status
    .apply(id, body.is_approved, body.is_active)
    .await?;
  Ok(Json(update))
}
