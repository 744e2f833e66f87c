//! Handlers for the plain CRUD `/investors` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/investors` | List all |
//! | `POST`   | `/investors` | 409 when the email is already registered |
//! | `GET`    | `/investors/:id` | 404 if not found |
//! | `PUT`    | `/investors/:id` | Partial field update |
//! | `DELETE` | `/investors/:id` | 204 on success |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use vestor_core::{
  investor::{Investor, InvestorUpdate, NewInvestor},
  mail::MailDispatcher,
  media::MediaStore,
  store::InvestorStore,
};

use crate::{AppState, auth, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /investors`
pub async fn list<S, M, P>(
  State(state): State<AppState<S, M, P>>,
) -> Result<Json<Vec<Investor>>, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let investors = state
    .store
    .list()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(investors))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:       String,
  pub first_name: String,
  pub email:      String,
  pub mobile:     i64,
  #[serde(default)]
  pub categories: Vec<String>,
  pub password:   String,
}

/// `POST /investors` — hashes the password and rejects duplicate emails.
pub async fn create<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  if body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("email must not be empty".to_owned()));
  }

  let existing = state
    .store
    .find_by_email(&body.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if existing.is_some() {
    return Err(ApiError::Conflict(format!(
      "email {} is already registered",
      body.email
    )));
  }

  let password_hash = auth::hash_password(&body.password)?;
  let investor = state
    .store
    .create(NewInvestor {
      name: body.name,
      first_name: body.first_name,
      email: body.email,
      mobile: body.mobile,
      categories: body.categories,
      password_hash,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(investor_id = %investor.investor_id, "investor created");
  Ok((StatusCode::CREATED, Json(investor)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /investors/:id`
pub async fn get_one<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Investor>, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let investor = state
    .store
    .get(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("investor {id} not found")))?;
  Ok(Json(investor))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /investors/:id` — body is an [`InvestorUpdate`]; omitted fields
/// keep their stored values.
pub async fn update_one<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Path(id): Path<Uuid>,
  Json(changes): Json<InvestorUpdate>,
) -> Result<Json<Investor>, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let investor = state
    .store
    .update(id, changes)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("investor {id} not found")))?;
  Ok(Json(investor))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /investors/:id`
pub async fn delete_one<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let deleted = state
    .store
    .delete(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if !deleted {
    return Err(ApiError::NotFound(format!("investor {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
