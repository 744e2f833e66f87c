//! Password hashing and the `POST /investors/login` handler.
//!
//! Credentials are stored as argon2 PHC strings; the verification policy
//! lives entirely behind [`hash_password`] / [`verify_password`].

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{Json, extract::State};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vestor_core::{
  investor::Investor,
  mail::MailDispatcher,
  media::MediaStore,
  store::InvestorStore,
};

use crate::{AppState, error::ApiError};

// ─── Credential helpers ──────────────────────────────────────────────────────

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::BadRequest(format!("cannot hash password: {e}")))
}

/// Verify a plaintext password against a stored PHC string.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// The trimmed profile view returned on a successful login.
#[derive(Debug, Serialize)]
pub struct Profile {
  pub investor_id: Uuid,
  pub name:        String,
  pub first_name:  String,
  pub email:       String,
  pub photo_url:   Option<String>,
  pub categories:  Vec<String>,
  pub is_approved: bool,
  pub is_active:   bool,
}

impl From<Investor> for Profile {
  fn from(i: Investor) -> Self {
    Profile {
      investor_id: i.investor_id,
      name:        i.name,
      first_name:  i.first_name,
      email:       i.email,
      photo_url:   i.photo_url,
      categories:  i.categories,
      is_approved: i.is_approved,
      is_active:   i.is_active,
    }
  }
}

/// `POST /investors/login` — body: `{"email":"...","password":"..."}`.
///
/// 404 unknown email, 401 wrong password, 403 while approval is pending.
pub async fn login<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let investor = state
    .store
    .find_by_email(&body.email)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("investor not found".to_owned()))?;

  if !verify_password(&body.password, &investor.password_hash) {
    return Err(ApiError::Unauthorized("incorrect password".to_owned()));
  }

  if !investor.is_approved {
    return Err(ApiError::Forbidden(
      "your account is pending approval".to_owned(),
    ));
  }

  Ok(Json(Profile::from(investor)))
}
