//! Investor — the persisted record this whole service revolves around.
//!
//! The store exclusively owns persisted state; everything here is a
//! transient copy read from it or an input handed to it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted investor record.
///
/// `investor_id` is assigned by the store at creation and never changes.
/// Email uniqueness is a convention enforced at the API boundary, not a
/// schema constraint. The password hash is an opaque PHC string and is
/// never serialised into responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investor {
  pub investor_id: Uuid,
  pub created_at:  DateTime<Utc>,
  pub name:        String,
  pub first_name:  String,
  pub email:       String,
  pub mobile:      i64,
  pub categories:  Vec<String>,
  pub photo_url:   Option<String>,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub is_approved: bool,
  pub is_active:   bool,
}

/// Input for creating an investor. The caller hashes the password; the
/// store assigns the id and timestamp and starts both status flags false.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInvestor {
  pub name:          String,
  pub first_name:    String,
  pub email:         String,
  pub mobile:        i64,
  #[serde(default)]
  pub categories:    Vec<String>,
  pub password_hash: String,
}

/// Partial field update. `None` fields keep their stored value.
///
/// Status flags and the credential are deliberately absent — they change
/// only through their dedicated operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvestorUpdate {
  pub name:       Option<String>,
  pub first_name: Option<String>,
  pub email:      Option<String>,
  pub mobile:     Option<i64>,
  pub categories: Option<Vec<String>>,
  pub photo_url:  Option<String>,
}
