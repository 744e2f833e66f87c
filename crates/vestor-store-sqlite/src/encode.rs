//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Category tags are stored
//! as compact JSON arrays. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use vestor_core::investor::Investor;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Category tags
// ────────────────────────────────────────────────────────────

pub fn encode_categories(tags: &[String]) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_categories(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Raw row type ────────────────────────────────────────────────────────────

/// One `investors` row exactly as read from SQLite, before decoding.
pub struct RawInvestor {
  pub investor_id:   String,
  pub created_at:    String,
  pub name:          String,
  pub first_name:    String,
  pub email:         String,
  pub mobile:        i64,
  pub categories:    String,
  pub photo_url:     Option<String>,
  pub password_hash: String,
  pub is_approved:   bool,
  pub is_active:     bool,
}

impl RawInvestor {
  pub fn into_investor(self) -> Result<Investor> {
    Ok(Investor {
      investor_id: decode_uuid(&self.investor_id)?,
      created_at:  decode_dt(&self.created_at)?,
      name:        self.name,
      first_name:  self.first_name,
      email:       self.email,
      mobile:      self.mobile,
      categories:  decode_categories(&self.categories)?,
      photo_url:   self.photo_url,
      password_hash: self.password_hash,
      is_approved: self.is_approved,
      is_active:   self.is_active,
    })
  }

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawInvestor {
      investor_id:   row.get(0)?,
      created_at:    row.get(1)?,
      name:          row.get(2)?,
      first_name:    row.get(3)?,
      email:         row.get(4)?,
      mobile:        row.get(5)?,
      categories:    row.get(6)?,
      photo_url:     row.get(7)?,
      password_hash: row.get(8)?,
      is_approved:   row.get(9)?,
      is_active:     row.get(10)?,
    })
  }
}

/// Column list matching [`RawInvestor::from_row`]'s ordinals.
pub const INVESTOR_COLUMNS: &str = "investor_id, created_at, name, first_name, \
   email, mobile, categories, photo_url, password_hash, is_approved, is_active";
