//! [`SqliteStore`] — the SQLite implementation of [`InvestorStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use vestor_core::{
  investor::{Investor, InvestorUpdate, NewInvestor},
  query::{Condition, SearchFilter, TextField},
  store::{InvestorStore, StatusChange},
};

use crate::{
  Error, Result,
  encode::{
    INVESTOR_COLUMNS, RawInvestor, encode_categories, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An investor store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// on one store execute serially on the connection's worker thread, which
/// is what makes [`InvestorStore::apply_status`]'s read-then-write atomic
/// per record.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
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

  /// Insert a fully-built [`Investor`] into the `investors` table.
  async fn insert_investor(&self, investor: &Investor) -> Result<()> {
    let id_str         = encode_uuid(investor.investor_id);
    let created_at_str = encode_dt(investor.created_at);
    let name           = investor.name.clone();
    let first_name     = investor.first_name.clone();
    let email          = investor.email.clone();
    let mobile         = investor.mobile;
    let categories_str = encode_categories(&investor.categories)?;
    let photo_url      = investor.photo_url.clone();
    let password_hash  = investor.password_hash.clone();
    let is_approved    = investor.is_approved;
    let is_active      = investor.is_active;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO investors (
             investor_id, created_at, name, first_name, email, mobile,
             categories, photo_url, password_hash, is_approved, is_active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            created_at_str,
            name,
            first_name,
            email,
            mobile,
            categories_str,
            photo_url,
            password_hash,
            is_approved,
            is_active,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── LIKE pattern rendering ──────────────────────────────────────────────────

/// Escape LIKE metacharacters so the needle matches literally, then wrap it
/// in `%` wildcards for an unanchored substring match. Paired with
/// `ESCAPE '\'` in the SQL.
///
/// Folding is ASCII-only, like SQLite's `LOWER()` on the column side, so
/// the backend agrees with `SearchFilter::matches`.
fn like_pattern(needle: &str) -> String {
  let lowered = needle.to_ascii_lowercase();
  let mut escaped = String::with_capacity(lowered.len() + 2);
  escaped.push('%');
  for ch in lowered.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped.push('%');
  escaped
}

/// Render one substring condition against the column it targets.
///
/// Category tags live in a JSON-encoded array column, so they are matched
/// per element via `json_each`: JSON syntax characters never match, and a
/// needle cannot straddle two adjacent tags.
fn contains_sql(field: TextField, param: usize) -> String {
  match field {
    TextField::Name => format!("LOWER(name) LIKE ?{param} ESCAPE '\\'"),
    TextField::FirstName => {
      format!("LOWER(first_name) LIKE ?{param} ESCAPE '\\'")
    }
    TextField::Email => format!("LOWER(email) LIKE ?{param} ESCAPE '\\'"),
    TextField::Categories => format!(
      "EXISTS (SELECT 1 FROM json_each(investors.categories) \
       WHERE LOWER(json_each.value) LIKE ?{param} ESCAPE '\\')"
    ),
  }
}

// ─── InvestorStore impl ──────────────────────────────────────────────────────

impl InvestorStore for SqliteStore {
  type Error = Error;

  async fn create(&self, input: NewInvestor) -> Result<Investor> {
    let investor = Investor {
      investor_id: Uuid::new_v4(),
      created_at:  Utc::now(),
      name:        input.name,
      first_name:  input.first_name,
      email:       input.email,
      mobile:      input.mobile,
      categories:  input.categories,
      photo_url:   None,
      password_hash: input.password_hash,
      is_approved: false,
      is_active:   false,
    };

    self.insert_investor(&investor).await?;
    Ok(investor)
  }

  async fn get(&self, id: Uuid) -> Result<Option<Investor>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawInvestor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INVESTOR_COLUMNS} FROM investors WHERE investor_id = ?1"
              ),
              rusqlite::params![id_str],
              RawInvestor::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInvestor::into_investor).transpose()
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<Investor>> {
    let email = email.to_owned();

    let raw: Option<RawInvestor> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {INVESTOR_COLUMNS} FROM investors WHERE email = ?1 LIMIT 1"
              ),
              rusqlite::params![email],
              RawInvestor::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawInvestor::into_investor).transpose()
  }

  async fn list(&self) -> Result<Vec<Investor>> {
    let raws: Vec<RawInvestor> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INVESTOR_COLUMNS} FROM investors ORDER BY created_at"
        ))?;
        let rows = stmt
          .query_map([], RawInvestor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInvestor::into_investor).collect()
  }

  async fn update(
    &self,
    id: Uuid,
    changes: InvestorUpdate,
  ) -> Result<Option<Investor>> {
    let id_str = encode_uuid(id);
    let categories_str = changes
      .categories
      .as_deref()
      .map(encode_categories)
      .transpose()?;

    let raw: Option<RawInvestor> = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!(
              "SELECT {INVESTOR_COLUMNS} FROM investors WHERE investor_id = ?1"
            ),
            rusqlite::params![id_str],
            RawInvestor::from_row,
          )
          .optional()?;

        let Some(mut row) = existing else {
          return Ok(None);
        };

        if let Some(name) = changes.name {
          row.name = name;
        }
        if let Some(first_name) = changes.first_name {
          row.first_name = first_name;
        }
        if let Some(email) = changes.email {
          row.email = email;
        }
        if let Some(mobile) = changes.mobile {
          row.mobile = mobile;
        }
        if let Some(categories) = categories_str {
          row.categories = categories;
        }
        if let Some(photo_url) = changes.photo_url {
          row.photo_url = Some(photo_url);
        }

        conn.execute(
          "UPDATE investors
           SET name = ?2, first_name = ?3, email = ?4, mobile = ?5,
               categories = ?6, photo_url = ?7
           WHERE investor_id = ?1",
          rusqlite::params![
            id_str,
            row.name,
            row.first_name,
            row.email,
            row.mobile,
            row.categories,
            row.photo_url,
          ],
        )?;

        Ok(Some(row))
      })
      .await?;

    raw.map(RawInvestor::into_investor).transpose()
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM investors WHERE investor_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(affected > 0)
  }

  async fn search(&self, filter: &SearchFilter) -> Result<Vec<Investor>> {
    // Render each condition to a parameterised SQL fragment. The needle
    // always travels as a bound parameter, never as query text.
    let mut conds: Vec<String> = vec![];
    let mut params: Vec<rusqlite::types::Value> = vec![];

    for condition in &filter.any_of {
      match condition {
        Condition::Contains { field, needle } => {
          params.push(rusqlite::types::Value::Text(like_pattern(needle)));
          conds.push(contains_sql(*field, params.len()));
        }
        Condition::MobileEquals(n) => {
          params.push(rusqlite::types::Value::Real(*n));
          conds.push(format!("mobile = ?{}", params.len()));
        }
      }
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" OR "))
    };

    let raws: Vec<RawInvestor> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {INVESTOR_COLUMNS} FROM investors {where_clause} ORDER BY created_at"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawInvestor::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawInvestor::into_investor).collect()
  }

  async fn apply_status(
    &self,
    id: Uuid,
    approved: bool,
    active: bool,
  ) -> Result<Option<StatusChange>> {
    let id_str = encode_uuid(id);

    // Read and write inside one `call` closure: the connection's worker
    // thread serialises it against every other store operation, so two
    // racing updates cannot both observe the pre-update flag.
    let result: Option<(RawInvestor, bool)> = self
      .conn
      .call(move |conn| {
        let existing = conn
          .query_row(
            &format!(
              "SELECT {INVESTOR_COLUMNS} FROM investors WHERE investor_id = ?1"
            ),
            rusqlite::params![id_str],
            RawInvestor::from_row,
          )
          .optional()?;

        let Some(mut row) = existing else {
          return Ok(None);
        };

        let previously_approved = row.is_approved;
        row.is_approved = approved;
        row.is_active = active;

        conn.execute(
          "UPDATE investors SET is_approved = ?2, is_active = ?3
           WHERE investor_id = ?1",
          rusqlite::params![id_str, approved, active],
        )?;

        Ok(Some((row, previously_approved)))
      })
      .await?;

    result
      .map(|(raw, previously_approved)| {
        Ok(StatusChange {
          investor: raw.into_investor()?,
          previously_approved,
        })
      })
      .transpose()
  }
}
