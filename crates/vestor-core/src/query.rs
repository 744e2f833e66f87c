//! Free-text search predicate construction.
//!
//! A [`SearchFilter`] is declarative data evaluated by the store backend.
//! The raw query term is carried as literal text; any escaping required by
//! the backend's pattern language happens when the backend renders the
//! condition, never here.

use crate::investor::Investor;

/// Text fields a substring condition can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
  Name,
  FirstName,
  Email,
  Categories,
}

impl TextField {
  pub const ALL: [TextField; 4] = [
    TextField::Name,
    TextField::FirstName,
    TextField::Email,
    TextField::Categories,
  ];
}

/// One leaf condition of a search filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
  /// Case-insensitive, unanchored substring match. `needle` is literal
  /// text, not pattern syntax. Case folding is ASCII-only, so every
  /// backend (SQLite's `LOWER` included) can agree with [`SearchFilter::matches`].
  Contains { field: TextField, needle: String },
  /// Exact numeric equality against the mobile number.
  MobileEquals(f64),
}

/// An OR-combination of conditions. An empty list matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
  pub any_of: Vec<Condition>,
}

impl SearchFilter {
  /// The filter that matches every record.
  pub fn match_all() -> Self { Self::default() }

  pub fn matches_all(&self) -> bool { self.any_of.is_empty() }

  /// Build a filter from a raw free-text query.
  ///
  /// Empty or all-whitespace input yields [`SearchFilter::match_all`].
  /// Otherwise every text field gets a substring condition, and if the
  /// trimmed input parses as a number (integer or decimal, optionally
  /// signed) an exact mobile-number condition is OR-ed in as well.
  /// Non-numeric input skips the mobile condition without error.
  pub fn parse(query: &str) -> Self {
    let trimmed = query.trim();
    if trimmed.is_empty() {
      return Self::match_all();
    }

    let mut any_of: Vec<Condition> = TextField::ALL
      .into_iter()
      .map(|field| Condition::Contains {
        field,
        needle: trimmed.to_owned(),
      })
      .collect();

    if let Ok(n) = trimmed.parse::<f64>()
      && n.is_finite()
    {
      any_of.push(Condition::MobileEquals(n));
    }

    Self { any_of }
  }

  /// Evaluate the filter against one record in memory.
  ///
  /// This is the reference semantics; SQL backends must agree with it.
  pub fn matches(&self, investor: &Investor) -> bool {
    if self.any_of.is_empty() {
      return true;
    }
    self.any_of.iter().any(|cond| match cond {
      Condition::Contains { field, needle } => {
        let needle = needle.to_ascii_lowercase();
        match field {
          TextField::Name => {
            investor.name.to_ascii_lowercase().contains(&needle)
          }
          TextField::FirstName => {
            investor.first_name.to_ascii_lowercase().contains(&needle)
          }
          TextField::Email => {
            investor.email.to_ascii_lowercase().contains(&needle)
          }
          TextField::Categories => investor
            .categories
            .iter()
            .any(|c| c.to_ascii_lowercase().contains(&needle)),
        }
      }
      Condition::MobileEquals(n) => investor.mobile as f64 == *n,
    })
  }
}
