//! Error types for `vestor-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("investor not found: {0}")]
  InvestorNotFound(Uuid),

  /// A store write or read failed. The referenced status change did not
  /// take effect (or its effect is unknown); retrying the whole operation
  /// is safe because the previous approval flag is re-read on each call.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
