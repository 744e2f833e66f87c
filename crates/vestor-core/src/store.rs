//! The `InvestorStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `vestor-store-sqlite`).
//! Higher layers (`vestor-api`) depend on this abstraction, not on any
//! concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  investor::{Investor, InvestorUpdate, NewInvestor},
  query::SearchFilter,
};

/// Result of the atomic status-update primitive.
#[derive(Debug, Clone)]
pub struct StatusChange {
  /// The record as persisted after the update.
  pub investor: Investor,
  /// The approval flag as it stood immediately before the update.
  pub previously_approved: bool,
}

/// Abstraction over an investor record store backend.
pub trait InvestorStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create and persist a new investor. The store assigns the id and
  /// creation timestamp; both status flags start `false`.
  fn create(
    &self,
    input: NewInvestor,
  ) -> impl Future<Output = Result<Investor, Self::Error>> + Send + '_;

  /// Retrieve an investor by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Investor>, Self::Error>> + Send + '_;

  /// Look up an investor by email address. Returns `None` if not found.
  fn find_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Investor>, Self::Error>> + Send + 'a;

  /// List all investors.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<Investor>, Self::Error>> + Send + '_;

  /// Apply a partial field update and return the updated record, or
  /// `None` if the id does not exist. The id itself never changes.
  fn update(
    &self,
    id: Uuid,
    changes: InvestorUpdate,
  ) -> impl Future<Output = Result<Option<Investor>, Self::Error>> + Send + '_;

  /// Delete an investor. Returns `false` if the id did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Return all investors matching `filter`, treating it as opaque
  /// structured data. Semantics must agree with
  /// [`SearchFilter::matches`](crate::query::SearchFilter::matches).
  fn search<'a>(
    &'a self,
    filter: &'a SearchFilter,
  ) -> impl Future<Output = Result<Vec<Investor>, Self::Error>> + Send + 'a;

  /// Atomically set both status flags and report the pre-update approval
  /// flag. Returns `None` if the id does not exist.
  ///
  /// The read of the previous flag and the write of the new flags must
  /// happen as one store operation — this is what makes approval-edge
  /// detection exact under concurrent callers (two racing updates cannot
  /// both observe `previously_approved == false`).
  fn apply_status(
    &self,
    id: Uuid,
    approved: bool,
    active: bool,
  ) -> impl Future<Output = Result<Option<StatusChange>, Self::Error>> + Send + '_;
}
