//! Approval/activity status transitions and the edge-triggered notification.
//!
//! The notification email fires exactly on the false→true approval edge.
//! Re-approving an already-approved investor, or toggling only the
//! activity flag, sends nothing.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  investor::Investor,
  mail::MailDispatcher,
  store::InvestorStore,
};

/// Subject line of the approval notification.
pub const APPROVAL_SUBJECT: &str = "Your investor account is approved";

/// Outcome of the best-effort notification attached to a status update.
///
/// Kept separate from the operation result: the status update is the
/// primary effect and succeeds regardless of how dispatch went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NotificationOutcome {
  /// The approval flag did not cross the false→true edge.
  NotTriggered,
  Sent,
  /// Dispatch failed; the persisted status change still stands.
  Failed { reason: String },
}

/// A completed status transition: the persisted record plus what happened
/// to the notification.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
  pub investor:     Investor,
  pub notification: NotificationOutcome,
}

/// Applies status transitions against a store and dispatches the approval
/// notification. Stateless; all state lives in the store.
pub struct StatusService<S, M> {
  store:  Arc<S>,
  mailer: Arc<M>,
}

impl<S, M> StatusService<S, M>
where
  S: InvestorStore,
  M: MailDispatcher,
{
  pub fn new(store: Arc<S>, mailer: Arc<M>) -> Self { Self { store, mailer } }

  /// Set both status flags on one investor.
  ///
  /// Fails with [`Error::InvestorNotFound`] when the id is absent and
  /// [`Error::Store`] when persistence fails; no email is attempted in
  /// either case. When the update newly approves the investor, exactly
  /// one notification is dispatched; a dispatch failure is logged and
  /// reported in the returned [`NotificationOutcome`] but never fails
  /// the operation.
  pub async fn apply(
    &self,
    id: Uuid,
    approved: bool,
    active: bool,
  ) -> Result<StatusUpdate> {
    let change = self
      .store
      .apply_status(id, approved, active)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or(Error::InvestorNotFound(id))?;

    let notification = if approved && !change.previously_approved {
      let body = approval_body(&change.investor.name);
      match self
        .mailer
        .send(&change.investor.email, APPROVAL_SUBJECT, &body)
        .await
      {
        Ok(()) => {
          tracing::info!(investor_id = %id, to = %change.investor.email, "approval notification sent");
          NotificationOutcome::Sent
        }
        Err(e) => {
          tracing::warn!(investor_id = %id, error = %e, "approval notification failed");
          NotificationOutcome::Failed {
            reason: e.to_string(),
          }
        }
      }
    } else {
      NotificationOutcome::NotTriggered
    };

    Ok(StatusUpdate {
      investor: change.investor,
      notification,
    })
  }
}

fn approval_body(name: &str) -> String {
  format!(
    "Hello {name},\n\nYour investor account has been approved. \
     You can now log in and access your dashboard.\n\nThank you!"
  )
}
