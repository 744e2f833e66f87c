//! The mail-dispatch collaborator trait.
//!
//! Dispatch failure is an expected, distinguishable outcome — transports
//! must report it as an error value, never as a panic or a fatal fault.

use std::future::Future;

use thiserror::Error;

/// A failed dispatch attempt (transport error, invalid address, timeout).
#[derive(Debug, Clone, Error)]
#[error("mail dispatch failed: {0}")]
pub struct MailError(pub String);

/// Abstraction over an outbound mail transport.
///
/// Implementations must bound how long a send can block; a timed-out send
/// is reported as a [`MailError`] like any other failure.
pub trait MailDispatcher: Send + Sync {
  fn send<'a>(
    &'a self,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
  ) -> impl Future<Output = Result<(), MailError>> + Send + 'a;
}
