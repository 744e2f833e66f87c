//! The file-storage collaborator trait for uploaded media.

use std::future::Future;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("media store error: {0}")]
pub struct MediaError(pub String);

/// Abstraction over a blob store for uploaded files.
///
/// `store` persists the bytes under a backend-chosen name (keeping the
/// supplied extension, if any) and returns a URL from which the file can
/// be retrieved.
pub trait MediaStore: Send + Sync {
  fn store<'a>(
    &'a self,
    extension: Option<&'a str>,
    data: &'a [u8],
  ) -> impl Future<Output = Result<String, MediaError>> + Send + 'a;
}
