//! Filesystem [`MediaStore`] and the `POST /investors/:id/photo` handler.
//!
//! Uploaded files land in the configured upload directory under a
//! millisecond-timestamp name (keeping the original extension) and are
//! served back statically under `/uploads`.

use std::path::PathBuf;

use axum::{
  Json,
  extract::{Multipart, Path, State},
};
use chrono::Utc;
use uuid::Uuid;
use vestor_core::{
  investor::{Investor, InvestorUpdate},
  mail::MailDispatcher,
  media::{MediaError, MediaStore},
  store::InvestorStore,
};

use crate::{AppState, error::ApiError};

// ─── Filesystem media store ──────────────────────────────────────────────────

/// Stores uploads on the local filesystem and builds retrieval URLs from
/// the server's public base URL.
pub struct FsMediaStore {
  upload_dir:      PathBuf,
  public_base_url: String,
}

impl FsMediaStore {
  /// Create the store, making sure the upload directory exists.
  pub async fn new(
    upload_dir: PathBuf,
    public_base_url: String,
  ) -> std::io::Result<Self> {
    tokio::fs::create_dir_all(&upload_dir).await?;
    Ok(Self {
      upload_dir,
      public_base_url: public_base_url.trim_end_matches('/').to_owned(),
    })
  }
}

impl MediaStore for FsMediaStore {
  async fn store(
    &self,
    extension: Option<&str>,
    data: &[u8],
  ) -> Result<String, MediaError> {
    let stamp = Utc::now().timestamp_millis();
    // The extension comes from a client-supplied filename; keep only
    // characters that cannot escape the upload directory.
    let ext: String = extension
      .unwrap_or_default()
      .chars()
      .filter(|c| c.is_ascii_alphanumeric())
      .collect();

    let file_name = if ext.is_empty() {
      stamp.to_string()
    } else {
      format!("{stamp}.{ext}")
    };

    tokio::fs::write(self.upload_dir.join(&file_name), data)
      .await
      .map_err(|e| MediaError(e.to_string()))?;

    Ok(format!("{}/uploads/{file_name}", self.public_base_url))
  }
}

// ─── Upload handler ──────────────────────────────────────────────────────────

/// `POST /investors/:id/photo` — multipart body with a `photo` file field.
///
/// Persists the file, writes the resulting URL to the investor's photo
/// field, and returns the updated record.
pub async fn upload<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Path(id): Path<Uuid>,
  mut multipart: Multipart,
) -> Result<Json<Investor>, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let mut upload: Option<(Option<String>, bytes::Bytes)> = None;

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
  {
    if field.name() != Some("photo") {
      continue;
    }
    let extension = field
      .file_name()
      .and_then(|f| f.rsplit_once('.'))
      .map(|(_, ext)| ext.to_owned());
    let data = field
      .bytes()
      .await
      .map_err(|e| ApiError::BadRequest(format!("cannot read upload: {e}")))?;
    upload = Some((extension, data));
    break;
  }

  let Some((extension, data)) = upload else {
    return Err(ApiError::BadRequest("no photo field in upload".to_owned()));
  };

  let photo_url = state.media.store(extension.as_deref(), &data).await?;

  let investor = state
    .store
    .update(id, InvestorUpdate {
      photo_url: Some(photo_url.clone()),
      ..Default::default()
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("investor {id} not found")))?;

  tracing::info!(investor_id = %id, %photo_url, "photo uploaded");
  Ok(Json(investor))
}
