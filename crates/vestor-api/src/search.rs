//! Handler for `GET /investors/search`.

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use vestor_core::{
  investor::Investor,
  mail::MailDispatcher,
  media::MediaStore,
  query::SearchFilter,
  store::InvestorStore,
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Free-text term; absent or blank means "return everything".
  pub query: Option<String>,
}

/// `GET /investors/search[?query=...]`
pub async fn handler<S, M, P>(
  State(state): State<AppState<S, M, P>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Investor>>, ApiError>
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let filter = SearchFilter::parse(params.query.as_deref().unwrap_or(""));
  let investors = state
    .store
    .search(&filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(investors))
}
