//! JSON REST API and server glue for the Vestor investor registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`InvestorStore`](vestor_core::store::InvestorStore) /
//! [`MailDispatcher`](vestor_core::mail::MailDispatcher) /
//! [`MediaStore`](vestor_core::media::MediaStore) combination. TLS and
//! reverse-proxy concerns are the deployment's responsibility.

pub mod auth;
pub mod error;
pub mod investors;
pub mod media;
pub mod search;
pub mod status;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, patch, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use vestor_core::{
  mail::MailDispatcher,
  media::MediaStore,
  status::StatusService,
  store::InvestorStore,
};
use vestor_mailer::MailerConfig;

pub use error::ApiError;
pub use media::FsMediaStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` plus
/// `VESTOR_`-prefixed environment overrides.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Base URL clients use to reach this server; photo URLs are built
  /// from it.
  pub public_base_url: String,
  pub store_path:      PathBuf,
  pub upload_dir:      PathBuf,
  pub mail:            MailerConfig,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, M, P> {
  pub store:  Arc<S>,
  pub status: Arc<StatusService<S, M>>,
  pub media:  Arc<P>,
  pub config: Arc<ServerConfig>,
}

// Manual impl: `Arc` clones regardless of the parameters' own cloneability.
impl<S, M, P> Clone for AppState<S, M, P> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      status: self.status.clone(),
      media:  self.media.clone(),
      config: self.config.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for the investor API.
///
/// Uploaded photos are served back statically under `/uploads`.
pub fn router<S, M, P>(state: AppState<S, M, P>) -> Router
where
  S: InvestorStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  M: MailDispatcher + 'static,
  P: MediaStore + 'static,
{
  let upload_dir = state.config.upload_dir.clone();

  Router::new()
    .route(
      "/investors",
      get(investors::list::<S, M, P>).post(investors::create::<S, M, P>),
    )
    .route("/investors/search", get(search::handler::<S, M, P>))
    .route("/investors/login", post(auth::login::<S, M, P>))
    .route(
      "/investors/{id}",
      get(investors::get_one::<S, M, P>)
        .put(investors::update_one::<S, M, P>)
        .delete(investors::delete_one::<S, M, P>),
    )
    .route("/investors/{id}/status", patch(status::handler::<S, M, P>))
    .route("/investors/{id}/photo", post(media::upload::<S, M, P>))
    .nest_service("/uploads", ServeDir::new(upload_dir))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::{Mutex, atomic::AtomicUsize, atomic::Ordering};

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;
  use vestor_core::mail::{MailDispatcher, MailError};
  use vestor_store_sqlite::SqliteStore;

  use super::*;

  /// Mailer double that counts dispatches instead of talking SMTP.
  #[derive(Default)]
  struct RecordingMailer {
    sent:       Mutex<Vec<String>>,
    dispatches: AtomicUsize,
  }

  impl MailDispatcher for RecordingMailer {
    async fn send(
      &self,
      to: &str,
      _subject: &str,
      _body: &str,
    ) -> Result<(), MailError> {
      self.dispatches.fetch_add(1, Ordering::SeqCst);
      self.sent.lock().unwrap().push(to.to_owned());
      Ok(())
    }
  }

  type TestState = AppState<SqliteStore, RecordingMailer, FsMediaStore>;

  async fn make_state() -> (TestState, Arc<RecordingMailer>) {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let mailer = Arc::new(RecordingMailer::default());
    let upload_dir =
      std::env::temp_dir().join(format!("vestor-api-test-{}", Uuid::new_v4()));
    let media = Arc::new(
      FsMediaStore::new(upload_dir.clone(), "http://localhost:8000".to_owned())
        .await
        .unwrap(),
    );

    let config = ServerConfig {
      host:            "127.0.0.1".to_owned(),
      port:            8000,
      public_base_url: "http://localhost:8000".to_owned(),
      store_path:      PathBuf::from(":memory:"),
      upload_dir,
      mail:            MailerConfig {
        smtp_host:    "smtp.example.com".to_owned(),
        username:     "approvals@example.com".to_owned(),
        password:     "unused".to_owned(),
        from_address: "approvals@example.com".to_owned(),
        timeout_secs: 5,
      },
    };

    let state = AppState {
      status: Arc::new(StatusService::new(store.clone(), mailer.clone())),
      store,
      media,
      config: Arc::new(config),
    };
    (state, mailer)
  }

  async fn request(
    state: TestState,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let req = builder.body(body).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn asha() -> Value {
    json!({
      "name": "Asha Rao",
      "first_name": "Asha",
      "email": "a@x.com",
      "mobile": 9998887771i64,
      "categories": ["fintech"],
      "password": "hunter2",
    })
  }

  async fn create_investor(state: &TestState, body: Value) -> Value {
    let resp =
      request(state.clone(), "POST", "/investors", Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
  }

  // ── CRUD ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_get_and_password_is_not_exposed() {
    let (state, _) = make_state().await;
    let created = create_investor(&state, asha()).await;
    assert_eq!(created["name"], "Asha Rao");
    assert_eq!(created["is_approved"], false);
    assert!(created.get("password_hash").is_none());

    let id = created["investor_id"].as_str().unwrap();
    let resp =
      request(state, "GET", &format!("/investors/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = json_body(resp).await;
    assert_eq!(fetched["email"], "a@x.com");
    assert!(fetched.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn duplicate_email_is_a_conflict() {
    let (state, _) = make_state().await;
    create_investor(&state, asha()).await;

    let resp = request(state, "POST", "/investors", Some(asha())).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn get_unknown_or_malformed_id() {
    let (state, _) = make_state().await;

    let resp = request(
      state.clone(),
      "GET",
      &format!("/investors/{}", Uuid::new_v4()),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = request(state, "GET", "/investors/not-a-uuid", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn update_changes_fields_and_missing_id_is_404() {
    let (state, _) = make_state().await;
    let created = create_investor(&state, asha()).await;
    let id = created["investor_id"].as_str().unwrap();

    let resp = request(
      state.clone(),
      "PUT",
      &format!("/investors/{id}"),
      Some(json!({"name": "Asha R. Rao", "mobile": 1112223334i64})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await;
    assert_eq!(updated["name"], "Asha R. Rao");
    assert_eq!(updated["mobile"], 1112223334i64);
    assert_eq!(updated["email"], "a@x.com");

    let resp = request(
      state,
      "PUT",
      &format!("/investors/{}", Uuid::new_v4()),
      Some(json!({"name": "nobody"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_then_get_is_404() {
    let (state, _) = make_state().await;
    let created = create_investor(&state, asha()).await;
    let id = created["investor_id"].as_str().unwrap();

    let resp =
      request(state.clone(), "DELETE", &format!("/investors/{id}"), None)
        .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp =
      request(state, "GET", &format!("/investors/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Search ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_blank_returns_all_and_term_filters() {
    let (state, _) = make_state().await;
    create_investor(&state, asha()).await;
    create_investor(
      &state,
      json!({
        "name": "Beena Shah",
        "first_name": "Beena",
        "email": "b@y.com",
        "mobile": 123i64,
        "password": "pw",
      }),
    )
    .await;

    let resp =
      request(state.clone(), "GET", "/investors/search", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);

    let resp = request(
      state.clone(),
      "GET",
      "/investors/search?query=rao",
      None,
    )
    .await;
    let hits = json_body(resp).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "Asha Rao");

    // Numeric term matches the mobile number exactly.
    let resp =
      request(state, "GET", "/investors/search?query=123", None).await;
    let hits = json_body(resp).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["name"], "Beena Shah");
  }

  // ── Status + notification ───────────────────────────────────────────────────

  #[tokio::test]
  async fn approval_sends_one_email_and_repeat_sends_none() {
    let (state, mailer) = make_state().await;
    let created = create_investor(&state, asha()).await;
    let id = created["investor_id"].as_str().unwrap();
    let body = json!({"is_approved": true, "is_active": true});

    let resp = request(
      state.clone(),
      "PATCH",
      &format!("/investors/{id}/status"),
      Some(body.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let update = json_body(resp).await;
    assert_eq!(update["investor"]["is_approved"], true);
    assert_eq!(update["investor"]["is_active"], true);
    assert_eq!(update["notification"]["outcome"], "sent");
    assert_eq!(mailer.dispatches.load(Ordering::SeqCst), 1);
    assert_eq!(mailer.sent.lock().unwrap()[0], "a@x.com");

    // Same call again: record unchanged, zero additional emails.
    let resp = request(
      state,
      "PATCH",
      &format!("/investors/{id}/status"),
      Some(body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let update = json_body(resp).await;
    assert_eq!(update["investor"]["is_approved"], true);
    assert_eq!(update["notification"]["outcome"], "not_triggered");
    assert_eq!(mailer.dispatches.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn deactivation_never_notifies() {
    let (state, mailer) = make_state().await;
    let created = create_investor(&state, asha()).await;
    let id = created["investor_id"].as_str().unwrap();

    let resp = request(
      state,
      "PATCH",
      &format!("/investors/{id}/status"),
      Some(json!({"is_approved": false, "is_active": true})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(mailer.dispatches.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn status_on_unknown_id_is_404_with_no_email() {
    let (state, mailer) = make_state().await;

    let resp = request(
      state,
      "PATCH",
      &format!("/investors/{}/status", Uuid::new_v4()),
      Some(json!({"is_approved": true, "is_active": true})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(mailer.dispatches.load(Ordering::SeqCst), 0);
  }

  // ── Login ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_paths() {
    let (state, _) = make_state().await;
    let created = create_investor(&state, asha()).await;
    let id = created["investor_id"].as_str().unwrap();

    // Unknown email.
    let resp = request(
      state.clone(),
      "POST",
      "/investors/login",
      Some(json!({"email": "nobody@x.com", "password": "hunter2"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Wrong password.
    let resp = request(
      state.clone(),
      "POST",
      "/investors/login",
      Some(json!({"email": "a@x.com", "password": "wrong"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Correct credentials but still pending approval.
    let resp = request(
      state.clone(),
      "POST",
      "/investors/login",
      Some(json!({"email": "a@x.com", "password": "hunter2"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Approve, then log in.
    request(
      state.clone(),
      "PATCH",
      &format!("/investors/{id}/status"),
      Some(json!({"is_approved": true, "is_active": true})),
    )
    .await;

    let resp = request(
      state,
      "POST",
      "/investors/login",
      Some(json!({"email": "a@x.com", "password": "hunter2"})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let profile = json_body(resp).await;
    assert_eq!(profile["name"], "Asha Rao");
    assert!(profile.get("password_hash").is_none());
  }

  // ── Photo upload ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn photo_upload_stores_file_and_sets_url() {
    let (state, _) = make_state().await;
    let created = create_investor(&state, asha()).await;
    let id = created["investor_id"].as_str().unwrap();

    let boundary = "vestor-test-boundary";
    let body = format!(
      "--{boundary}\r\n\
       Content-Disposition: form-data; name=\"photo\"; filename=\"face.png\"\r\n\
       Content-Type: image/png\r\n\r\n\
       not-really-a-png\r\n\
       --{boundary}--\r\n"
    );

    let req = Request::builder()
      .method("POST")
      .uri(format!("/investors/{id}/photo"))
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={boundary}"),
      )
      .body(Body::from(body))
      .unwrap();
    let resp = router(state.clone()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let investor = json_body(resp).await;
    let url = investor["photo_url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8000/uploads/"));
    assert!(url.ends_with(".png"));

    // The file actually landed in the upload directory.
    let file_name = url.rsplit('/').next().unwrap();
    let on_disk = state.config.upload_dir.join(file_name);
    assert_eq!(
      tokio::fs::read(on_disk).await.unwrap(),
      b"not-really-a-png"
    );
  }

  #[tokio::test]
  async fn photo_upload_without_photo_field_is_rejected() {
    let (state, _) = make_state().await;
    let created = create_investor(&state, asha()).await;
    let id = created["investor_id"].as_str().unwrap();

    let boundary = "vestor-test-boundary";
    let body = format!(
      "--{boundary}\r\n\
       Content-Disposition: form-data; name=\"avatar\"; filename=\"face.png\"\r\n\r\n\
       data\r\n\
       --{boundary}--\r\n"
    );

    let req = Request::builder()
      .method("POST")
      .uri(format!("/investors/{id}/photo"))
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={boundary}"),
      )
      .body(Body::from(body))
      .unwrap();
    let resp = router(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
