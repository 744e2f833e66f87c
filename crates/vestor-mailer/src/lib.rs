//! SMTP implementation of [`MailDispatcher`] over [`lettre`].
//!
//! Credentials and the relay host come from injected configuration, never
//! from constants in code. Sends are bounded by a timeout; a timed-out
//! send surfaces as an ordinary [`MailError`].

use std::time::Duration;

use lettre::{
  AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
  message::Mailbox,
  transport::smtp::authentication::Credentials,
};
use serde::Deserialize;
use vestor_core::mail::{MailDispatcher, MailError};

fn default_timeout_secs() -> u64 { 10 }

/// SMTP relay settings, deserialised from the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailerConfig {
  /// Relay hostname, e.g. `smtp.gmail.com`.
  pub smtp_host:    String,
  pub username:     String,
  /// App password or equivalent relay secret.
  pub password:     String,
  /// Sender address placed in the `From` header.
  pub from_address: String,
  /// Upper bound on a single send, in seconds.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

/// A [`MailDispatcher`] backed by an async SMTP transport with TLS.
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from:      Mailbox,
}

impl SmtpMailer {
  pub fn new(config: &MailerConfig) -> Result<Self, MailError> {
    let transport =
      AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        .map_err(|e| MailError(e.to_string()))?
        .credentials(Credentials::new(
          config.username.clone(),
          config.password.clone(),
        ))
        .timeout(Some(Duration::from_secs(config.timeout_secs)))
        .build();

    let from: Mailbox = config
      .from_address
      .parse()
      .map_err(|e| MailError(format!("invalid from address: {e}")))?;

    Ok(Self { transport, from })
  }
}

impl MailDispatcher for SmtpMailer {
  async fn send(
    &self,
    to: &str,
    subject: &str,
    body: &str,
  ) -> Result<(), MailError> {
    let recipient: Mailbox = to
      .parse()
      .map_err(|e| MailError(format!("invalid recipient {to:?}: {e}")))?;

    let message = Message::builder()
      .from(self.from.clone())
      .to(recipient)
      .subject(subject)
      .body(body.to_owned())
      .map_err(|e| MailError(e.to_string()))?;

    self
      .transport
      .send(message)
      .await
      .map_err(|e| MailError(e.to_string()))?;

    tracing::debug!(%to, "mail handed to relay");
    Ok(())
  }
}
