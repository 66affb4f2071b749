//! Error taxonomy of the client layer.
//!
//! Absence that is a legitimate state (no lift records yet, no profile image)
//! is not an error: it is returned as `None`.

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ClientError {
  /// Malformed or missing user input, caught before any backend call.
  #[error("{0}")]
  Validation(String),

  /// The backing store failed to read or write.
  #[error("record store error: {0}")]
  Fetch(#[source] BoxError),

  /// The blob store refused or failed an upload.
  #[error("upload failed: {0}")]
  Upload(String),

  /// Sign-in or sign-up was refused by the auth service.
  #[error("authentication failed: {0}")]
  Auth(#[source] BoxError),

  /// The action needs a session and there is none.
  #[error("not signed in")]
  NotSignedIn,
}

impl ClientError {
  pub fn fetch(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Fetch(Box::new(e))
  }

  pub fn auth(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Auth(Box::new(e))
  }

  pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
