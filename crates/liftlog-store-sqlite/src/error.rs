//! Error type for `liftlog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] liftlog_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("an account already exists for {0}")]
  EmailTaken(String),

  #[error("not signed in")]
  Unauthenticated,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("profile not found: {0}")]
  ProfileNotFound(uuid::Uuid),

  #[error("no account for {0}")]
  UnknownEmail(String),

  #[error("weight sample not found: {0}")]
  WeightNotFound(i64),

  #[error("object already exists: {bucket}/{key}")]
  BlobExists { bucket: String, key: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
