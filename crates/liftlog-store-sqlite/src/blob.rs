//! [`BlobStore`] for [`SqliteBackend`].
//!
//! Objects live in the `blobs` table. Public URLs carry a version parameter
//! derived from the SHA-256 of the content, so a re-upload under the same key
//! yields a new URL and stale cached images are never shown.

use bytes::Bytes;
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use sha2::{Digest, Sha256};

use liftlog_core::backend::BlobStore;

use crate::{Error, Result, encode::encode_dt, store::SqliteBackend};

/// SHA-256 hex digest of `content`.
pub fn content_hash(content: &[u8]) -> String {
  hex::encode(Sha256::digest(content))
}

/// Build the public URL of an object from its content hash.
pub fn public_url_for(base: &str, bucket: &str, key: &str, hash: &str) -> String {
  let version = &hash[..hash.len().min(16)];
  format!("{base}/{bucket}/{key}?v={version}")
}

impl SqliteBackend {
  /// Objects may only be written under keys prefixed with the caller's id.
  fn require_key_owner(&self, key: &str) -> Result<()> {
    let session = self.require_session()?;
    if !key.starts_with(&session.user_id().to_string()) {
      return Err(Error::Forbidden(format!("key {key:?} belongs to another account")));
    }
    Ok(())
  }
}

impl BlobStore for SqliteBackend {
  type Error = Error;

  async fn upload(
    &self,
    bucket: String,
    key: String,
    bytes: Bytes,
    overwrite: bool,
  ) -> Result<()> {
    self.require_key_owner(&key)?;

    let hash   = content_hash(&bytes);
    let at_str = encode_dt(Utc::now());
    let content = bytes.to_vec();
    let (bucket_q, key_q) = (bucket.clone(), key.clone());

    let written = self
      .conn
      .call(move |conn| {
        let sql = if overwrite {
          "INSERT INTO blobs (bucket, key, content, content_hash, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(bucket, key) DO UPDATE SET
             content      = excluded.content,
             content_hash = excluded.content_hash,
             updated_at   = excluded.updated_at"
        } else {
          "INSERT INTO blobs (bucket, key, content, content_hash, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(bucket, key) DO NOTHING"
        };
        Ok(conn.execute(
          sql,
          rusqlite::params![bucket_q, key_q, content, hash, at_str],
        )?)
      })
      .await?;

    if written == 0 {
      return Err(Error::BlobExists { bucket, key });
    }
    tracing::debug!(%bucket, %key, size = bytes.len(), "blob stored");
    Ok(())
  }

  async fn public_url(&self, bucket: String, key: String) -> Result<Option<String>> {
    let (bucket_q, key_q) = (bucket.clone(), key.clone());

    let hash: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT content_hash FROM blobs WHERE bucket = ?1 AND key = ?2",
              rusqlite::params![bucket_q, key_q],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(hash.map(|h| public_url_for(&self.public_base_url, &bucket, &key, &h)))
  }

  async fn remove(&self, bucket: String, keys: Vec<String>) -> Result<()> {
    for key in &keys {
      self.require_key_owner(key)?;
    }

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for key in &keys {
          tx.execute(
            "DELETE FROM blobs WHERE bucket = ?1 AND key = ?2",
            rusqlite::params![bucket, key],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_is_stable_and_content_sensitive() {
    assert_eq!(content_hash(b"jpeg"), content_hash(b"jpeg"));
    assert_ne!(content_hash(b"jpeg"), content_hash(b"jpeg2"));
    assert_eq!(content_hash(b"").len(), 64);
  }

  #[test]
  fn url_carries_short_version() {
    let hash = content_hash(b"abc");
    let url = public_url_for("https://cdn.example", "profiles", "u.jpg", &hash);
    assert_eq!(url, format!("https://cdn.example/profiles/u.jpg?v={}", &hash[..16]));
  }
}
