//! SQLite backend for Liftlog.
//!
//! [`SqliteBackend`] implements the whole backing service contract from
//! `liftlog-core` (auth, tables, blobs) on one SQLite file. It wraps
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod auth;
mod blob;
mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteBackend;

#[cfg(test)]
mod tests;
