//! Core types and trait definitions for Liftlog.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! It defines the domain records and the backing service contract that the
//! client layer consumes and storage backends implement.

pub mod backend;
pub mod error;
pub mod identity;
pub mod lift;
pub mod profile;
pub mod weight;

pub use error::{Error, Result};
