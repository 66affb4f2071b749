//! Session-gated synchronization and presentation state for Liftlog.
//!
//! This crate decides what data is fetched, when, in what order, and how the
//! presentation state reflects it. It is generic over the backing service
//! traits from `liftlog-core` and over a [`charts::ChartSurface`], so it can
//! be driven by the terminal UI or by tests without either knowing about the
//! other.
//!
//! The [`orchestrator::Orchestrator`] is the entry point; everything else is
//! a component it sequences.

pub mod accordion;
pub mod charts;
pub mod dashboard;
pub mod error;
pub mod orchestrator;
pub mod records;
pub mod role_gate;
pub mod session;

pub use error::{ClientError, Result};
pub use orchestrator::Orchestrator;
