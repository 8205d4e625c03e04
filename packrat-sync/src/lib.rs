//! # packrat-sync
//!
//! Fingerprint-gated backup/sync orchestration.
//!
//! Call [`runner::run`] with an [`ObjectStore`](packrat_store::ObjectStore),
//! a validated config and a [`RunMode`](packrat_core::types::RunMode) to
//! drive one end-to-end run.

pub mod error;
pub mod fingerprint;
pub mod record;
pub mod retention;
pub mod runner;

pub use error::SyncError;
pub use fingerprint::fingerprint;
pub use runner::{run, RunReport};
