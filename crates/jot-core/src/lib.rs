//! Core types and trait definitions for the jot note store.
//!
//! This crate is deliberately free of database and terminal dependencies.
//! The SQLite backend and the CLI both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod group;
pub mod health;
pub mod note;
pub mod store;

pub use error::{Error, Result};
pub use group::GroupName;
pub use health::{HealthReport, HealthStatus};
pub use note::Note;
pub use store::NoteStore;
