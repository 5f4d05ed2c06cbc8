//! Error types for `jot-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// A group name failed the naming grammar.
  #[error("invalid group name: {0:?}")]
  InvalidName(String),

  #[error("invalid input: {0}")]
  InvalidInput(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
