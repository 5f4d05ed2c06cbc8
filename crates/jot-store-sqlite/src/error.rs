//! Error type for `jot-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Validation failure: an invalid group name or an empty note body.
  #[error(transparent)]
  Core(#[from] jot_core::Error),

  /// The store could not be opened or its schema bootstrapped.
  #[error("failed to initialise store: {0}")]
  Init(#[source] tokio_rusqlite::Error),

  #[error("failed to write note: {0}")]
  Write(#[source] tokio_rusqlite::Error),

  #[error("failed to read notes: {0}")]
  Read(#[source] tokio_rusqlite::Error),

  #[error("failed to close store: {0}")]
  Close(#[source] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  pub fn is_invalid_name(&self) -> bool {
    matches!(self, Error::Core(jot_core::Error::InvalidName(_)))
  }

  pub fn is_invalid_input(&self) -> bool {
    matches!(self, Error::Core(jot_core::Error::InvalidInput(_)))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
