//! Note: a single captured line of text within a group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted note. Notes are never mutated or deleted once written.
///
/// `id` is assigned by the store and is unique only within its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub id:         i64,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

impl Note {
  /// Check a note body before it is written. Only the empty string is
  /// rejected; any other UTF-8 text is accepted verbatim.
  pub fn validate_body(body: &str) -> Result<()> {
    if body.is_empty() {
      return Err(Error::InvalidInput("note body must not be empty"));
    }
    Ok(())
  }
}
