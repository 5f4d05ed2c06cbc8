//! Decoding helpers between SQLite rows and domain types.
//!
//! `created_at` is written by SQLite's `CURRENT_TIMESTAMP`, which produces
//! UTC text in the form `YYYY-MM-DD HH:MM:SS`.

use chrono::{DateTime, NaiveDateTime, Utc};
use jot_core::Note;

use crate::{Error, Result};

const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

pub fn decode_timestamp(s: &str) -> Result<DateTime<Utc>> {
  NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP)
    .map(|dt| dt.and_utc())
    .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc)))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Raw row ──────────────────────────────────────────────────────────────────

/// A note row as read from a group table, before timestamp decoding.
pub struct RawNote {
  pub id:         i64,
  pub note:       String,
  pub created_at: String,
}

impl RawNote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      note:       row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:         self.id,
      body:       self.note,
      created_at: decode_timestamp(&self.created_at)?,
    })
  }
}
