//! Group names: the flat category a note is filed under.
//!
//! Each group is stored as its own table, so a name ends up in an SQL
//! identifier position where parameter binding cannot reach. [`GroupName`]
//! can only be constructed through [`GroupName::parse`], which enforces the
//! naming grammar; holding one is proof that the name is safe to interpolate.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{Error, Result};

/// Longest admissible name: one leading letter plus up to 62 more characters.
pub const MAX_LEN: usize = 63;

/// A validated group name matching `[A-Za-z][A-Za-z0-9_]{0,62}`.
///
/// Names are case-sensitive. Names beginning with `_` are reserved for the
/// store's own bookkeeping tables and are never admitted; the leading-letter
/// rule already excludes them. Names beginning with `sqlite_` (in any case)
/// are reserved by SQLite itself and are rejected as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupName(String);

impl GroupName {
  /// The group notes land in when no group is given.
  pub const DEFAULT: &'static str = "general";

  /// The default group, `general`.
  pub fn general() -> Self { Self(Self::DEFAULT.to_owned()) }

  /// Validate `name` against the grammar.
  pub fn parse(name: &str) -> Result<Self> {
    if is_valid(name) {
      Ok(Self(name.to_owned()))
    } else {
      Err(Error::InvalidName(name.to_owned()))
    }
  }

  /// Like [`parse`](Self::parse), but an empty string resolves to the
  /// default group.
  pub fn resolve(name: &str) -> Result<Self> {
    if name.is_empty() {
      Ok(Self::general())
    } else {
      Self::parse(name)
    }
  }

  pub fn as_str(&self) -> &str { &self.0 }

  /// The name as a double-quoted SQL identifier.
  ///
  /// The grammar admits no quote characters, so no escaping is needed.
  pub fn quoted(&self) -> String { format!("\"{}\"", self.0) }
}

fn is_valid(name: &str) -> bool {
  let bytes = name.as_bytes();
  let Some(first) = bytes.first() else {
    return false;
  };
  if !first.is_ascii_alphabetic() || bytes.len() > MAX_LEN {
    return false;
  }
  if bytes
    .get(..7)
    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(b"sqlite_"))
  {
    return false;
  }
  bytes[1..]
    .iter()
    .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}

impl fmt::Display for GroupName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for GroupName {
  fn as_ref(&self) -> &str { &self.0 }
}

impl FromStr for GroupName {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}
