//! SQL for the jot SQLite store.
//!
//! The registry table is fixed; group tables are created on demand, one per
//! group, from a validated [`GroupName`].

use jot_core::GroupName;

/// Name of the registry table. The leading underscore keeps it out of the
/// group-name grammar.
pub const REGISTRY_TABLE: &str = "_group_names";

/// Run once per connection; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const BOOTSTRAP: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS _group_names (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    group_name  TEXT NOT NULL
);
";

/// Register `?1` unless it is already present. A single statement, so the
/// lookup and the insert cannot be separated.
pub const REGISTER_GROUP: &str = "
INSERT INTO _group_names (group_name)
SELECT ?1
WHERE NOT EXISTS (SELECT 1 FROM _group_names WHERE group_name = ?1)
";

/// Exact, case-sensitive registry lookup.
pub const REGISTRY_HAS: &str = "SELECT 1 FROM _group_names WHERE group_name = ?1";

pub const LIST_GROUPS: &str = "SELECT group_name FROM _group_names ORDER BY id ASC";

/// SQLite identifiers are case-insensitive, so `Work` and `work` name the
/// same table; the lookup has to match that.
pub const TABLE_EXISTS: &str =
  "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 COLLATE NOCASE";

/// DDL for a group table. `created_at` defaults to `CURRENT_TIMESTAMP`,
/// which SQLite evaluates in UTC.
pub fn create_group_table(group: &GroupName) -> String {
  format!(
    "CREATE TABLE IF NOT EXISTS {} (
         id          INTEGER PRIMARY KEY AUTOINCREMENT,
         note        TEXT NOT NULL,
         created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP
     );",
    group.quoted()
  )
}

/// Insert with the body bound as `?1`.
pub fn insert_note(group: &GroupName) -> String {
  format!(
    "INSERT INTO {} (note) VALUES (?1) RETURNING id, note, created_at",
    group.quoted()
  )
}

pub fn select_notes(group: &GroupName) -> String {
  format!(
    "SELECT id, note, created_at FROM {} ORDER BY id ASC",
    group.quoted()
  )
}
