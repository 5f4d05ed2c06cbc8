//! The `NoteStore` trait.
//!
//! Implemented by storage backends (e.g. `jot-store-sqlite`). The CLI and the
//! viewer depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::{group::GroupName, health::HealthReport, note::Note};

/// Abstraction over a jot store backend.
///
/// Every group referenced by a note has both a table and exactly one
/// registry entry. Backends establish this for the default group on open and
/// for every other group on its first write.
///
/// Wherever a group is taken as `&str`, the empty string means
/// [`GroupName::DEFAULT`].
pub trait NoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append a note to `group`, creating and registering the group first if
  /// it does not exist yet. Returns the persisted note.
  fn write_note<'a>(
    &'a self,
    group: &'a str,
    text: &'a str,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + 'a;

  /// Bodies of every note in `group`, oldest first. A group that was never
  /// written to yields an empty list and is not created.
  fn read_group<'a>(
    &'a self,
    group: &'a str,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Like [`read_group`](Self::read_group) but returns full rows.
  fn read_notes<'a>(
    &'a self,
    group: &'a str,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + 'a;

  /// Whether a group spelled exactly `name` has been written to and its
  /// table exists. Case matters even where the backend folds identifiers.
  /// Never fails; invalid names and backend errors report `false`.
  fn group_exists<'a>(&'a self, name: &'a str) -> impl Future<Output = bool> + Send + 'a;

  /// Every registered group, in registration order.
  fn list_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<GroupName>, Self::Error>> + Send + '_;

  /// Probe the backend. Never fails; a dead handle is reported in the
  /// returned snapshot.
  fn health(&self) -> impl Future<Output = HealthReport> + Send + '_;
}
