//! Integration tests for `SqliteStore` against an in-memory database.

use jot_core::{GroupName, NoteStore};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Tables and registry rows, for checking that a failed call left no trace.
async fn snapshot(s: &SqliteStore) -> (Vec<String>, Vec<String>) {
  (s.table_names().await.unwrap(), s.registry_rows().await.unwrap())
}

// ─── Bootstrap ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn open_creates_registry_and_default_group() {
  let s = store().await;

  let (tables, registry) = snapshot(&s).await;
  assert_eq!(tables, ["_group_names", "general"]);
  assert_eq!(registry, ["general"]);
  assert!(s.group_exists("general").await);
}

#[tokio::test]
async fn default_group_is_empty_after_open() {
  let s = store().await;
  assert!(s.read_group("").await.unwrap().is_empty());
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn write_then_read_returns_note_last() {
  let s = store().await;

  s.write_note("work", "first").await.unwrap();
  s.write_note("work", "ship the feature").await.unwrap();

  let notes = s.read_group("work").await.unwrap();
  assert_eq!(notes.last().map(String::as_str), Some("ship the feature"));
}

#[tokio::test]
async fn reads_preserve_write_order() {
  let s = store().await;
  let bodies = ["one", "two", "three", "four", "five"];

  for body in bodies {
    s.write_note("log", body).await.unwrap();
  }

  assert_eq!(s.read_group("log").await.unwrap(), bodies);

  let notes = s.read_notes("log").await.unwrap();
  assert!(notes.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn empty_group_writes_to_general() {
  let s = store().await;

  let note = s.write_note("", "hello world").await.unwrap();
  assert_eq!(note.body, "hello world");

  assert_eq!(s.read_group("general").await.unwrap(), ["hello world"]);
  assert_eq!(s.read_group("").await.unwrap(), ["hello world"]);
}

#[tokio::test]
async fn first_write_creates_and_registers_group() {
  let s = store().await;
  assert!(!s.group_exists("work").await);

  s.write_note("work", "ship the feature").await.unwrap();

  assert!(s.group_exists("work").await);
  let (tables, registry) = snapshot(&s).await;
  assert!(tables.iter().any(|t| t == "work"));
  assert_eq!(registry, ["general", "work"]);
  assert_eq!(s.read_group("work").await.unwrap(), ["ship the feature"]);
}

#[tokio::test]
async fn repeated_writes_keep_one_registry_entry() {
  let s = store().await;

  s.write_note("work", "same").await.unwrap();
  s.write_note("work", "same").await.unwrap();
  s.write_note("", "in general").await.unwrap();

  assert_eq!(s.read_group("work").await.unwrap(), ["same", "same"]);
  let registry = s.registry_rows().await.unwrap();
  assert_eq!(registry.iter().filter(|n| *n == "work").count(), 1);
  assert_eq!(registry.iter().filter(|n| *n == "general").count(), 1);
}

#[tokio::test]
async fn write_returns_persisted_note() {
  let s = store().await;

  let a = s.write_note("work", "a").await.unwrap();
  let b = s.write_note("work", "b").await.unwrap();
  assert!(b.id > a.id);

  let notes = s.read_notes("work").await.unwrap();
  assert_eq!(notes, [a, b]);
}

#[tokio::test]
async fn note_ids_are_per_group() {
  let s = store().await;

  let w = s.write_note("work", "w").await.unwrap();
  let h = s.write_note("home", "h").await.unwrap();
  assert_eq!(w.id, 1);
  assert_eq!(h.id, 1);
}

#[tokio::test]
async fn created_at_is_recent_utc() {
  let s = store().await;
  let before = chrono::Utc::now() - chrono::Duration::seconds(5);

  let note = s.write_note("work", "stamped").await.unwrap();

  let after = chrono::Utc::now() + chrono::Duration::seconds(5);
  assert!(note.created_at > before && note.created_at < after);
}

#[tokio::test]
async fn bodies_are_bound_not_interpolated() {
  let s = store().await;
  let nasty = "it's'); DROP TABLE general; --";

  s.write_note("", nasty).await.unwrap();

  assert!(s.group_exists("general").await);
  assert_eq!(s.read_group("").await.unwrap(), [nasty]);
}

#[tokio::test]
async fn unicode_body_roundtrips() {
  let s = store().await;
  s.write_note("", "café ☕ — 日本語").await.unwrap();
  assert_eq!(s.read_group("").await.unwrap(), ["café ☕ — 日本語"]);
}

#[tokio::test]
async fn case_variants_share_a_table() {
  let s = store().await;

  s.write_note("work", "lower").await.unwrap();
  s.write_note("Work", "upper").await.unwrap();

  assert_eq!(s.read_group("Work").await.unwrap().last().map(String::as_str), Some("upper"));
  assert_eq!(s.read_group("work").await.unwrap(), ["lower", "upper"]);
  assert_eq!(s.registry_rows().await.unwrap(), ["general", "work", "Work"]);
  assert!(s.group_exists("Work").await);
}

#[tokio::test]
async fn group_exists_matches_the_exact_spelling() {
  let s = store().await;

  s.write_note("work", "lower").await.unwrap();
  assert!(s.group_exists("work").await);
  assert!(!s.group_exists("WORK").await);
  assert!(!s.group_exists("Work").await);
  assert!(!s.group_exists("General").await);

  s.write_note("Work", "upper").await.unwrap();
  assert!(s.group_exists("Work").await);
  assert!(!s.group_exists("WORK").await);
}

// ─── Rejections ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn reserved_group_is_rejected_without_side_effects() {
  let s = store().await;
  let before = snapshot(&s).await;

  let err = s.write_note("_admin", "hi").await.unwrap_err();
  assert!(err.is_invalid_name(), "unexpected error: {err}");

  assert_eq!(snapshot(&s).await, before);
}

#[tokio::test]
async fn ungrammatical_groups_are_rejected() {
  let s = store().await;
  let before = snapshot(&s).await;

  for name in [
    "_group_names",
    "9lives",
    "two words",
    "x\"; DROP TABLE general; --",
    "sqlite_master",
  ] {
    let err = s.write_note(name, "hi").await.unwrap_err();
    assert!(err.is_invalid_name(), "{name:?}: unexpected error: {err}");
  }

  assert_eq!(snapshot(&s).await, before);
}

#[tokio::test]
async fn empty_body_is_rejected_without_side_effects() {
  let s = store().await;
  let before = snapshot(&s).await;

  let err = s.write_note("fresh", "").await.unwrap_err();
  assert!(err.is_invalid_input(), "unexpected error: {err}");

  assert_eq!(snapshot(&s).await, before);
  assert!(!s.group_exists("fresh").await);
}

#[tokio::test]
async fn invalid_name_takes_precedence_over_empty_body() {
  let s = store().await;
  let err = s.write_note("_admin", "").await.unwrap_err();
  assert!(err.is_invalid_name());
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reading_unknown_group_is_empty_and_creates_nothing() {
  let s = store().await;
  let before = snapshot(&s).await;

  assert!(s.read_group("empty").await.unwrap().is_empty());
  assert!(s.read_notes("empty").await.unwrap().is_empty());

  assert_eq!(snapshot(&s).await, before);
  assert!(!s.group_exists("empty").await);
}

#[tokio::test]
async fn reading_invalid_group_is_rejected() {
  let s = store().await;
  let err = s.read_group("_group_names").await.unwrap_err();
  assert!(err.is_invalid_name());
}

#[tokio::test]
async fn group_exists_is_false_for_invalid_names() {
  let s = store().await;
  assert!(!s.group_exists("").await);
  assert!(!s.group_exists("_group_names").await);
  assert!(!s.group_exists("no such").await);
}

#[tokio::test]
async fn list_groups_in_registration_order() {
  let s = store().await;

  s.write_note("work", "a").await.unwrap();
  s.write_note("home", "b").await.unwrap();
  s.write_note("work", "c").await.unwrap();

  let groups = s.list_groups().await.unwrap();
  let names: Vec<&str> = groups.iter().map(GroupName::as_str).collect();
  assert_eq!(names, ["general", "work", "home"]);
}

#[tokio::test]
async fn every_registered_group_has_a_table() {
  let s = store().await;
  s.write_note("work", "a").await.unwrap();
  s.write_note("home", "b").await.unwrap();

  let tables = s.table_names().await.unwrap();
  for group in s.list_groups().await.unwrap() {
    assert!(tables.iter().any(|t| t == group.as_str()), "{group} has no table");
  }
  for table in tables.iter().filter(|t| !t.starts_with('_')) {
    assert!(s.group_exists(table).await);
    assert_eq!(
      s.registry_rows().await.unwrap().iter().filter(|n| *n == table).count(),
      1
    );
  }
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_up() {
  let s = store().await;
  s.write_note("", "warm up").await.unwrap();

  let report = s.health().await;
  assert!(report.is_up());
  assert_eq!(report.open_connections, 1);
  assert_eq!(report.in_use, 0);
  assert_eq!(report.idle, 1);
  assert_eq!(report.message, jot_core::HealthReport::HEALTHY);
  assert_eq!(report.to_map()["status"], "up");
}

#[tokio::test]
async fn health_after_close_reports_down() {
  let s = store().await;
  let probe = s.clone();

  s.close().await.unwrap();

  let report = probe.health().await;
  assert!(!report.is_up());
  assert!(report.error.is_some());
  assert_eq!(report.to_map()["status"], "down");
}

#[tokio::test]
async fn concurrent_first_writes_register_group_once() {
  let s = store().await;

  let handles: Vec<_> = (0..8)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move { s.write_note("busy", &format!("note {i}")).await })
    })
    .collect();
  for handle in handles {
    handle.await.expect("task panicked").unwrap();
  }

  assert_eq!(s.read_group("busy").await.unwrap().len(), 8);
  let registry = s.registry_rows().await.unwrap();
  assert_eq!(registry.iter().filter(|n| *n == "busy").count(), 1);

  let report = s.health().await;
  assert!(report.is_up());
  assert_eq!(report.in_use, 0);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn notes_survive_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("jot.db");

  let s = SqliteStore::open(&path).await.unwrap();
  s.write_note("log", "entry-one").await.unwrap();
  s.close().await.unwrap();

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.read_group("log").await.unwrap(), ["entry-one"]);
  assert_eq!(s.registry_rows().await.unwrap(), ["general", "log"]);
  s.close().await.unwrap();
}

#[tokio::test]
async fn open_fails_on_unusable_path() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("missing").join("jot.db");

  let err = SqliteStore::open(&path).await.err().expect("open should fail");
  assert!(matches!(err, crate::Error::Init(_)), "unexpected error: {err}");
}
