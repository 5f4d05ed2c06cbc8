//! [`SqliteStore`]: the SQLite implementation of [`NoteStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
  time::{Duration, Instant},
};

use jot_core::{GroupName, HealthReport, Note, NoteStore};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  encode::RawNote,
  schema::{self, BOOTSTRAP, LIST_GROUPS, REGISTER_GROUP, REGISTRY_HAS, TABLE_EXISTS},
};

/// Deadline for the liveness probe in [`NoteStore::health`].
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(1);

// ─── Call statistics ─────────────────────────────────────────────────────────

/// Counters behind the health snapshot.
///
/// All calls are serialised onto one connection thread; a call "waits" when
/// it was submitted while another was still in flight.
#[derive(Debug, Default)]
struct CallStats {
  in_flight:  AtomicU64,
  wait_count: AtomicU64,
  wait_nanos: AtomicU64,
}

/// Decrements `in_flight` even if the awaiting future is dropped.
struct InFlight<'a>(&'a AtomicU64);

impl Drop for InFlight<'_> {
  fn drop(&mut self) { self.0.fetch_sub(1, Ordering::SeqCst); }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A jot note store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  stats: Arc<CallStats>,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, create the registry and make sure
  /// the default group exists.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::Init)?;
    Self::bootstrap(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Init)?;
    Self::bootstrap(conn).await
  }

  async fn bootstrap(conn: tokio_rusqlite::Connection) -> Result<Self> {
    let store = Self { conn, stats: Arc::default() };
    let general = GroupName::general();
    debug!(registry = schema::REGISTRY_TABLE, default_group = %general, "bootstrapping schema");

    store
      .call(move |conn| {
        conn.execute_batch(BOOTSTRAP)?;
        let tx = conn.transaction()?;
        ensure_group(&tx, &general)?;
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::Init)?;

    Ok(store)
  }

  /// Release the connection. Consumes the store, so it runs at most once
  /// per handle.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await.map_err(Error::Close)?;
    debug!("store closed");
    Ok(())
  }

  /// Run `function` on the connection thread, keeping the call statistics.
  async fn call<F, R>(&self, function: F) -> tokio_rusqlite::Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let queued_behind = self.stats.in_flight.fetch_add(1, Ordering::SeqCst);
    let _guard = InFlight(&self.stats.in_flight);
    let stats = Arc::clone(&self.stats);
    let submitted = Instant::now();

    self
      .conn
      .call(move |conn| {
        if queued_behind > 0 {
          let waited = u64::try_from(submitted.elapsed().as_nanos()).unwrap_or(u64::MAX);
          stats.wait_count.fetch_add(1, Ordering::Relaxed);
          stats.wait_nanos.fetch_add(waited, Ordering::Relaxed);
        }
        function(conn)
      })
      .await
  }

  #[cfg(test)]
  pub(crate) async fn table_names(&self) -> Result<Vec<String>> {
    self
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name FROM sqlite_master
           WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
           ORDER BY name",
        )?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await
      .map_err(Error::Read)
  }

  /// Raw registry contents, duplicates included.
  #[cfg(test)]
  pub(crate) async fn registry_rows(&self) -> Result<Vec<String>> {
    self
      .call(|conn| {
        let mut stmt = conn.prepare(LIST_GROUPS)?;
        let names = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
      })
      .await
      .map_err(Error::Read)
  }
}

/// Create the group table, then register it. Callers run this inside a
/// transaction so neither half can be left behind without the other.
fn ensure_group(conn: &rusqlite::Connection, group: &GroupName) -> rusqlite::Result<bool> {
  let existed = table_exists(conn, group.as_str())?;
  conn.execute_batch(&schema::create_group_table(group))?;
  conn.execute(REGISTER_GROUP, rusqlite::params![group.as_str()])?;
  if !existed {
    debug!(%group, "created group table");
  }
  Ok(!existed)
}

fn table_exists(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(TABLE_EXISTS, rusqlite::params![name], |_| Ok(true))
      .optional()?
      .unwrap_or(false),
  )
}

// ─── NoteStore impl ──────────────────────────────────────────────────────────

impl NoteStore for SqliteStore {
  type Error = Error;

  async fn write_note(&self, group: &str, text: &str) -> Result<Note> {
    let group = GroupName::resolve(group)?;
    Note::validate_body(text)?;

    let insert = schema::insert_note(&group);
    let body = text.to_owned();
    let target = group.clone();

    let raw: RawNote = self
      .call(move |conn| {
        let tx = conn.transaction()?;
        ensure_group(&tx, &target)?;
        let raw = tx.query_row(&insert, rusqlite::params![body], RawNote::from_row)?;
        tx.commit()?;
        Ok(raw)
      })
      .await
      .map_err(Error::Write)?;

    let note = raw.into_note()?;
    info!(%group, id = note.id, "note written");
    Ok(note)
  }

  async fn read_group(&self, group: &str) -> Result<Vec<String>> {
    let notes = self.read_notes(group).await?;
    Ok(notes.into_iter().map(|n| n.body).collect())
  }

  async fn read_notes(&self, group: &str) -> Result<Vec<Note>> {
    let group = GroupName::resolve(group)?;
    let select = schema::select_notes(&group);
    let name = group.as_str().to_owned();

    let raws: Vec<RawNote> = self
      .call(move |conn| {
        if !table_exists(conn, &name)? {
          return Ok(Vec::new());
        }
        let mut stmt = conn.prepare(&select)?;
        let rows = stmt
          .query_map([], RawNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Read)?;

    debug!(%group, count = raws.len(), "read notes");
    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn group_exists(&self, name: &str) -> bool {
    let Ok(group) = GroupName::parse(name) else {
      return false;
    };
    let name = group.as_str().to_owned();
    self
      .call(move |conn| {
        // The table lookup ignores case, so the registry pins the spelling.
        let registered = conn
          .query_row(REGISTRY_HAS, rusqlite::params![name], |_| Ok(true))
          .optional()?
          .unwrap_or(false);
        Ok(registered && table_exists(conn, &name)?)
      })
      .await
      .unwrap_or(false)
  }

  async fn list_groups(&self) -> Result<Vec<GroupName>> {
    let names: Vec<String> = self
      .call(|conn| {
        let mut stmt = conn.prepare(LIST_GROUPS)?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Read)?;

    let mut groups: Vec<GroupName> = Vec::with_capacity(names.len());
    for name in names {
      match GroupName::parse(&name) {
        Ok(group) if !groups.contains(&group) => groups.push(group),
        Ok(_) => {}
        // Files written by older tools may hold names outside the grammar.
        Err(_) => warn!(name = %name, "skipping registry entry with invalid name"),
      }
    }
    Ok(groups)
  }

  async fn health(&self) -> HealthReport {
    let in_use = self.stats.in_flight.load(Ordering::SeqCst);
    let probe = self.call(|conn| {
      conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
      Ok(())
    });

    match tokio::time::timeout(HEALTH_TIMEOUT, probe).await {
      Ok(Ok(())) => HealthReport::up(
        1,
        in_use,
        self.stats.wait_count.load(Ordering::Relaxed),
        Duration::from_nanos(self.stats.wait_nanos.load(Ordering::Relaxed)),
      ),
      Ok(Err(e)) => {
        warn!(error = %e, "health probe failed");
        HealthReport::down(e.to_string())
      }
      Err(_) => {
        warn!("health probe timed out");
        HealthReport::down(format!("probe timed out after {HEALTH_TIMEOUT:?}"))
      }
    }
  }
}
