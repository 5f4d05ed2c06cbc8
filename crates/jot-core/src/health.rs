//! Diagnostic snapshot of the store's database handle.
//!
//! Nothing on the note-writing or viewing path consults this; it exists so a
//! user can inspect the handle with `jot health`.

use std::{collections::BTreeMap, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
  Up,
  Down,
}

impl HealthStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      HealthStatus::Up => "up",
      HealthStatus::Down => "down",
    }
  }
}

/// Connection statistics plus a liveness verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
  pub status:           HealthStatus,
  pub message:          String,
  /// Probe diagnostic; only present when `status` is `Down`.
  pub error:            Option<String>,
  pub open_connections: u64,
  pub in_use:           u64,
  pub idle:             u64,
  pub wait_count:       u64,
  pub wait_duration:    Duration,
  pub idle_closed:      u64,
  pub lifetime_closed:  u64,
}

impl HealthReport {
  pub const HEALTHY: &'static str = "It's healthy";

  /// A report for a probe that failed with `error`.
  pub fn down(error: impl Into<String>) -> Self {
    let error = error.into();
    Self {
      status:           HealthStatus::Down,
      message:          format!("db down: {error}"),
      error:            Some(error),
      open_connections: 0,
      in_use:           0,
      idle:             0,
      wait_count:       0,
      wait_duration:    Duration::ZERO,
      idle_closed:      0,
      lifetime_closed:  0,
    }
  }

  /// A report for a live handle. The message is derived from the counters.
  pub fn up(
    open_connections: u64,
    in_use: u64,
    wait_count: u64,
    wait_duration: Duration,
  ) -> Self {
    let mut report = Self {
      status: HealthStatus::Up,
      message: Self::HEALTHY.to_owned(),
      error: None,
      open_connections,
      in_use,
      idle: open_connections.saturating_sub(in_use),
      wait_count,
      wait_duration,
      idle_closed: 0,
      lifetime_closed: 0,
    };
    report.message = report.assess().to_owned();
    report
  }

  /// Pick the most pressing message; later checks win.
  fn assess(&self) -> &'static str {
    let mut message = Self::HEALTHY;
    if self.open_connections > 40 {
      message = "The database is experiencing heavy load.";
    }
    if self.wait_count > 1000 {
      message = "The database has a high number of wait events, indicating potential bottlenecks.";
    }
    if self.idle_closed > self.open_connections / 2 {
      message = "Many idle connections are being closed, consider revising the connection pool settings.";
    }
    if self.lifetime_closed > self.open_connections / 2 {
      message = "Many connections are being closed due to max lifetime, consider increasing max lifetime or revising the connection usage pattern.";
    }
    message
  }

  pub fn is_up(&self) -> bool { self.status == HealthStatus::Up }

  /// Flatten into the keyed snapshot printed by `jot health`.
  pub fn to_map(&self) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    map.insert("status".to_owned(), self.status.as_str().to_owned());
    map.insert("message".to_owned(), self.message.clone());
    if let Some(error) = &self.error {
      map.insert("error".to_owned(), error.clone());
      return map;
    }
    map.insert("open_connections".to_owned(), self.open_connections.to_string());
    map.insert("in_use".to_owned(), self.in_use.to_string());
    map.insert("idle".to_owned(), self.idle.to_string());
    map.insert("wait_count".to_owned(), self.wait_count.to_string());
    map.insert("wait_duration".to_owned(), format!("{:?}", self.wait_duration));
    map.insert("max_idle_closed".to_owned(), self.idle_closed.to_string());
    map.insert("max_lifetime_closed".to_owned(), self.lifetime_closed.to_string());
    map
  }
}
