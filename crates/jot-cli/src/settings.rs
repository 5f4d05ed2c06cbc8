//! Layered settings: config file, then `JOT_*` environment variables, then
//! command-line flags (`--db` / `DB_URL`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Store file used when nothing else names one.
pub const DEFAULT_DB_PATH: &str = "jot.db";

/// Shape of the optional TOML config file.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
  /// Path of the SQLite file. `~/` is expanded.
  #[serde(default)]
  pub db_path: Option<PathBuf>,
}

impl Settings {
  /// Load settings. An explicit `file` must exist; otherwise the default
  /// location is read if present.
  pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
    Self::load_with(file, config::Environment::with_prefix("JOT"))
  }

  /// [`load`](Self::load) with the environment layer supplied by the caller.
  fn load_with(file: Option<&Path>, env: config::Environment) -> anyhow::Result<Self> {
    let (path, required) = match file {
      Some(path) => (Some(path.to_path_buf()), true),
      None => (default_config_path(), false),
    };

    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder = builder.add_source(config::File::from(path).required(required));
    }

    builder
      .add_source(env)
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// The store location. `flag` (from `--db` or `DB_URL`) wins over the
  /// settings, which win over [`DEFAULT_DB_PATH`].
  pub fn db_path(&self, flag: Option<&Path>) -> PathBuf {
    let path = flag
      .map(Path::to_path_buf)
      .or_else(|| self.db_path.clone())
      .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
    expand_tilde(&path)
  }
}

/// `$XDG_CONFIG_HOME/jot/config.toml`, falling back to `~/.config`.
fn default_config_path() -> Option<PathBuf> {
  let base = std::env::var_os("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
  Some(base.join("jot").join("config.toml"))
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
