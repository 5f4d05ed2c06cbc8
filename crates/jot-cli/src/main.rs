//! `jot`: capture short notes from the shell and browse them by group.
//!
//! # Usage
//!
//! ```text
//! jot note pick up the dry cleaning
//! jot note -g work ship the feature
//! jot view -g work
//! ```

mod app;
mod settings;
mod ui;

use std::{io, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{CommandFactory, Parser, Subcommand};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use jot_core::NoteStore;
use jot_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "jot", version, about = "jot, a quick note taking app.")]
struct Cli {
  /// Path to the SQLite store.
  #[arg(long, global = true, env = "DB_URL", value_name = "PATH")]
  db: Option<PathBuf>,

  /// Path to a TOML config file.
  #[arg(short, long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
  /// Write a note.
  Note {
    /// Words of the note; joined with single spaces.
    #[arg(required = true, num_args = 1..)]
    words: Vec<String>,

    /// Group to write the note to (default: general).
    #[arg(short, long, default_value = "")]
    group: String,
  },

  /// Browse the notes of a group.
  View {
    /// Group to browse (default: general).
    #[arg(short, long, default_value = "")]
    group: String,
  },

  /// List every known group.
  Groups,

  /// Print diagnostics about the store's database handle.
  Health {
    /// Print as JSON.
    #[arg(long)]
    json: bool,
  },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(e) => {
      // --help and --version land here too and are not failures.
      let failed = e.use_stderr();
      e.print().ok();
      return if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
    }
  };

  match run(cli).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("jot: {e:#}");
      ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<()> {
  let Some(command) = cli.command else {
    Cli::command().print_help().context("printing help")?;
    return Ok(());
  };

  let settings = Settings::load(cli.config.as_deref())?;
  let db_path = settings.db_path(cli.db.as_deref());
  tracing::debug!(path = %db_path.display(), "opening store");

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {}", db_path.display()))?;

  let result = dispatch(&store, command).await;

  // Release the handle regardless of how the command went; the command's
  // own error takes precedence.
  let closed = store.close().await.context("failed to close store");
  result.and(closed)
}

async fn dispatch(store: &SqliteStore, command: Command) -> Result<()> {
  match command {
    Command::Note { words, group } => {
      let text = words.join(" ");
      store
        .write_note(&group, &text)
        .await
        .context("problem writing the note")?;
    }

    Command::View { group } => {
      let app = App::load(store, &group)
        .await
        .context("problem reading the notes")?;
      if let Some(note) = run_viewer(app).await? {
        println!("{note}");
      }
    }

    Command::Groups => {
      for group in store.list_groups().await.context("problem listing groups")? {
        println!("{group}");
      }
    }

    Command::Health { json } => {
      let report = store.health().await;
      let map = report.to_map();
      if json {
        println!("{}", serde_json::to_string_pretty(&map)?);
      } else {
        for (key, value) in &map {
          println!("{key}: {value}");
        }
      }
    }
  }
  Ok(())
}

// ─── Viewer ───────────────────────────────────────────────────────────────────

/// Run the interactive list until the user quits; returns the note to print.
async fn run_viewer(mut app: App) -> Result<Option<String>> {
  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  if let Err(e) = execute!(stdout, EnterAlternateScreen) {
    disable_raw_mode().ok();
    return Err(e).context("entering alternate screen");
  }
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = match Terminal::new(backend) {
    Ok(terminal) => terminal,
    Err(e) => {
      disable_raw_mode().ok();
      execute!(io::stdout(), LeaveAlternateScreen).ok();
      return Err(e).context("creating terminal");
    }
  };

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result.context("terminal UI failed")?;
  Ok(app.emitted().map(str::to_owned))
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Resize and other events redraw on the next iteration.
      Some(_) | None => {}
    }
  }

  Ok(())
}
