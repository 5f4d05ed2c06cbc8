//! Viewer state machine and key dispatcher.
//!
//! The viewer only reads: notes are fetched once on entry and never written
//! back. Rendering is a pure function of the state, see [`App::lines`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use jot_core::{GroupName, NoteStore};

// ─── Phase ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  /// Moving the cursor; nothing chosen yet.
  Browsing,
  /// A row has been chosen. Navigation still works and may re-select.
  Selected,
  /// Terminal state; the event loop stops.
  Exited,
}

// ─── Key ──────────────────────────────────────────────────────────────────────

/// The inputs the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
  Up,
  Down,
  Select,
  Quit,
  Other,
}

impl From<KeyEvent> for Key {
  fn from(key: KeyEvent) -> Self {
    if key.kind == KeyEventKind::Release {
      return Key::Other;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      return match key.code {
        KeyCode::Char('c') => Key::Quit,
        _ => Key::Other,
      };
    }
    match key.code {
      KeyCode::Up | KeyCode::Char('k') => Key::Up,
      KeyCode::Down | KeyCode::Char('j') => Key::Down,
      KeyCode::Enter | KeyCode::Char(' ') => Key::Select,
      KeyCode::Char('q') => Key::Quit,
      _ => Key::Other,
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Viewer state over the notes of one group.
#[derive(Debug, Clone)]
pub struct App {
  pub notes:    Vec<String>,
  pub cursor:   usize,
  pub selected: Option<usize>,
  pub phase:    Phase,
}

impl App {
  pub const HEADER: &'static str = "Select a note";
  pub const FOOTER: &'static str = "Press q to quit.";

  pub fn new(notes: Vec<String>) -> Self {
    Self {
      notes,
      cursor: 0,
      selected: None,
      phase: Phase::Browsing,
    }
  }

  /// Fetch the notes of `group` (empty means the default group).
  pub async fn load<S>(store: &S, group: &str) -> anyhow::Result<Self>
  where
    S: NoteStore,
  {
    let name = GroupName::resolve(group)?;
    let notes = store.read_group(name.as_str()).await?;
    Ok(Self::new(notes))
  }

  pub fn is_exited(&self) -> bool { self.phase == Phase::Exited }

  /// Apply one input. Keys after exit are ignored.
  pub fn handle(&mut self, key: Key) {
    if self.is_exited() {
      return;
    }
    match key {
      Key::Up => self.cursor = self.cursor.saturating_sub(1),
      Key::Down => {
        if self.cursor + 1 < self.notes.len() {
          self.cursor += 1;
        }
      }
      Key::Select => {
        if self.cursor < self.notes.len() {
          self.selected = Some(self.cursor);
          self.phase = Phase::Selected;
        }
      }
      Key::Quit => self.phase = Phase::Exited,
      Key::Other => {}
    }
  }

  /// Process a terminal key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    self.handle(Key::from(key));
    !self.is_exited()
  }

  /// The body printed on exit: the selected note, else the note under the
  /// cursor, else nothing when the group is empty.
  pub fn emitted(&self) -> Option<&str> {
    self
      .selected
      .or(Some(self.cursor))
      .and_then(|i| self.notes.get(i))
      .map(String::as_str)
  }

  /// One rendered row: `C [M] BODY`.
  pub fn row(&self, i: usize) -> Option<String> {
    let note = self.notes.get(i)?;
    let cursor = if i == self.cursor { '>' } else { ' ' };
    let mark = if self.selected == Some(i) { 'X' } else { ' ' };
    Some(format!("{cursor} [{mark}] {note}"))
  }

  /// The full screen as plain text lines.
  pub fn lines(&self) -> Vec<String> {
    let mut lines = Vec::with_capacity(self.notes.len() + 4);
    lines.push(Self::HEADER.to_owned());
    lines.push(String::new());
    lines.extend((0..self.notes.len()).filter_map(|i| self.row(i)));
    lines.push(String::new());
    lines.push(Self::FOOTER.to_owned());
    lines
  }
}
