//! TUI rendering for the viewer.
//!
//! Text comes from [`App::lines`]; this module only lays it out and styles
//! it.

pub mod note_list;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::Paragraph,
};

use crate::app::App;

/// Header and blank line above the notes; blank line and footer below.
const HEADER_LINES: usize = 2;
const FOOTER_LINES: usize = 2;

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let lines = app.lines();
  let (head, rest) = lines.split_at(HEADER_LINES);
  let (rows, foot) = rest.split_at(rest.len() - FOOTER_LINES);

  let areas = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(HEADER_LINES as u16),
      Constraint::Min(0),
      Constraint::Length(FOOTER_LINES as u16),
    ])
    .split(f.area());

  let bold = Style::default().add_modifier(Modifier::BOLD);
  let dim = Style::default().fg(Color::DarkGray);

  let header: Vec<Line> = head
    .iter()
    .enumerate()
    .map(|(i, text)| Line::styled(text.as_str(), if i == 0 { bold } else { Style::default() }))
    .collect();
  f.render_widget(Paragraph::new(header), areas[0]);

  note_list::draw(f, areas[1], rows, app.cursor);

  let footer: Vec<Line> = foot.iter().map(|text| Line::styled(text.as_str(), dim)).collect();
  f.render_widget(Paragraph::new(footer), areas[2]);
}

#[cfg(test)]
mod tests {
  use ratatui::{Terminal, backend::TestBackend};

  use super::*;
  use crate::app::Key;

  /// Draw `app` onto an off-screen terminal and return its rows as text.
  fn screen(app: &App, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
      .content
      .chunks(width as usize)
      .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>().trim_end().to_owned())
      .collect()
  }

  #[test]
  fn draws_the_rendered_lines() {
    let mut app = App::new(vec!["one".into(), "two".into()]);
    app.handle(Key::Down);
    app.handle(Key::Select);

    let rows = screen(&app, 24, 8);
    assert_eq!(rows[0], "Select a note");
    assert_eq!(rows[1], "");
    assert_eq!(rows[2], "  [ ] one");
    assert_eq!(rows[3], "> [X] two");
    assert_eq!(rows[6], "");
    assert_eq!(rows[7], "Press q to quit.");

    let lines = app.lines();
    assert_eq!(rows[..4], lines[..4]);
  }

  #[test]
  fn draws_empty_group_without_rows() {
    let app = App::new(Vec::new());
    let rows = screen(&app, 24, 6);
    assert_eq!(rows[0], "Select a note");
    assert!(rows[1..4].iter().all(String::is_empty));
    assert_eq!(rows[5], "Press q to quit.");
  }
}
