//! Note list pane.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  widgets::{List, ListItem, ListState},
};

/// Render the pre-formatted note rows into `area`, scrolled to keep the
/// cursor row visible.
pub fn draw(f: &mut Frame, area: Rect, rows: &[String], cursor: usize) {
  let items: Vec<ListItem> = rows.iter().map(|row| ListItem::new(row.as_str())).collect();

  let mut state = ListState::default();
  state.select(if rows.is_empty() { None } else { Some(cursor) });

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .fg(Color::Cyan)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    area,
    &mut state,
  );
}
