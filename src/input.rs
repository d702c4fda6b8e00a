use anyhow::Result;
use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, AppMode, GRID_COLUMNS};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub async fn handle_key_event(app: &mut App, key: event::KeyEvent) -> Result<()> {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return Ok(());
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('d') {
    app.toggle_display_mode();
    return Ok(());
  }

  // Escape is live for the whole session: it closes the overlay when one
  // is open and does nothing otherwise.
  if key.code == KeyCode::Esc {
    app.dismiss_overlay().await;
    return Ok(());
  }

  if app.active.is_some() {
    handle_overlay_key(app, key).await;
    return Ok(());
  }

  match app.mode {
    AppMode::Search => handle_search_key(app, key),
    AppMode::Grid => handle_grid_key(app, key).await,
  }
  Ok(())
}

/// Keys while the overlay is open: `q` is the close control, Backspace
/// stands in for a click on the backdrop. Everything else is swallowed.
async fn handle_overlay_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Char('q') | KeyCode::Backspace => {
      app.dismiss_overlay().await;
    }
    _ => {}
  }
}

fn handle_search_key(app: &mut App, key: event::KeyEvent) {
  app.last_error = None;
  match key.code {
    KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
      if !app.visible_entries().is_empty() {
        app.mode = AppMode::Grid;
        app.clamp_selection();
      }
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.query, app.cursor_position);
      app.query.insert(byte_idx, c);
      app.cursor_position += 1;
      app.clamp_selection();
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.query, app.cursor_position);
        app.query.remove(byte_idx);
        app.clamp_selection();
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.query.chars().count() {
        let byte_idx = char_to_byte_index(&app.query, app.cursor_position);
        app.query.remove(byte_idx);
        app.clamp_selection();
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.query.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.query.chars().count();
    }
    _ => {}
  }
}

async fn handle_grid_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.open_selected().await;
    }
    KeyCode::Char('/') | KeyCode::Tab => {
      app.mode = AppMode::Search;
    }
    KeyCode::Left | KeyCode::Char('h') => {
      app.move_selection(-1);
    }
    KeyCode::Right | KeyCode::Char('l') => {
      app.move_selection(1);
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.move_selection(GRID_COLUMNS as isize);
    }
    KeyCode::Up | KeyCode::Char('k') => {
      if app.selected < GRID_COLUMNS {
        app.mode = AppMode::Search;
      } else {
        app.move_selection(-(GRID_COLUMNS as isize));
      }
    }
    KeyCode::Char('q') => {
      app.should_quit = true;
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn char_to_byte_index_handles_multibyte() {
    let s = "WcDonald’s";
    assert_eq!(char_to_byte_index(s, 0), 0);
    assert_eq!(char_to_byte_index(s, 8), 8);
    // The right single quote is three bytes.
    assert_eq!(char_to_byte_index(s, 9), 11);
    assert_eq!(char_to_byte_index(s, 99), s.len());
  }
}
