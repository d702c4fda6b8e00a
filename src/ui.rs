use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Clear, Padding, Paragraph},
};

use crate::app::{App, AppMode, GRID_COLUMNS};
use crate::catalog::VideoEntry;
use crate::preview::PreviewWidget;
use crate::resolve;

/// Total cell height of one grid tile, borders included.
const TILE_HEIGHT: u16 = 8;

/// Lines reserved for a section heading above its grid.
const SECTION_HEADER_HEIGHT: u16 = 2;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

/// A rect centered in `area` taking the given percentages of it.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
  let [_, mid, _] = Layout::vertical([
    Constraint::Percentage((100 - percent_y) / 2),
    Constraint::Percentage(percent_y),
    Constraint::Fill(1),
  ])
  .areas(area);
  let [_, rect, _] = Layout::horizontal([
    Constraint::Percentage((100 - percent_x) / 2),
    Constraint::Percentage(percent_x),
    Constraint::Fill(1),
  ])
  .areas(mid);
  rect
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  frame.render_widget(Block::default().style(Style::default().bg(theme.bg).fg(theme.fg)), frame.area());

  let [header_area, input_area, main_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_search_input(frame, app, input_area);
  render_grids(frame, app, main_area);
  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);
  render_overlay(frame, app);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let left = Line::from(vec![
    Span::styled(format!(" {} ", app.catalog.owner), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!("— {}", app.catalog.role), Style::default().fg(theme.muted)),
  ]);
  frame.render_widget(left, area);

  let email = format!("{} ", app.catalog.email);
  let right = Line::from(Span::styled(&email, Style::default().fg(theme.muted).add_modifier(Modifier::UNDERLINED)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(email.len() as u16), width: email.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_search_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let focused = app.mode == AppMode::Search && app.active.is_none();
  let border_color = if focused { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search ")
    .title_style(Style::default().fg(border_color))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.query, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .query
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let (text, style) = if visible.is_empty() && !focused {
    ("Filter by title…".to_string(), Style::default().fg(theme.muted))
  } else {
    (visible, Style::default().fg(theme.fg))
  };
  let paragraph = Paragraph::new(text).style(style).block(input_block);
  frame.render_widget(paragraph, area);

  if focused {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

/// Virtual y offset of the tile with the given section-relative row.
fn tile_virtual_y(section_start: u16, row: usize) -> u16 {
  section_start + SECTION_HEADER_HEIGHT + row as u16 * TILE_HEIGHT
}

fn render_grids(frame: &mut Frame, app: &mut App, area: Rect) {
  let featured_count = app.filtered_featured().len();
  let director_count = app.catalog.director.len();
  let featured_rows = featured_count.div_ceil(GRID_COLUMNS);
  let director_start = tile_virtual_y(0, featured_rows);

  // Keep the selected tile inside the viewport, pulling the section
  // header in when the selection sits on its first row.
  let (virtual_y, first_row) = if app.selected < featured_count {
    (tile_virtual_y(0, app.selected / GRID_COLUMNS), app.selected < GRID_COLUMNS)
  } else {
    let d = app.selected - featured_count;
    (tile_virtual_y(director_start, d / GRID_COLUMNS), d < GRID_COLUMNS)
  };
  let top = if first_row { virtual_y.saturating_sub(SECTION_HEADER_HEIGHT) } else { virtual_y };
  if top < app.grid_scroll {
    app.grid_scroll = top;
  } else if virtual_y + TILE_HEIGHT > app.grid_scroll + area.height {
    app.grid_scroll = (virtual_y + TILE_HEIGHT).saturating_sub(area.height);
  }
  let scroll = app.grid_scroll;

  // Maps a virtual row span to a screen rect, or None when it is scrolled
  // out of view (partially visible tiles are not drawn).
  let to_screen = |virtual_y: u16, height: u16| -> Option<Rect> {
    if virtual_y < scroll || virtual_y + height > scroll + area.height {
      return None;
    }
    Some(Rect { x: area.x, y: area.y + virtual_y - scroll, width: area.width, height })
  };

  render_section(frame, app, &to_screen, 0, "Featured Work", true);
  render_section(frame, app, &to_screen, director_start, "I also direct!", false);
}

fn render_section(
  frame: &mut Frame,
  app: &App,
  to_screen: &dyn Fn(u16, u16) -> Option<Rect>,
  section_start: u16,
  heading: &str,
  featured: bool,
) {
  let theme = app.theme();
  let entries: Vec<&VideoEntry> =
    if featured { app.filtered_featured() } else { app.catalog.director.iter().collect() };
  let index_offset = if featured { 0 } else { app.filtered_featured().len() };

  if let Some(rect) = to_screen(section_start, 1) {
    let line = Line::from(Span::styled(
      format!(" {} ", heading),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(line, rect);
  }

  for (i, entry) in entries.iter().enumerate() {
    let row = i / GRID_COLUMNS;
    let col = i % GRID_COLUMNS;
    let Some(row_rect) = to_screen(tile_virtual_y(section_start, row), TILE_HEIGHT) else { continue };
    let tile_w = row_rect.width / GRID_COLUMNS as u16;
    let tile_rect = Rect { x: row_rect.x + col as u16 * tile_w, width: tile_w, ..row_rect };
    render_tile(frame, app, entry, tile_rect, app.selected == index_offset + i);
  }
}

fn render_tile(frame: &mut Frame, app: &App, entry: &VideoEntry, area: Rect, is_selected: bool) {
  let theme = app.theme();
  let border_style = if is_selected {
    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(theme.border)
  };
  let title_style = if is_selected {
    Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
  } else {
    border_style
  };
  let title = truncate_str(&entry.title, area.width.saturating_sub(4) as usize);
  let block = Block::bordered()
    .title(format!(" {} ", title))
    .title_style(title_style)
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(border_style);
  let inner = block.inner(area);
  frame.render_widget(block, area);

  if let Some(image) = app.thumb_images.get(&entry.title) {
    frame.render_widget(PreviewWidget { image, display_mode: app.display_mode }, inner);
  } else {
    // Placeholder tile — resolution failed, is still in flight, or the
    // provider has no metadata endpoint.
    let symbol = if is_selected { "▶ Play" } else { "▶" };
    let pad = inner.height.saturating_sub(1) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.push(Line::from(Span::styled(symbol, Style::default().fg(theme.muted))));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
  }
}

fn render_overlay(frame: &mut Frame, app: &App) {
  let Some(ref entry) = app.active else { return };
  let theme = app.theme();

  let area = centered_rect(frame.area(), 80, 80);
  frame.render_widget(Clear, area);
  let block = Block::bordered()
    .title(" Now Showing ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(ratatui::widgets::BorderType::Rounded)
    .border_style(Style::default().fg(theme.accent))
    .style(Style::default().bg(theme.bg));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let [preview_area, detail_area] = Layout::vertical([Constraint::Min(4), Constraint::Length(5)]).areas(inner);

  if let Some(image) = app.thumb_images.get(&entry.title) {
    frame.render_widget(PreviewWidget { image, display_mode: app.display_mode }, preview_area);
  } else {
    let pad = preview_area.height.saturating_sub(1) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.push(Line::from(Span::styled("▶", Style::default().fg(theme.muted))));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), preview_area);
  }

  // Derived fresh on every render; it depends only on immutable catalog
  // data, so there is nothing to cache.
  let embed = resolve::derive_embed_url(entry);
  let embed_display = if embed.is_empty() { "(no source URL)".to_string() } else { embed };
  let inner_w = detail_area.width.saturating_sub(2) as usize;

  let status_line = if let Some(status) = app.player.last_status() {
    Line::from(Span::styled(truncate_str(status, inner_w), Style::default().fg(theme.status)))
  } else if app.player.is_playing() {
    Line::from(Span::styled("♪ playing…", Style::default().fg(theme.status)))
  } else {
    Line::from(Span::styled("playback unavailable", Style::default().fg(theme.muted)))
  };

  let lines = vec![
    Line::from(Span::styled(
      truncate_str(&entry.title, inner_w),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(
      truncate_str(&embed_display, inner_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
    status_line,
  ];
  frame.render_widget(Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(1))), detail_area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if app.player.is_playing() {
    match app.player.last_status() {
      Some(status) => (format!(" ♪ {}", status), Style::default().fg(theme.status)),
      None => (" ♪ Loading…".to_string(), Style::default().fg(theme.status)),
    }
  } else if app.thumbs_pending() {
    (format!(" ⏳ Resolving previews… ({} done)", app.thumbs.len()), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = if app.active.is_some() {
    vec![("q", "Close"), ("Bksp", "Dismiss"), ("Esc", "Close")]
  } else {
    match app.mode {
      AppMode::Search => vec![("Type", "Filter"), ("Enter/↓", "Grid"), ("^t", "Theme"), ("^d", "Preview"), ("^c", "Quit")],
      AppMode::Grid => {
        vec![("Enter", "Play"), ("hjkl", "Navigate"), ("/", "Search"), ("^t", "Theme"), ("^d", "Preview"), ("q", "Quit")]
      }
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let copyright = format!(
    "© {} {} · {} · {} ",
    chrono::Local::now().format("%Y"),
    app.catalog.owner,
    theme.name,
    app.display_mode.label()
  );
  let right = Line::from(Span::styled(&copyright, Style::default().fg(theme.muted)));
  let width = copyright.chars().count() as u16;
  let right_area = Rect { x: area.x + area.width.saturating_sub(width), width: width.min(area.width), ..area };
  frame.render_widget(right, right_area);
}
