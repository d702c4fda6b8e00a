use std::collections::HashMap;

use image::DynamicImage;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, VideoEntry};
use crate::config::Config;
use crate::display::DisplayMode;
use crate::player::Player;
use crate::theme::THEMES;
use crate::thumbs::{self, ResolvedThumb};

/// Fixed column count for the tile grid, matching the page layout the
/// portfolio was designed around.
pub const GRID_COLUMNS: usize = 3;

/// Which surface owns plain keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  /// Typing in the title filter box.
  Search,
  /// Navigating the tile grid.
  Grid,
}

/// Return the ordered subsequence of `entries` whose title contains the
/// trimmed, lowercased query as a substring. An empty or whitespace-only
/// query returns the full list. Pure function of its inputs — recomputed
/// on every render, never cached.
pub fn filter_entries<'a>(entries: &'a [VideoEntry], query: &str) -> Vec<&'a VideoEntry> {
  let needle = query.trim().to_lowercase();
  if needle.is_empty() {
    return entries.iter().collect();
  }
  entries.iter().filter(|e| e.title.to_lowercase().contains(&needle)).collect()
}

pub struct App {
  pub catalog: Catalog,
  pub mode: AppMode,
  pub display_mode: DisplayMode,
  pub theme_index: usize,
  config: Config,

  /// The search query; filtering interprets it, nothing mutates the
  /// catalog through it.
  pub query: String,
  pub cursor_position: usize,
  pub input_scroll: usize,

  /// Index into the currently visible tiles (filtered featured first,
  /// then the director list).
  pub selected: usize,
  /// Vertical scroll offset of the grid viewport, in cells. Adjusted at
  /// render time to keep the selection visible.
  pub grid_scroll: u16,

  /// The entry currently open in the overlay, if any.
  pub active: Option<VideoEntry>,

  /// ThumbnailMap: title -> resolved preview image URL. Only ever grows.
  pub thumbs: HashMap<String, String>,
  /// Decoded preview images for in-terminal rendering, same keys.
  pub thumb_images: HashMap<String, DynamicImage>,
  thumb_rx: Option<mpsc::Receiver<ResolvedThumb>>,

  pub player: Player,
  pub last_error: Option<String>,
  pub should_quit: bool,
}

impl App {
  pub fn new(catalog: Catalog, config: Config, display_mode: DisplayMode) -> Self {
    let theme_index =
      if let Some(ref name) = config.theme_name { THEMES.iter().position(|t| t.name == name).unwrap_or(0) } else { 0 };

    Self {
      catalog,
      mode: AppMode::Search,
      display_mode,
      theme_index,
      config,
      query: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      selected: 0,
      grid_scroll: 0,
      active: None,
      thumbs: HashMap::new(),
      thumb_images: HashMap::new(),
      thumb_rx: None,
      player: Player::new(),
      last_error: None,
      should_quit: false,
    }
  }

  pub fn theme(&self) -> &'static crate::theme::Theme {
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.config.theme_name = Some(self.theme().name.to_string());
    self.config.save();
  }

  pub fn toggle_display_mode(&mut self) {
    self.display_mode = self.display_mode.toggled();
    self.config.display_mode = Some(self.display_mode.config_key().to_string());
    self.config.save();
  }

  // --- Thumbnails ---

  /// Kick off the fire-and-forget thumbnail pass over both catalog lists.
  /// Called once at startup; the UI paints immediately with whatever has
  /// resolved so far (initially nothing).
  pub fn start_thumbnail_pass(&mut self) {
    let (tx, rx) = mpsc::channel(32);
    let entries: Vec<VideoEntry> = self.catalog.all_entries().cloned().collect();
    info!(entries = entries.len(), "starting thumbnail pass");
    thumbs::spawn_thumbnail_pass(&self.player.http_client, entries, tx);
    self.thumb_rx = Some(rx);
  }

  /// Whether any thumbnail fetches are still in flight.
  pub fn thumbs_pending(&self) -> bool {
    self.thumb_rx.is_some()
  }

  /// Drain settled async work. Thumbnail results merge into the map here,
  /// on the UI task, so interleaved completions can never corrupt each
  /// other.
  pub fn check_pending(&mut self) {
    if let Some(rx) = &mut self.thumb_rx {
      loop {
        match rx.try_recv() {
          Ok(resolved) => {
            debug!(title = %resolved.title, url = %resolved.url, "thumbnail resolved");
            if let Some(image) = resolved.image {
              self.thumb_images.insert(resolved.title.clone(), image);
            }
            self.thumbs.insert(resolved.title, resolved.url);
          }
          Err(mpsc::error::TryRecvError::Empty) => break,
          Err(mpsc::error::TryRecvError::Disconnected) => {
            // Every fetch has settled one way or the other.
            self.thumb_rx = None;
            break;
          }
        }
      }
    }
  }

  // --- Filtering & selection ---

  /// The Featured Work list narrowed by the current query. The director
  /// list is never filtered.
  pub fn filtered_featured(&self) -> Vec<&VideoEntry> {
    filter_entries(&self.catalog.featured, &self.query)
  }

  /// All tiles currently on screen, in navigation order.
  pub fn visible_entries(&self) -> Vec<&VideoEntry> {
    let mut entries = self.filtered_featured();
    entries.extend(self.catalog.director.iter());
    entries
  }

  /// Keep the tile cursor inside the visible range after the query
  /// changed.
  pub fn clamp_selection(&mut self) {
    let count = self.visible_entries().len();
    if count == 0 {
      self.selected = 0;
    } else if self.selected >= count {
      self.selected = count - 1;
    }
  }

  pub fn move_selection(&mut self, delta: isize) {
    let count = self.visible_entries().len() as isize;
    if count == 0 {
      return;
    }
    self.selected = (self.selected as isize + delta).rem_euclid(count) as usize;
  }

  // --- Overlay state machine ---

  /// `Closed -> Open(entry)`, or a direct replacement when something is
  /// already open. Pure state change; playback is the caller's side
  /// effect.
  pub fn open(&mut self, entry: VideoEntry) {
    info!(title = %entry.title, "overlay opened");
    self.active = Some(entry);
  }

  /// `Open -> Closed`. Returns whether there was anything to close, so
  /// the caller knows to stop playback. A close with nothing active is a
  /// no-op — the cancel signal is live for the whole session.
  pub fn close(&mut self) -> bool {
    if let Some(entry) = self.active.take() {
      info!(title = %entry.title, "overlay closed");
      true
    } else {
      false
    }
  }

  /// Open the highlighted tile and auto-start playback (the autoplay
  /// analogue). A playback failure keeps the overlay open — the embed URL
  /// is still derived and shown.
  pub async fn open_selected(&mut self) {
    let Some(entry) = self.visible_entries().get(self.selected).copied().cloned() else { return };
    let url = entry.url.clone();
    self.last_error = None;
    self.open(entry);
    if let Some(url) = url
      && let Err(e) = self.player.play(&url).await
    {
      warn!(err = %e, "playback failed");
      self.last_error = Some(format!("Playback error: {:#}", e));
    }
  }

  /// Shared exit path for close control, backdrop dismiss, and Escape.
  pub async fn dismiss_overlay(&mut self) {
    if self.close() {
      if let Err(e) = self.player.stop().await {
        warn!(err = %e, "failed to stop playback");
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::display::DisplayMode;

  fn test_app() -> App {
    App::new(Catalog::load().unwrap(), Config::default(), DisplayMode::Ascii)
  }

  fn titles(entries: &[&VideoEntry]) -> Vec<String> {
    entries.iter().map(|e| e.title.clone()).collect()
  }

  // --- filter_entries ---

  #[test]
  fn meal_query_matches_exactly_the_meal_titles_in_order() {
    let catalog = Catalog::load().unwrap();
    let filtered = filter_entries(&catalog.featured, "meal");
    assert_eq!(titles(&filtered), ["Grimace Meal", "BTS Meal", "Mariah Carey Meal", "J Balvin Meal"]);
  }

  #[test]
  fn filter_is_case_insensitive() {
    let catalog = Catalog::load().unwrap();
    assert_eq!(filter_entries(&catalog.featured, "MEAL").len(), 4);
    assert_eq!(filter_entries(&catalog.featured, "wcdonald").len(), 4);
  }

  #[test]
  fn empty_and_whitespace_queries_return_the_full_list() {
    let catalog = Catalog::load().unwrap();
    assert_eq!(titles(&filter_entries(&catalog.featured, "")), titles(&catalog.featured.iter().collect::<Vec<_>>()));
    assert_eq!(filter_entries(&catalog.featured, "   ").len(), catalog.featured.len());
  }

  #[test]
  fn query_is_trimmed_before_matching() {
    let catalog = Catalog::load().unwrap();
    assert_eq!(filter_entries(&catalog.featured, "  meal  ").len(), 4);
  }

  #[test]
  fn unmatched_query_returns_empty_not_error() {
    let catalog = Catalog::load().unwrap();
    assert!(filter_entries(&catalog.featured, "zzzzzz").is_empty());
  }

  #[test]
  fn director_list_is_never_filtered() {
    let mut app = test_app();
    app.query = "meal".to_string();
    let visible = app.visible_entries();
    // 4 meal matches + all 3 director entries.
    assert_eq!(visible.len(), 7);
    assert_eq!(visible[4].title, "Magic Leap");
  }

  // --- overlay state machine ---

  #[test]
  fn open_sets_active_to_exactly_that_entry() {
    let mut app = test_app();
    let entry = app.catalog.featured[3].clone();
    app.open(entry.clone());
    assert_eq!(app.active.as_ref(), Some(&entry));
  }

  #[test]
  fn close_resets_active() {
    let mut app = test_app();
    app.open(app.catalog.featured[0].clone());
    assert!(app.close());
    assert!(app.active.is_none());
  }

  #[test]
  fn close_with_nothing_active_is_a_no_op() {
    let mut app = test_app();
    assert!(!app.close());
    assert!(app.active.is_none());
  }

  #[test]
  fn opening_while_open_replaces_the_selection() {
    let mut app = test_app();
    let first = app.catalog.featured[0].clone();
    let second = app.catalog.featured[1].clone();
    app.open(first);
    app.open(second.clone());
    assert_eq!(app.active.as_ref(), Some(&second));
  }

  // --- selection ---

  #[test]
  fn selection_clamps_when_filter_narrows() {
    let mut app = test_app();
    app.selected = 17;
    app.query = "meal".to_string();
    app.clamp_selection();
    assert_eq!(app.selected, 6);
  }

  #[test]
  fn selection_wraps_around_the_grid() {
    let mut app = test_app();
    app.selected = 0;
    app.move_selection(-1);
    assert_eq!(app.selected, app.visible_entries().len() - 1);
    app.move_selection(1);
    assert_eq!(app.selected, 0);
  }

  // --- thumbnail merge ---

  #[test]
  fn thumbnail_map_only_grows() {
    let mut app = test_app();
    app.thumbs.insert("Acura".to_string(), "a.jpg".to_string());
    app.check_pending();
    assert_eq!(app.thumbs.get("Acura").map(String::as_str), Some("a.jpg"));
  }
}
