//! The portfolio catalog, embedded from `catalog.ron` at compile time.
//!
//! The RON file is baked in via `include_str!` so the binary is
//! self-contained — no runtime file I/O. Parsed once in `main` and passed
//! by reference into everything that reads it; nothing mutates it after
//! that.

use anyhow::{Context, Result};
use serde::Deserialize;

/// A single video work: a display title and a raw source URL.
///
/// The title is the only identity key — it labels the tile and keys the
/// resolved thumbnail. The URL is provider-specific and unvalidated here;
/// the resolver decides what to make of it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VideoEntry {
  pub title: String,
  pub url: Option<String>,
}

/// The full catalog: owner info for the page chrome plus the two fixed
/// entry lists. `featured` is searchable; `director` never is.
#[derive(Debug, Deserialize)]
pub struct Catalog {
  pub owner: String,
  pub role: String,
  pub email: String,
  pub featured: Vec<VideoEntry>,
  pub director: Vec<VideoEntry>,
}

impl Catalog {
  /// Parse the embedded catalog. A malformed file is a packaging error,
  /// not a runtime condition, so this surfaces as a startup failure.
  pub fn load() -> Result<Self> {
    ron::from_str(include_str!("../catalog.ron")).context("embedded catalog.ron is malformed")
  }

  /// All entries from both lists, featured first. Used to launch the
  /// thumbnail pass over the whole catalog.
  pub fn all_entries(&self) -> impl Iterator<Item = &VideoEntry> {
    self.featured.iter().chain(self.director.iter())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_catalog_parses() {
    let catalog = Catalog::load().unwrap();
    assert_eq!(catalog.featured.len(), 15);
    assert_eq!(catalog.director.len(), 3);
    assert_eq!(catalog.owner, "Andrew Daulton");
  }

  #[test]
  fn titles_are_unique_within_each_list() {
    let catalog = Catalog::load().unwrap();
    for list in [&catalog.featured, &catalog.director] {
      let mut seen = std::collections::HashSet::new();
      for entry in list {
        assert!(seen.insert(&entry.title), "duplicate title: {}", entry.title);
      }
    }
  }

  #[test]
  fn every_entry_has_a_url() {
    let catalog = Catalog::load().unwrap();
    assert!(catalog.all_entries().all(|e| e.url.is_some()));
  }
}
