//! Link resolution: turning raw catalog URLs into embeddable player URLs.
//!
//! Only two providers are recognized. Everything else passes through
//! unchanged and the consumer treats it as a best-effort fallback.

use crate::catalog::VideoEntry;

/// Extract a YouTube video ID from a watch link or a `youtu.be` short link.
///
/// The ID is the maximal run of `[A-Za-z0-9_-]` following the marker and
/// must be at least 6 characters. Host matching is case-insensitive; the
/// ID is sliced from the original string so its case is preserved.
pub fn extract_youtube_id(url: &str) -> Option<&str> {
  // ASCII lowering keeps byte offsets aligned with the original string.
  let lower = url.to_ascii_lowercase();
  let start = ["youtube.com/watch?v=", "youtu.be/"]
    .iter()
    .find_map(|marker| lower.find(marker).map(|i| i + marker.len()))?;
  let rest = &url[start..];
  let end = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-')).unwrap_or(rest.len());
  let id = &rest[..end];
  if id.len() >= 6 { Some(id) } else { None }
}

/// Extract a Vimeo video ID: at least 6 consecutive ASCII digits starting
/// either directly after `vimeo.com/` or directly after a later `/`.
///
/// The optional leading path segment covers "unlisted" style links such as
/// `vimeo.com/<user>/<id>`. A trailing private-link hash segment
/// (`vimeo.com/<id>/<hash>`) is deliberately not captured — only the
/// numeric ID survives re-embedding.
pub fn extract_vimeo_id(url: &str) -> Option<&str> {
  let lower = url.to_ascii_lowercase();
  let base = lower.find("vimeo.com/")? + "vimeo.com/".len();
  let rest = &url[base..];

  // Candidate starts: position 0, then the position after every '/'.
  let starts = std::iter::once(0).chain(rest.match_indices('/').map(|(i, _)| i + 1));
  for at in starts {
    let digits = rest[at..].len() - rest[at..].trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits >= 6 {
      return Some(&rest[at..at + digits]);
    }
  }
  None
}

/// Derive the embeddable player URL for an entry.
///
/// Ordered, first match wins: YouTube, then Vimeo, then the raw URL
/// unchanged (empty string when the entry has none). Pure and cheap, so
/// callers recompute it on every render of the active selection.
pub fn derive_embed_url(entry: &VideoEntry) -> String {
  let url = entry.url.as_deref().unwrap_or("");
  if let Some(id) = extract_youtube_id(url) {
    return format!("https://www.youtube.com/embed/{}?autoplay=1&rel=0", id);
  }
  if let Some(id) = extract_vimeo_id(url) {
    return format!("https://player.vimeo.com/video/{}?autoplay=1", id);
  }
  url.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(url: &str) -> VideoEntry {
    VideoEntry { title: "t".to_string(), url: Some(url.to_string()) }
  }

  // --- extract_youtube_id ---

  #[test]
  fn youtube_watch_link() {
    assert_eq!(extract_youtube_id("https://www.youtube.com/watch?v=IHj-MS9Pz_s"), Some("IHj-MS9Pz_s"));
  }

  #[test]
  fn youtube_watch_link_with_trailing_params() {
    assert_eq!(extract_youtube_id("https://www.youtube.com/watch?v=I8YpJ8_ThgY&t=1s"), Some("I8YpJ8_ThgY"));
  }

  #[test]
  fn youtube_short_link() {
    assert_eq!(extract_youtube_id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ"));
  }

  #[test]
  fn youtube_id_too_short_rejected() {
    assert_eq!(extract_youtube_id("https://youtu.be/abc12"), None);
  }

  #[test]
  fn youtube_host_case_insensitive_id_case_preserved() {
    assert_eq!(extract_youtube_id("https://YouTube.COM/watch?v=AbCdEf_123"), Some("AbCdEf_123"));
  }

  // --- extract_vimeo_id ---

  #[test]
  fn vimeo_plain_id() {
    assert_eq!(extract_vimeo_id("https://vimeo.com/670009552"), Some("670009552"));
  }

  #[test]
  fn vimeo_user_path_prefix() {
    assert_eq!(extract_vimeo_id("https://vimeo.com/andrewdaulton/360327049"), Some("360327049"));
  }

  #[test]
  fn vimeo_private_hash_suffix_ignored() {
    assert_eq!(extract_vimeo_id("https://vimeo.com/954484682/7df978b82c"), Some("954484682"));
  }

  #[test]
  fn vimeo_id_must_start_at_segment_boundary() {
    // Digits buried inside a segment don't count.
    assert_eq!(extract_vimeo_id("https://vimeo.com/clip123456789"), None);
  }

  #[test]
  fn vimeo_short_digit_run_skipped_for_later_segment() {
    assert_eq!(extract_vimeo_id("https://vimeo.com/12345/6789012"), Some("6789012"));
  }

  #[test]
  fn vimeo_fewer_than_six_digits_rejected() {
    assert_eq!(extract_vimeo_id("https://vimeo.com/12345"), None);
  }

  // --- derive_embed_url ---

  #[test]
  fn embed_url_for_youtube() {
    assert_eq!(
      derive_embed_url(&entry("https://www.youtube.com/watch?v=I8YpJ8_ThgY&t=1s")),
      "https://www.youtube.com/embed/I8YpJ8_ThgY?autoplay=1&rel=0"
    );
  }

  #[test]
  fn embed_url_for_vimeo() {
    assert_eq!(
      derive_embed_url(&entry("https://vimeo.com/670009552")),
      "https://player.vimeo.com/video/670009552?autoplay=1"
    );
  }

  #[test]
  fn embed_url_drops_vimeo_private_hash() {
    let url = derive_embed_url(&entry("https://vimeo.com/954491226/d6211e2f36"));
    assert_eq!(url, "https://player.vimeo.com/video/954491226?autoplay=1");
    assert!(!url.contains("d6211e2f36"));
  }

  #[test]
  fn embed_url_youtube_wins_over_vimeo() {
    // First match wins when a URL somehow satisfies both patterns.
    let url = derive_embed_url(&entry("https://youtu.be/abcdef123?next=vimeo.com/123456"));
    assert!(url.starts_with("https://www.youtube.com/embed/"));
  }

  #[test]
  fn unmatched_url_passes_through() {
    assert_eq!(derive_embed_url(&entry("https://example.com/clip.mp4")), "https://example.com/clip.mp4");
  }

  #[test]
  fn missing_url_yields_empty_string() {
    let e = VideoEntry { title: "t".to_string(), url: None };
    assert_eq!(derive_embed_url(&e), "");
  }
}
