//! Best-effort thumbnail acquisition from Vimeo's public metadata endpoint.
//!
//! Each catalog entry gets one independent fetch task at startup. Failures
//! are absorbed silently — a tile without a thumbnail just renders its
//! placeholder. Successes flow back through a single mpsc channel that the
//! UI task drains, so concurrent completions merge without clobbering each
//! other.

use anyhow::{Context, Result, anyhow};
use image::DynamicImage;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::catalog::VideoEntry;
use crate::resolve::extract_vimeo_id;

/// One settled thumbnail resolution, keyed by the entry's title.
#[derive(Debug)]
pub struct ResolvedThumb {
  pub title: String,
  /// The resolved large-preview image URL.
  pub url: String,
  /// The decoded image, when the follow-up download succeeded.
  pub image: Option<DynamicImage>,
}

/// The slice of the metadata response we care about. The endpoint returns
/// an array of objects; only the first element's `thumbnail_large` is used.
#[derive(Debug, Deserialize)]
struct VideoMeta {
  thumbnail_large: String,
}

/// Pull the large-thumbnail URL out of a metadata response body.
/// Any shape other than a non-empty array whose first element carries a
/// `thumbnail_large` string counts as "no thumbnail available".
pub fn parse_thumbnail_response(body: &str) -> Option<String> {
  let meta: Vec<VideoMeta> = serde_json::from_str(body).ok()?;
  meta.into_iter().next().map(|m| m.thumbnail_large)
}

/// Resolve the preview image URL for a Vimeo video URL.
pub async fn fetch_thumbnail_url(client: &Client, video_url: &str) -> Result<String> {
  let id = extract_vimeo_id(video_url).ok_or_else(|| anyhow!("no Vimeo ID in URL: {}", video_url))?;
  let endpoint = format!("https://vimeo.com/api/v2/video/{}.json", id);
  let response = client.get(&endpoint).send().await.with_context(|| format!("metadata request failed: {}", endpoint))?;
  if !response.status().is_success() {
    return Err(anyhow!("metadata endpoint returned {} for video {}", response.status(), id));
  }
  let body = response.text().await.context("failed to read metadata response body")?;
  parse_thumbnail_response(&body).ok_or_else(|| anyhow!("unexpected metadata shape for video {}", id))
}

/// Download and decode a preview image for in-terminal rendering.
pub async fn fetch_thumbnail_image(client: &Client, image_url: &str) -> Result<DynamicImage> {
  let response = client.get(image_url).send().await.with_context(|| format!("image request failed: {}", image_url))?;
  if !response.status().is_success() {
    return Err(anyhow!("image fetch returned {} for {}", response.status(), image_url));
  }
  let bytes = response.bytes().await.with_context(|| format!("failed to read image bytes from {}", image_url))?;
  image::load_from_memory(&bytes).with_context(|| format!("failed to decode image from {}", image_url))
}

/// Launch the fire-and-forget thumbnail pass over the whole catalog.
///
/// One spawned task per Vimeo entry, no concurrency cap, no timeout, no
/// retries. Each task sends its result through `tx` as it settles; a
/// failed task simply sends nothing. Entries without a Vimeo URL are
/// skipped up front — no thumbnail is attempted for them.
pub fn spawn_thumbnail_pass(client: &Client, entries: Vec<VideoEntry>, tx: mpsc::Sender<ResolvedThumb>) {
  for entry in entries {
    let Some(url) = entry.url else { continue };
    if extract_vimeo_id(&url).is_none() {
      continue;
    }
    let title = entry.title;
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
      match fetch_thumbnail_url(&client, &url).await {
        Ok(thumb_url) => {
          // Decode failure still yields a usable URL-only result.
          let image = fetch_thumbnail_image(&client, &thumb_url).await.ok();
          let _ = tx.send(ResolvedThumb { title, url: thumb_url, image }).await;
        }
        Err(e) => {
          debug!(title = %title, err = %e, "thumbnail resolution failed");
        }
      }
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  // --- parse_thumbnail_response ---

  #[test]
  fn parse_valid_metadata() {
    let body = r#"[{"id":670009552,"thumbnail_large":"https://i.vimeocdn.com/video/x_640.jpg"}]"#;
    assert_eq!(parse_thumbnail_response(body).as_deref(), Some("https://i.vimeocdn.com/video/x_640.jpg"));
  }

  #[test]
  fn parse_empty_array_is_none() {
    assert_eq!(parse_thumbnail_response("[]"), None);
  }

  #[test]
  fn parse_missing_field_is_none() {
    assert_eq!(parse_thumbnail_response(r#"[{"id":1}]"#), None);
  }

  #[test]
  fn parse_non_array_is_none() {
    assert_eq!(parse_thumbnail_response(r#"{"thumbnail_large":"X"}"#), None);
    assert_eq!(parse_thumbnail_response("not json"), None);
  }

  // --- merge behavior ---

  #[tokio::test]
  async fn settled_fetch_lands_under_its_title() {
    // The metadata endpoint answered for video 670009552 with a single
    // element carrying thumbnail_large "X"; the map must settle to
    // {"Bud Light Next": "X"}.
    let body = r#"[{"thumbnail_large":"X"}]"#;
    let (tx, mut rx) = mpsc::channel(8);
    let url = parse_thumbnail_response(body).unwrap();
    tx.send(ResolvedThumb { title: "Bud Light Next".to_string(), url, image: None }).await.unwrap();
    drop(tx);

    let mut thumbs = HashMap::new();
    while let Some(resolved) = rx.recv().await {
      thumbs.insert(resolved.title, resolved.url);
    }
    assert_eq!(thumbs.get("Bud Light Next").map(String::as_str), Some("X"));
  }

  #[tokio::test]
  async fn one_failure_does_not_block_other_resolutions() {
    let (tx, mut rx) = mpsc::channel(8);
    for (title, body) in [
      ("Acura", r#"[{"thumbnail_large":"a.jpg"}]"#),
      ("Broken", "oops not json"),
      ("BuzzFeed", r#"[{"thumbnail_large":"b.jpg"}]"#),
    ] {
      let tx = tx.clone();
      let title = title.to_string();
      let body = body.to_string();
      tokio::spawn(async move {
        // Mirrors the pass: a parse failure sends nothing at all.
        if let Some(url) = parse_thumbnail_response(&body) {
          let _ = tx.send(ResolvedThumb { title, url, image: None }).await;
        }
      });
    }
    drop(tx);

    let mut thumbs = HashMap::new();
    while let Some(resolved) = rx.recv().await {
      thumbs.insert(resolved.title, resolved.url);
    }
    assert_eq!(thumbs.len(), 2);
    assert_eq!(thumbs.get("Acura").map(String::as_str), Some("a.jpg"));
    assert_eq!(thumbs.get("BuzzFeed").map(String::as_str), Some("b.jpg"));
    assert!(!thumbs.contains_key("Broken"));
  }
}
