//! External playback for the overlay via mpv.
//!
//! Opening a tile auto-starts playback of the selected work; closing the
//! overlay stops it. mpv handles the provider URLs directly, so no stream
//! resolution happens here. A missing mpv degrades to an overlay without
//! sound or picture — the portfolio stays browsable.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use std::process::Stdio;
use tokio::{
  io::{AsyncBufReadExt, BufReader as TokioBufReader},
  process::{Child as TokioChild, Command},
  sync::mpsc,
  task::JoinHandle,
};

pub struct Player {
  /// Shared HTTP client, also used by the thumbnail pass.
  pub http_client: Client,
  current_process: Option<TokioChild>,
  status_monitor: Option<JoinHandle<()>>,
  status_rx: Option<mpsc::Receiver<String>>,
  last_status: Option<String>,
}

impl Player {
  pub fn new() -> Self {
    Self {
      http_client: Client::new(),
      current_process: None,
      status_monitor: None,
      status_rx: None,
      last_status: None,
    }
  }

  pub fn is_playing(&self) -> bool {
    self.current_process.is_some()
  }

  /// Drain any buffered mpv status lines, keeping the newest.
  pub fn check_status(&mut self) {
    if let Some(rx) = &mut self.status_rx {
      while let Ok(status) = rx.try_recv() {
        self.last_status = Some(status);
      }
    }
  }

  pub fn last_status(&self) -> Option<&str> {
    self.last_status.as_deref()
  }

  /// Spawn mpv on the given source URL, replacing any current playback.
  pub async fn play(&mut self, url: &str) -> Result<()> {
    self.stop().await.context("failed to stop previous playback")?;

    let mut cmd = Command::new("mpv");
    cmd.args(["--no-video", "--term-status-msg=${time-pos/full} / ${duration/full} | ${media-title}", url]);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    // Stderr goes to null — if piped but never drained, the pipe buffer
    // fills and mpv blocks.
    cmd.stderr(Stdio::null());

    let mut child = cmd.spawn().map_err(|e| {
      if e.kind() == std::io::ErrorKind::NotFound {
        anyhow!("mpv not found. Install it with: brew install mpv (macOS) or apt install mpv (Linux)")
      } else {
        anyhow!(e).context("failed to spawn mpv process")
      }
    })?;

    let stdout = child.stdout.take().context("failed to get mpv stdout")?;
    let (tx, rx) = mpsc::channel::<String>(10);
    self.status_rx = Some(rx);

    let monitor = tokio::spawn(async move {
      let reader = TokioBufReader::new(stdout);
      let mut lines = reader.lines();
      while let Ok(Some(line)) = lines.next_line().await {
        if tx.send(line).await.is_err() {
          break;
        }
      }
    });

    self.current_process = Some(child);
    self.status_monitor = Some(monitor);
    Ok(())
  }

  pub async fn stop(&mut self) -> Result<()> {
    if let Some(handle) = self.status_monitor.take() {
      handle.abort();
      let _ = handle.await;
    }
    self.status_rx = None;
    self.last_status = None;

    if let Some(mut child) = self.current_process.take() {
      child.kill().await.context("failed to kill mpv process")?;
      let _ = child.wait().await;
    }
    Ok(())
  }
}
