mod app;
mod catalog;
mod config;
mod display;
mod input;
mod player;
mod preview;
mod resolve;
mod theme;
mod thumbs;
mod ui;

use anyhow::Result;
use clap::Parser;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use app::App;
use catalog::Catalog;
use display::CliDisplayMode;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Preview rendering: 'auto', 'direct', or 'ascii' (default: auto-detect)
  #[arg(short, long, default_value = "auto")]
  display_mode: CliDisplayMode,
}

// --- Logging ---

/// Log to a file under the platform data dir — stderr belongs to the
/// terminal UI. Returns the appender guard, which must stay alive for the
/// life of the process. Logging is best-effort; any failure here leaves
/// tracing uninitialized.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = directories::ProjectDirs::from("", "", "showreel")?;
  let log_dir = proj_dirs.data_dir().join("logs");
  std::fs::create_dir_all(&log_dir).ok()?;
  let file = std::fs::OpenOptions::new().create(true).append(true).open(log_dir.join("showreel.log")).ok()?;
  let (non_blocking, guard) = tracing_appender::non_blocking(file);
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_ansi(false)
    .with_writer(non_blocking)
    .init();
  tracing::info!("logging initialized");
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging();

  // The catalog is parsed once here and handed to the app; nothing
  // mutates it afterwards.
  let catalog = Catalog::load()?;

  // Terminal raw mode is scoped to the app lifetime: acquired here,
  // released on every exit path including panic.
  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, catalog, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, catalog: Catalog, args: Args) -> Result<()> {
  let config = config::Config::load();
  let display_mode = display::resolve_display_mode(args.display_mode, config.display_mode.as_deref());
  let mut app = App::new(catalog, config, display_mode);

  // Fire-and-forget relative to first paint: the grid renders immediately
  // and fills in previews as fetches settle.
  app.start_thumbnail_pass();

  loop {
    app.check_pending();
    app.player.check_status();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key).await?;
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  // In-flight thumbnail fetches are not cancelled; whatever they resolve
  // after this point is discarded with the receiver.
  app.player.stop().await?;
  Ok(())
}
