use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliDisplayMode {
  Auto,
  Direct,
  Ascii,
}

/// How thumbnail previews are painted into terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
  /// Grayscale character ramp. Works everywhere.
  Ascii,
  /// True-color half-block cells.
  Direct,
}

impl DisplayMode {
  pub fn label(self) -> &'static str {
    match self {
      DisplayMode::Ascii => "ASCII",
      DisplayMode::Direct => "Half-block",
    }
  }

  pub fn toggled(self) -> DisplayMode {
    match self {
      DisplayMode::Ascii => DisplayMode::Direct,
      DisplayMode::Direct => DisplayMode::Ascii,
    }
  }

  /// The value persisted in the config file.
  pub fn config_key(self) -> &'static str {
    match self {
      DisplayMode::Ascii => "ascii",
      DisplayMode::Direct => "direct",
    }
  }
}

/// Detect the best preview mode the terminal supports: true-color
/// half-block when `COLORTERM` advertises it, ASCII otherwise.
pub fn detect_display_mode() -> DisplayMode {
  let colorterm = std::env::var("COLORTERM").unwrap_or_default().to_lowercase();
  if colorterm == "truecolor" || colorterm == "24bit" {
    return DisplayMode::Direct;
  }
  DisplayMode::Ascii
}

/// An explicit CLI choice wins; `auto` consults the persisted preference
/// before falling back to terminal detection.
pub fn resolve_display_mode(cli: CliDisplayMode, saved: Option<&str>) -> DisplayMode {
  match cli {
    CliDisplayMode::Direct => DisplayMode::Direct,
    CliDisplayMode::Ascii => DisplayMode::Ascii,
    CliDisplayMode::Auto => match saved {
      Some("direct") => DisplayMode::Direct,
      Some("ascii") => DisplayMode::Ascii,
      _ => detect_display_mode(),
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn explicit_cli_choice_overrides_saved_preference() {
    assert_eq!(resolve_display_mode(CliDisplayMode::Ascii, Some("direct")), DisplayMode::Ascii);
    assert_eq!(resolve_display_mode(CliDisplayMode::Direct, Some("ascii")), DisplayMode::Direct);
  }

  #[test]
  fn auto_uses_saved_preference() {
    assert_eq!(resolve_display_mode(CliDisplayMode::Auto, Some("ascii")), DisplayMode::Ascii);
    assert_eq!(resolve_display_mode(CliDisplayMode::Auto, Some("direct")), DisplayMode::Direct);
  }

  #[test]
  fn toggled_flips_between_the_two_modes() {
    assert_eq!(DisplayMode::Ascii.toggled(), DisplayMode::Direct);
    assert_eq!(DisplayMode::Direct.toggled(), DisplayMode::Ascii);
  }
}
