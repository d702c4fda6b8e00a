use ratatui::style::Color;

/// A named color palette. Cycled at runtime with Ctrl+T and persisted in
/// the config.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  // White-page look, matching the portfolio's original styling.
  Theme {
    name: "paper",
    bg: Color::Rgb(250, 250, 250),
    fg: Color::Rgb(24, 24, 27),
    muted: Color::Rgb(113, 113, 122),
    accent: Color::Rgb(24, 24, 27),
    border: Color::Rgb(212, 212, 216),
    status: Color::Rgb(82, 82, 91),
    error: Color::Rgb(190, 18, 60),
    highlight_fg: Color::Rgb(250, 250, 250),
    highlight_bg: Color::Rgb(24, 24, 27),
    key_fg: Color::Rgb(250, 250, 250),
    key_bg: Color::Rgb(63, 63, 70),
  },
  Theme {
    name: "ink",
    bg: Color::Rgb(17, 17, 20),
    fg: Color::Rgb(228, 228, 231),
    muted: Color::Rgb(130, 130, 140),
    accent: Color::Rgb(250, 204, 21),
    border: Color::Rgb(63, 63, 70),
    status: Color::Rgb(161, 161, 170),
    error: Color::Rgb(248, 113, 113),
    highlight_fg: Color::Rgb(17, 17, 20),
    highlight_bg: Color::Rgb(250, 204, 21),
    key_fg: Color::Rgb(17, 17, 20),
    key_bg: Color::Rgb(161, 161, 170),
  },
  Theme {
    name: "slate",
    bg: Color::Rgb(15, 23, 42),
    fg: Color::Rgb(226, 232, 240),
    muted: Color::Rgb(100, 116, 139),
    accent: Color::Rgb(56, 189, 248),
    border: Color::Rgb(51, 65, 85),
    status: Color::Rgb(148, 163, 184),
    error: Color::Rgb(251, 113, 133),
    highlight_fg: Color::Rgb(15, 23, 42),
    highlight_bg: Color::Rgb(56, 189, 248),
    key_fg: Color::Rgb(15, 23, 42),
    key_bg: Color::Rgb(148, 163, 184),
  },
];
