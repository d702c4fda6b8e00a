//! Thumbnail preview rendering into terminal cells.
//!
//! Two strategies: true-color half-block cells (one cell covers two
//! vertically stacked pixels via "▀" with fg/bg colors) and a grayscale
//! ASCII ramp. The widget samples the source image directly with
//! nearest-neighbor math, so callers never pre-resize and tiles of any
//! size stay cheap to repaint.

use image::DynamicImage;
use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  widgets::Widget,
};

use crate::display::DisplayMode;

pub struct PreviewWidget<'a> {
  pub image: &'a DynamicImage,
  pub display_mode: DisplayMode,
}

const ASCII_RAMP: [&str; 10] = [" ", ".", ":", "-", "=", "+", "*", "#", "%", "@"];

impl Widget for PreviewWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
      return;
    }
    match self.display_mode {
      DisplayMode::Direct => render_direct(self.image, area, buf),
      DisplayMode::Ascii => render_ascii(self.image, area, buf),
    }
  }
}

/// Map a cell coordinate to a source pixel coordinate (nearest-neighbor).
fn sample(src_len: u32, dst_len: u32, dst_pos: u32) -> u32 {
  if dst_len == 0 {
    return 0;
  }
  ((dst_pos as u64 * src_len as u64) / dst_len as u64).min(src_len.saturating_sub(1) as u64) as u32
}

fn render_direct(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let rgb = image.to_rgb8();
  if rgb.width() == 0 || rgb.height() == 0 {
    return;
  }
  // Each cell row covers two pixel rows.
  let px_rows = area.height as u32 * 2;
  for y in 0..area.height as u32 {
    for x in 0..area.width as u32 {
      let sx = sample(rgb.width(), area.width as u32, x);
      let upper = rgb.get_pixel(sx, sample(rgb.height(), px_rows, y * 2));
      let lower = rgb.get_pixel(sx, sample(rgb.height(), px_rows, y * 2 + 1));
      buf.set_string(
        area.x + x as u16,
        area.y + y as u16,
        "▀",
        Style::default().fg(Color::Rgb(upper[0], upper[1], upper[2])).bg(Color::Rgb(lower[0], lower[1], lower[2])),
      );
    }
  }
}

fn render_ascii(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let luma = image.to_luma8();
  if luma.width() == 0 || luma.height() == 0 {
    return;
  }
  for y in 0..area.height as u32 {
    for x in 0..area.width as u32 {
      let sx = sample(luma.width(), area.width as u32, x);
      let sy = sample(luma.height(), area.height as u32, y);
      let pixel = luma.get_pixel(sx, sy)[0];
      let idx = (pixel as usize * (ASCII_RAMP.len() - 1)) / 255;
      buf.set_string(area.x + x as u16, area.y + y as u16, ASCII_RAMP[idx], Style::default());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sample_covers_full_source_range() {
    assert_eq!(sample(100, 10, 0), 0);
    assert_eq!(sample(100, 10, 9), 90);
    // Never out of bounds, even when upscaling.
    assert_eq!(sample(2, 10, 9), 1);
  }

  #[test]
  fn ascii_render_fills_area() {
    let image = DynamicImage::new_rgb8(16, 9);
    let area = Rect::new(0, 0, 8, 4);
    let mut buf = Buffer::empty(area);
    PreviewWidget { image: &image, display_mode: DisplayMode::Ascii }.render(area, &mut buf);
    // A black source image maps to the darkest ramp entry everywhere.
    assert_eq!(buf[(0, 0)].symbol(), " ");
    assert_eq!(buf[(7, 3)].symbol(), " ");
  }
}
