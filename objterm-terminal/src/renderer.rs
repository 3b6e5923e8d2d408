/// Framebuffer to colored terminal text conversion
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use objterm_core::Renderer;
use std::io::Write;

use crate::config::DisplayConfig;

/// Character luminosity ramp, densest first
pub const GLYPH_RAMP: &[u8] =
    b"$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/|()1{}[]?-_+~<>i!lI;:,. ";

/// Depths at or beyond this are background
const FAR_DEPTH: f64 = 1e10;

const BLACK: Color = Color::Rgb { r: 0, g: 0, b: 0 };

/// One output character with its colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

/// Map intensity in [0, 1] to a glyph; brighter is denser.
pub fn intensity_to_glyph(intensity: f64) -> char {
    let last = GLYPH_RAMP.len() - 1;
    let index = ((1.0 - intensity) * last as f64 + 0.5) as i64;
    GLYPH_RAMP[index.clamp(0, last as i64) as usize] as char
}

fn to_channel(value: f64) -> u8 {
    (value as i64).clamp(0, 255) as u8
}

/// Converts a rendered framebuffer into character cells
pub struct AsciiRenderer {
    char_width: usize,
    char_height: usize,
    color_factor: f64,
    brightness_factor: f64,
}

impl AsciiRenderer {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            char_width: config.char_width.max(1),
            char_height: config.char_height.max(1),
            color_factor: config.color_factor,
            brightness_factor: config.brightness_factor,
        }
    }

    /// Output size in characters for a framebuffer
    pub fn grid_size(&self, frame: &Renderer) -> (usize, usize) {
        (
            frame.width() / self.char_width,
            frame.height() / self.char_height,
        )
    }

    /// Average the pixels under one character cell
    pub fn cell(&self, frame: &Renderer, cx: usize, cy: usize) -> Cell {
        let (mut r, mut g, mut b, mut intensity) = (0.0, 0.0, 0.0, 0.0);
        let mut count = 0usize;
        let mut any_color = false;

        for dy in 0..self.char_height {
            for dx in 0..self.char_width {
                let Some(pixel) =
                    frame.pixel(cx * self.char_width + dx, cy * self.char_height + dy)
                else {
                    continue;
                };
                if pixel.depth >= FAR_DEPTH {
                    continue;
                }
                match pixel.color {
                    Some(c) => {
                        r += c.r;
                        g += c.g;
                        b += c.b;
                        any_color = true;
                    }
                    None => intensity += pixel.intensity,
                }
                count += 1;
            }
        }

        if count == 0 {
            return Cell {
                glyph: intensity_to_glyph(0.0),
                fg: BLACK,
                bg: BLACK,
            };
        }

        let n = count as f64;
        if any_color {
            let scale = 255.0 * self.color_factor;
            let (r, g, b) = (
                to_channel(r / n * scale),
                to_channel(g / n * scale),
                to_channel(b / n * scale),
            );
            let dim = |c: u8| to_channel(c as f64 * self.brightness_factor);
            let brightness = (r as f64 + g as f64 + b as f64) / (255.0 * 3.0);
            Cell {
                glyph: intensity_to_glyph(brightness),
                fg: Color::Rgb { r, g, b },
                bg: Color::Rgb {
                    r: dim(r),
                    g: dim(g),
                    b: dim(b),
                },
            }
        } else {
            // grayscale ramp of the 256-color palette (232..=255)
            let avg = intensity / n;
            let level = ((avg * 5.0) as i64).clamp(0, 5);
            let gray = (232 + level * 4).min(255);
            let bg_gray = (gray - 12).max(232);
            Cell {
                glyph: intensity_to_glyph(avg),
                fg: Color::AnsiValue(gray as u8),
                bg: Color::AnsiValue(bg_gray as u8),
            }
        }
    }

    /// All cells, row by row
    pub fn cells(&self, frame: &Renderer) -> Vec<Vec<Cell>> {
        let (cols, rows) = self.grid_size(frame);
        (0..rows)
            .map(|cy| (0..cols).map(|cx| self.cell(frame, cx, cy)).collect())
            .collect()
    }

    /// Queue the frame as colored text; rows end with `\r\n` so output works in raw mode.
    pub fn draw<W: Write>(&self, frame: &Renderer, writer: &mut W) -> std::io::Result<()> {
        for row in self.cells(frame) {
            for cell in row {
                writer.queue(SetBackgroundColor(cell.bg))?;
                writer.queue(SetForegroundColor(cell.fg))?;
                writer.queue(Print(cell.glyph))?;
            }
            writer.queue(ResetColor)?;
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}
