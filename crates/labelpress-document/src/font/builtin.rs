// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Compiled-in 5x7 bitmap face. Covers what a tracking-number caption needs:
// digits, space, '-' and '_'. Each dot is drawn as a solid square so the
// caption stays crisp at any integer scale.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use labelpress_core::error::{LabelError, Result};

const GLYPH_COLUMNS: u32 = 5;
const GLYPH_ROWS: u32 = 7;
/// Blank columns between glyphs.
const TRACKING: u32 = 1;

/// Rows top to bottom, bit 4 is the leftmost column.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '_' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
        ' ' => [0x00; 7],
        _ => return None,
    };
    Some(rows)
}

/// The bitmap face scaled so that one font dot is `dot` pixels square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    dot: u32,
}

impl BitmapFont {
    /// Scale for an em size of `pixel_size`. Digit height ends up at about
    /// 70% of the em, like a typical sans face.
    pub fn for_pixel_size(pixel_size: u32) -> Self {
        let dot = (f64::from(pixel_size) * 0.7 / f64::from(GLYPH_ROWS)).round() as u32;
        Self { dot: dot.max(1) }
    }

    pub fn dot(&self) -> u32 {
        self.dot
    }

    pub fn supports(ch: char) -> bool {
        glyph(ch).is_some()
    }

    fn check(text: &str) -> Result<()> {
        match text.chars().find(|ch| !Self::supports(*ch)) {
            Some(ch) => Err(LabelError::Render(format!(
                "built-in caption font has no glyph for {ch:?}"
            ))),
            None => Ok(()),
        }
    }

    pub fn measure(&self, text: &str) -> Result<(u32, u32)> {
        Self::check(text)?;
        let count = text.chars().count() as u32;
        if count == 0 {
            return Ok((0, 0));
        }
        let width = (count * (GLYPH_COLUMNS + TRACKING) - TRACKING) * self.dot;
        Ok((width, GLYPH_ROWS * self.dot))
    }

    /// Draw `text` with its top-left corner at (`x`, `y`). Nothing is drawn
    /// if any character is unsupported.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) -> Result<()> {
        Self::check(text)?;
        let dot = self.dot as i32;
        let advance = ((GLYPH_COLUMNS + TRACKING) * self.dot) as i32;

        for (index, ch) in text.chars().enumerate() {
            let Some(rows) = glyph(ch) else { continue };
            let origin_x = x + index as i32 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for column in 0..GLYPH_COLUMNS {
                    if bits & (0x10 >> column) == 0 {
                        continue;
                    }
                    let rect = Rect::at(origin_x + column as i32 * dot, y + row as i32 * dot)
                        .of_size(self.dot, self.dot);
                    draw_filled_rect_mut(canvas, rect, color);
                }
            }
        }
        Ok(())
    }
}
