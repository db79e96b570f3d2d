// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caption fonts — system outline fonts via `ab_glyph`, with a compiled-in
// bitmap face as the last resort.

pub mod builtin;
pub mod resolver;

use std::fmt;
use std::path::PathBuf;

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use labelpress_core::error::Result;

pub use builtin::BitmapFont;
pub use resolver::FontResolver;

/// A font resolved for one pixel size, ready to measure and draw.
#[derive(Clone)]
pub enum CaptionFont {
    /// TrueType/OpenType face loaded from disk.
    Outline {
        font: FontArc,
        scale: PxScale,
        source: PathBuf,
    },
    /// Compiled-in bitmap face.
    Builtin(BitmapFont),
}

impl CaptionFont {
    /// Extent of `text` in pixels (width, height).
    pub fn measure(&self, text: &str) -> Result<(u32, u32)> {
        match self {
            Self::Outline { font, scale, .. } => Ok(text_size(*scale, font, text)),
            Self::Builtin(bitmap) => bitmap.measure(text),
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) -> Result<()> {
        match self {
            Self::Outline { font, scale, .. } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text);
                Ok(())
            }
            Self::Builtin(bitmap) => bitmap.draw(canvas, x, y, color, text),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

impl fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outline { scale, source, .. } => f
                .debug_struct("Outline")
                .field("source", source)
                .field("scale", &(scale.x, scale.y))
                .finish(),
            Self::Builtin(bitmap) => f.debug_tuple("Builtin").field(bitmap).finish(),
        }
    }
}
