// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Barcode rasterizer — draws an encoded sequence as black bars on a white
// bitmap of an exact physical size.
//
// Module width is fractional (`width_px / total_modules`). Bar edges are found
// by rounding a running floating-point cursor at every run boundary, so the
// accumulated error stays below one pixel and every edge is pixel-aligned
// with no anti-aliasing.

use std::ops::Range;

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use labelpress_core::error::{LabelError, Result};
use labelpress_core::units::mm_to_pixels;
use tracing::{debug, instrument};

use crate::patterns::ModulePatternTable;
use crate::symbol::EncodedSequence;

/// Blank modules on each side of the symbol.
pub const QUIET_MODULES: u32 = 10;

pub const BAR: Luma<u8> = Luma([0]);
pub const BACKGROUND: Luma<u8> = Luma([255]);

/// Horizontal bar geometry for one sequence at one bitmap width.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    /// Symbol modules plus both quiet zones.
    pub total_modules: u32,
    /// Width of one module in pixels.
    pub module_px: f64,
    /// Pixel columns covered by each bar, left to right.
    pub bars: Vec<Range<u32>>,
}

impl BarLayout {
    /// Total pixel columns painted black.
    pub fn black_columns(&self) -> u32 {
        self.bars.iter().map(|bar| bar.end - bar.start).sum()
    }
}

/// Draws encoded sequences into grayscale bitmaps.
#[derive(Debug, Clone, Copy)]
pub struct BarcodeRasterizer {
    quiet_modules: u32,
}

impl Default for BarcodeRasterizer {
    fn default() -> Self {
        Self {
            quiet_modules: QUIET_MODULES,
        }
    }
}

impl BarcodeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet_modules(&self) -> u32 {
        self.quiet_modules
    }

    /// Compute bar positions for `sequence` across `width_px` columns.
    pub fn layout(&self, sequence: &EncodedSequence, width_px: u32) -> BarLayout {
        let table = ModulePatternTable::global();

        let symbol_modules: u32 = sequence
            .codes()
            .iter()
            .map(|code| table.pattern(*code).total_modules())
            .sum();
        let total_modules = 2 * self.quiet_modules + symbol_modules;
        let module_px = f64::from(width_px) / f64::from(total_modules);

        let mut bars = Vec::new();
        let mut cursor = f64::from(self.quiet_modules) * module_px;
        for code in sequence.codes() {
            for (run, width) in table.pattern(*code).widths().enumerate() {
                let next = cursor + f64::from(width) * module_px;
                let (start, end) = (cursor.round() as u32, next.round() as u32);
                if run % 2 == 0 && end > start {
                    bars.push(start..end);
                }
                cursor = next;
            }
        }

        BarLayout {
            total_modules,
            module_px,
            bars,
        }
    }

    /// Render at a pixel size.
    pub fn render_px(&self, sequence: &EncodedSequence, width_px: u32, height_px: u32) -> GrayImage {
        let layout = self.layout(sequence, width_px);
        let mut bitmap = GrayImage::from_pixel(width_px, height_px, BACKGROUND);
        if height_px == 0 {
            return bitmap;
        }

        for bar in &layout.bars {
            let rect = Rect::at(bar.start as i32, 0).of_size(bar.end - bar.start, height_px);
            draw_filled_rect_mut(&mut bitmap, rect, BAR);
        }

        debug!(
            width_px,
            height_px,
            total_modules = layout.total_modules,
            module_px = layout.module_px,
            bars = layout.bars.len(),
            "Barcode rasterized"
        );
        bitmap
    }

    /// Render at a physical size. Fails with `InvalidSpec` when the size
    /// rounds to zero pixels.
    #[instrument(skip(self, sequence), fields(symbols = sequence.len()))]
    pub fn render(
        &self,
        sequence: &EncodedSequence,
        width_mm: f64,
        height_mm: f64,
        dpi: u32,
    ) -> Result<GrayImage> {
        let width_px = mm_to_pixels(width_mm, dpi);
        let height_px = mm_to_pixels(height_mm, dpi);
        if width_px == 0 || height_px == 0 {
            return Err(LabelError::InvalidSpec(format!(
                "barcode {width_mm}x{height_mm} mm is empty at {dpi} dpi"
            )));
        }
        Ok(self.render_px(sequence, width_px, height_px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SymbolEncoder;

    fn sequence(raw: &str) -> EncodedSequence {
        SymbolEncoder::encode_str(raw).unwrap()
    }

    /// Count maximal runs of black pixels along row `y`.
    fn black_runs(bitmap: &GrayImage, y: u32) -> Vec<Range<u32>> {
        let mut runs = Vec::new();
        let mut start = None;
        for x in 0..bitmap.width() {
            let black = bitmap.get_pixel(x, y)[0] == 0;
            match (black, start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    runs.push(s..x);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(s..bitmap.width());
        }
        runs
    }

    #[test]
    fn bitmap_matches_physical_size() {
        let bitmap = BarcodeRasterizer::new()
            .render(&sequence("123456789012"), 80.0, 20.0, 300)
            .unwrap();
        assert_eq!(bitmap.dimensions(), (945, 236));
    }

    #[test]
    fn module_count_includes_quiet_zones() {
        // 20 quiet + 105,12,34,56,78,90,12,54 at 11 each + STOP at 13
        let layout = BarcodeRasterizer::new().layout(&sequence("123456789012"), 945);
        assert_eq!(layout.total_modules, 121);
        assert!((layout.module_px - 945.0 / 121.0).abs() < 1e-12);
    }

    #[test]
    fn one_black_run_per_bar() {
        let seq = sequence("123456789012");
        let bitmap = BarcodeRasterizer::new().render_px(&seq, 945, 236);
        let table = ModulePatternTable::global();
        let expected_bars: usize = seq
            .codes()
            .iter()
            .map(|code| table.pattern(*code).bar_count())
            .sum();
        assert_eq!(expected_bars, 28);
        assert_eq!(black_runs(&bitmap, 0).len(), expected_bars);
        assert_eq!(black_runs(&bitmap, 235), black_runs(&bitmap, 0));
    }

    #[test]
    fn black_width_tracks_bar_modules() {
        let seq = sequence("123456789012");
        let layout = BarcodeRasterizer::new().layout(&seq, 945);
        let table = ModulePatternTable::global();
        let bar_modules: u32 = seq
            .codes()
            .iter()
            .map(|code| table.pattern(*code).bar_modules())
            .sum();
        assert_eq!(bar_modules, 54);

        // Each bar edge is off by at most half a pixel.
        let exact = f64::from(bar_modules) * layout.module_px;
        let drawn = f64::from(layout.black_columns());
        assert!(
            (drawn - exact).abs() <= layout.bars.len() as f64,
            "drew {drawn} columns, expected about {exact}"
        );
    }

    #[test]
    fn quiet_zones_stay_white() {
        let seq = sequence("5");
        let layout = BarcodeRasterizer::new().layout(&seq, 600);
        let quiet_px = (f64::from(QUIET_MODULES) * layout.module_px).round() as u32;
        let first = layout.bars.first().unwrap();
        let last = layout.bars.last().unwrap();
        assert_eq!(first.start, quiet_px);
        assert!(last.end <= 600 - quiet_px);
    }

    #[test]
    fn bars_do_not_overlap_and_stay_in_bounds() {
        let layout = BarcodeRasterizer::new().layout(&sequence("98765432109"), 945);
        for pair in layout.bars.windows(2) {
            assert!(pair[0].end < pair[1].start, "{:?} touches {:?}", pair[0], pair[1]);
        }
        assert!(layout.bars.iter().all(|bar| bar.end <= 945));
    }

    #[test]
    fn zero_size_is_rejected() {
        let result = BarcodeRasterizer::new().render(&sequence("12"), 0.0, 20.0, 300);
        assert!(matches!(result, Err(LabelError::InvalidSpec(_))));
    }

    #[test]
    fn rendering_is_deterministic() {
        let seq = sequence("4006381333931");
        let a = BarcodeRasterizer::new().render_px(&seq, 945, 50);
        let b = BarcodeRasterizer::new().render_px(&seq, 945, 50);
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
