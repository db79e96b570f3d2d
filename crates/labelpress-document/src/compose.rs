// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label composer — places the barcode bitmap and its caption on a full-size
// white label canvas.
//
// Layout, top to bottom: `top_margin_mm` of white, the barcode centred
// horizontally, `text_margin_top_mm` of white, then the caption centred
// horizontally. A caption that would run off the bottom edge is lifted so it
// ends 2 mm above it.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use labelpress_core::LabelSpec;
use labelpress_core::error::Result;
use tracing::{debug, instrument};

use crate::font::FontResolver;

/// Clearance kept under a caption that had to be lifted.
pub const BOTTOM_CLEARANCE_MM: f64 = 2.0;

pub const INK: Rgb<u8> = Rgb([0, 0, 0]);
pub const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

/// Pixel geometry of a composed label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLayout {
    pub label_size: (u32, u32),
    pub barcode_size: (u32, u32),
    /// Top-left corner of the barcode.
    pub barcode_origin: (i32, i32),
    pub caption_size: (u32, u32),
    /// Top-left corner of the caption.
    pub caption_origin: (i32, i32),
}

/// A finished label raster and where things landed on it.
#[derive(Debug, Clone)]
pub struct ComposedLabel {
    pub image: RgbImage,
    pub layout: LabelLayout,
}

/// Composes labels for one [`LabelSpec`].
pub struct LabelComposer {
    spec: LabelSpec,
}

impl LabelComposer {
    pub fn new(spec: LabelSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &LabelSpec {
        &self.spec
    }

    /// Compute the layout for a caption of `caption_size` pixels.
    pub fn layout(&self, caption_size: (u32, u32)) -> LabelLayout {
        let units = self.spec.units();
        let (label_w, label_h) = self.spec.label_size_px();
        let (bar_w, bar_h) = self.spec.barcode_size_px();
        let (text_w, text_h) = caption_size;

        let top = units.mm_to_px(self.spec.top_margin_mm) as i32;
        let barcode_origin = (centre(label_w, bar_w), top);

        let mut text_y = top + bar_h as i32 + units.mm_to_px(self.spec.text_margin_top_mm) as i32;
        if text_y + text_h as i32 > label_h as i32 {
            let clearance = units.mm_to_px(BOTTOM_CLEARANCE_MM) as i32;
            text_y = (label_h as i32 - text_h as i32 - clearance).max(0);
        }

        LabelLayout {
            label_size: (label_w, label_h),
            barcode_size: (bar_w, bar_h),
            barcode_origin,
            caption_size,
            caption_origin: (centre(label_w, text_w), text_y),
        }
    }

    /// Compose `barcode` and `caption` onto a fresh canvas.
    ///
    /// The barcode is resampled to the exact barcode pixel size with
    /// nearest-neighbour only, keeping module edges hard.
    #[instrument(skip(self, barcode, fonts))]
    pub fn compose(
        &self,
        barcode: &GrayImage,
        caption: &str,
        fonts: &FontResolver,
    ) -> Result<ComposedLabel> {
        let font_px = self.spec.units().pt_to_px(self.spec.font_size_pt);
        let font = fonts.resolve(font_px);
        let caption_size = font.measure(caption)?;
        let layout = self.layout(caption_size);

        let (label_w, label_h) = layout.label_size;
        let mut canvas = RgbImage::from_pixel(label_w, label_h, PAPER);

        let (bar_w, bar_h) = layout.barcode_size;
        let bars = if barcode.dimensions() == (bar_w, bar_h) {
            barcode.clone()
        } else {
            imageops::resize(barcode, bar_w, bar_h, FilterType::Nearest)
        };
        let bars = DynamicImage::ImageLuma8(bars).to_rgb8();
        let (bar_x, bar_y) = layout.barcode_origin;
        imageops::replace(&mut canvas, &bars, i64::from(bar_x), i64::from(bar_y));

        let (text_x, text_y) = layout.caption_origin;
        font.draw(&mut canvas, text_x, text_y, INK, caption)?;

        debug!(
            ?layout,
            builtin_font = font.is_builtin(),
            font_px,
            "Label composed"
        );
        Ok(ComposedLabel {
            image: canvas,
            layout,
        })
    }
}

/// Left offset that centres `inner` within `outer`, flooring like integer
/// division; negative when `inner` is wider.
fn centre(outer: u32, inner: u32) -> i32 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2) as i32
}
