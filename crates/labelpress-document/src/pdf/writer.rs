// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — wraps a composed label raster in a one-page PDF whose media box
// is exactly the label stock, using `printpdf` 0.8.
//
// The page size comes from the label's millimetre dimensions, never from the
// raster's pixel count, so DPI rounding cannot change the printed size. The
// raster is stretched to cover the whole page.

use image::RgbImage;
use labelpress_core::LabelSpec;
use labelpress_core::error::{LabelError, Result};
use labelpress_core::units::{PT_PER_INCH, mm_to_pt};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Creates page-exact label PDFs.
pub struct LabelPdfWriter {
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl Default for LabelPdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelPdfWriter {
    pub fn new() -> Self {
        Self { title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Page size in printpdf's Mm units, straight from the label stock.
    pub fn page_dimensions(spec: &LabelSpec) -> (Mm, Mm) {
        (
            Mm(spec.label_width_mm() as f32),
            Mm(spec.label_height_mm() as f32),
        )
    }

    /// Page size in PDF points (1 mm = 72 / 25.4 pt).
    pub fn page_size_pt(spec: &LabelSpec) -> (f64, f64) {
        (mm_to_pt(spec.label_width_mm()), mm_to_pt(spec.label_height_mm()))
    }

    /// Build the PDF for `label` on `spec`'s stock.
    #[instrument(skip(self, label, spec), fields(width = label.width(), height = label.height()))]
    pub fn create_from_label(&self, label: &RgbImage, spec: &LabelSpec) -> Result<Vec<u8>> {
        let (img_w, img_h) = label.dimensions();
        if img_w == 0 || img_h == 0 {
            return Err(LabelError::Export("label raster is empty".into()));
        }
        if spec.dpi == 0 {
            return Err(LabelError::Export("label dpi is zero".into()));
        }

        let title = self.title.as_deref().unwrap_or("Labelpress Label");
        let (page_w, page_h) = Self::page_dimensions(spec);
        let (page_w_pt, page_h_pt) = Self::page_size_pt(spec);

        let raw = RawImage {
            pixels: RawImageData::U8(label.as_raw().clone()),
            width: img_w as usize,
            height: img_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        // Native image size at the label DPI, then stretch to the page.
        let dpi = spec.dpi as f32;
        let native_w_pt = f64::from(img_w) * PT_PER_INCH / f64::from(spec.dpi);
        let native_h_pt = f64::from(img_h) * PT_PER_INCH / f64::from(spec.dpi);
        let scale_x = (page_w_pt / native_w_pt) as f32;
        let scale_y = (page_h_pt / native_h_pt) as f32;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(0.0)),
                translate_y: Some(Pt(0.0)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(dpi),
                rotate: None,
            },
        }];

        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        debug!(
            page_w_pt,
            page_h_pt,
            scale_x,
            scale_y,
            warnings = warnings.len(),
            "Label placed on page"
        );
        info!(
            format = %spec.format,
            bytes = output.len(),
            "Label PDF created"
        );
        Ok(output)
    }
}
