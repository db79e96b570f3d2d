// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label generation pipeline — identifier in, finalized PNG + PDF out.
//
//   identifier -> SymbolEncoder -> BarcodeRasterizer -> LabelComposer
//              -> PNG encoder + LabelPdfWriter -> staged, then finalized
//
// Synchronous and single-threaded. Nothing is written for an invalid
// identifier. A failure at any later stage leaves no artifact for that
// identifier, neither a new one nor one from an earlier run.
// Concurrent calls for the same identifier race on the final rename; callers
// must serialize them.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{GrayImage, RgbImage};
use labelpress_barcode::{BarcodeRasterizer, EncodedSequence, SymbolEncoder};
use labelpress_core::error::{LabelError, Result};
use labelpress_core::units::MM_PER_INCH;
use labelpress_core::{LabelSpec, TrackingIdentifier};
use tracing::{info, instrument};

use crate::artifacts::{self, LabelArtifacts, StagedArtifact};
use crate::compose::{ComposedLabel, LabelComposer};
use crate::font::FontResolver;
use crate::pdf::LabelPdfWriter;

/// Everything produced in memory for one identifier.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub identifier: TrackingIdentifier,
    pub sequence: EncodedSequence,
    /// Barcode bitmap at `barcode_width_mm` x `barcode_height_mm`.
    pub barcode: GrayImage,
    pub label: ComposedLabel,
}

/// Generates labels for one layout into one output directory.
pub struct LabelGenerator {
    spec: LabelSpec,
    output_dir: PathBuf,
    fonts: Arc<FontResolver>,
    rasterizer: BarcodeRasterizer,
    composer: LabelComposer,
}

impl LabelGenerator {
    /// Validate `spec` and prepare a generator using the process-wide fonts.
    pub fn new(spec: LabelSpec, output_dir: impl Into<PathBuf>) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            composer: LabelComposer::new(spec.clone()),
            spec,
            output_dir: output_dir.into(),
            fonts: FontResolver::global(),
            rasterizer: BarcodeRasterizer::new(),
        })
    }

    /// Use a specific font resolver instead of the process-wide one.
    pub fn with_fonts(mut self, fonts: Arc<FontResolver>) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn spec(&self) -> &LabelSpec {
        &self.spec
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run encode, rasterize and compose in memory.
    #[instrument(skip(self), fields(identifier = %identifier))]
    pub fn render(&self, identifier: &TrackingIdentifier) -> Result<RenderedLabel> {
        let sequence = SymbolEncoder::encode(identifier);
        let barcode = self.rasterizer.render(
            &sequence,
            self.spec.barcode_width_mm,
            self.spec.barcode_height_mm,
            self.spec.dpi,
        )?;
        let label = self
            .composer
            .compose(&barcode, identifier.as_str(), &self.fonts)?;

        Ok(RenderedLabel {
            identifier: identifier.clone(),
            sequence,
            barcode,
            label,
        })
    }

    /// Validate `raw`, render it, and finalize `label_<id>.png` and
    /// `label_<id>.pdf` in the output directory.
    ///
    /// If anything fails after validation, previous artifacts for the same
    /// identifier are removed as well.
    #[instrument(skip(self))]
    pub fn generate(&self, raw: &str) -> Result<LabelArtifacts> {
        let identifier = TrackingIdentifier::parse(raw)?;
        let paths = LabelArtifacts::for_identifier(&self.output_dir, &identifier);

        let finalized = match self.write_artifacts(&identifier, &paths) {
            Ok(finalized) => finalized,
            Err(err) => {
                artifacts::discard_label(&paths);
                return Err(err);
            }
        };

        info!(
            png = %finalized.png_path.display(),
            pdf = %finalized.pdf_path.display(),
            "Label generated"
        );
        Ok(finalized)
    }

    fn write_artifacts(
        &self,
        identifier: &TrackingIdentifier,
        paths: &LabelArtifacts,
    ) -> Result<LabelArtifacts> {
        let rendered = self.render(identifier)?;

        let png_bytes = encode_png(&rendered.label.image, self.spec.dpi)?;
        let mut writer = LabelPdfWriter::new();
        writer.set_title(format!("Label {identifier}"));
        let pdf_bytes = writer.create_from_label(&rendered.label.image, &self.spec)?;

        std::fs::create_dir_all(&self.output_dir).map_err(|err| {
            LabelError::Export(format!(
                "cannot create output directory {}: {err}",
                self.output_dir.display()
            ))
        })?;
        let png = StagedArtifact::write(&paths.png_path, &png_bytes)?;
        let pdf = StagedArtifact::write(&paths.pdf_path, &pdf_bytes)?;
        artifacts::finalize_label(png, pdf)
    }
}

/// Encode a label raster as PNG bytes tagged with `dpi` (pHYs chunk), so
/// viewers open it at its physical size.
pub fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>> {
    let png_error =
        |err: png::EncodingError| LabelError::Export(format!("PNG encoding failed: {err}"));
    let pixels_per_metre = (f64::from(dpi) * 1000.0 / MM_PER_INCH).round() as u32;

    let mut buffer = Vec::new();
    let mut encoder = png::Encoder::new(&mut buffer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_metre,
        yppu: pixels_per_metre,
        unit: png::Unit::Meter,
    }));
    let mut writer = encoder.write_header().map_err(png_error)?;
    writer.write_image_data(image.as_raw()).map_err(png_error)?;
    writer.finish().map_err(png_error)?;
    Ok(buffer)
}
