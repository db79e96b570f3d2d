// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Labelpress.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};
use crate::units::UnitConverter;

/// A validated tracking number: one or more ASCII decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingIdentifier(String);

impl TrackingIdentifier {
    /// Validate `raw` as a tracking identifier.
    ///
    /// Rejects the empty string and any character outside `0-9`. No trimming
    /// is performed; scanners that append line endings must be stripped by
    /// the caller.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(LabelError::InvalidInput(
                "tracking identifier is empty".into(),
            ));
        }
        if let Some((pos, ch)) = raw.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
            return Err(LabelError::InvalidInput(format!(
                "tracking identifier {raw:?} has non-digit {ch:?} at byte {pos}"
            )));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TrackingIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TrackingIdentifier {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TrackingIdentifier {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TrackingIdentifier> for String {
    fn from(value: TrackingIdentifier) -> Self {
        value.0
    }
}

/// Supported label stock, width x height in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelFormat {
    #[default]
    #[serde(rename = "100x100")]
    Size100x100,
    #[serde(rename = "100x70")]
    Size100x70,
    #[serde(rename = "100x150")]
    Size100x150,
}

impl LabelFormat {
    pub const ALL: [LabelFormat; 3] = [Self::Size100x100, Self::Size100x70, Self::Size100x150];

    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::Size100x100 => (100, 100),
            Self::Size100x70 => (100, 70),
            Self::Size100x150 => (100, 150),
        }
    }

    /// Keyword used in configuration files and on the command line.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Size100x100 => "100x100",
            Self::Size100x70 => "100x70",
            Self::Size100x150 => "100x150",
        }
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.keyword())
    }
}

impl FromStr for LabelFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['×', '*'], "x");
        Self::ALL
            .into_iter()
            .find(|format| format.keyword() == wanted)
            .ok_or_else(|| {
                LabelError::InvalidSpec(format!(
                    "unsupported label format {s:?} (expected one of 100x100, 100x70, 100x150)"
                ))
            })
    }
}

/// Physical layout of one label. All lengths in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSpec {
    /// Label stock size.
    pub format: LabelFormat,
    /// Printed width of the barcode symbol including quiet zones.
    pub barcode_width_mm: f64,
    pub barcode_height_mm: f64,
    /// Distance from the top edge of the label to the barcode.
    pub top_margin_mm: f64,
    /// Gap between the bottom of the barcode and the caption.
    pub text_margin_top_mm: f64,
    /// Caption size in typographic points.
    pub font_size_pt: f64,
    /// Output resolution.
    pub dpi: u32,
}

impl Default for LabelSpec {
    fn default() -> Self {
        Self {
            format: LabelFormat::default(),
            barcode_width_mm: 80.0,
            barcode_height_mm: 20.0,
            top_margin_mm: 10.0,
            text_margin_top_mm: 3.0,
            font_size_pt: 20.0,
            dpi: 300,
        }
    }
}

impl LabelSpec {
    /// Default layout on the given label stock.
    pub fn new(format: LabelFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn label_width_mm(&self) -> f64 {
        f64::from(self.format.dimensions_mm().0)
    }

    pub fn label_height_mm(&self) -> f64 {
        f64::from(self.format.dimensions_mm().1)
    }

    pub fn units(&self) -> UnitConverter {
        UnitConverter::new(self.dpi)
    }

    /// Full label canvas size in pixels (width, height).
    pub fn label_size_px(&self) -> (u32, u32) {
        let units = self.units();
        (
            units.mm_to_px(self.label_width_mm()),
            units.mm_to_px(self.label_height_mm()),
        )
    }

    /// Barcode bitmap size in pixels (width, height).
    pub fn barcode_size_px(&self) -> (u32, u32) {
        let units = self.units();
        (
            units.mm_to_px(self.barcode_width_mm),
            units.mm_to_px(self.barcode_height_mm),
        )
    }

    /// Check that every length is finite and positive and that the barcode
    /// fits on the label.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(LabelError::InvalidSpec("dpi must be positive".into()));
        }

        let lengths = [
            ("barcode_width_mm", self.barcode_width_mm),
            ("barcode_height_mm", self.barcode_height_mm),
            ("top_margin_mm", self.top_margin_mm),
            ("text_margin_top_mm", self.text_margin_top_mm),
            ("font_size_pt", self.font_size_pt),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(LabelError::InvalidSpec(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        if self.barcode_width_mm > self.label_width_mm() {
            return Err(LabelError::InvalidSpec(format!(
                "barcode width {} mm exceeds label width {} mm",
                self.barcode_width_mm,
                self.label_width_mm()
            )));
        }
        if self.top_margin_mm + self.barcode_height_mm > self.label_height_mm() {
            return Err(LabelError::InvalidSpec(format!(
                "barcode bottom at {} mm falls outside a {} mm label",
                self.top_margin_mm + self.barcode_height_mm,
                self.label_height_mm()
            )));
        }

        let (bar_w, bar_h) = self.barcode_size_px();
        if bar_w == 0 || bar_h == 0 {
            return Err(LabelError::InvalidSpec(format!(
                "barcode rounds to {bar_w}x{bar_h} px at {} dpi",
                self.dpi
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_accepts_digits() {
        let id = TrackingIdentifier::parse("0012345").unwrap();
        assert_eq!(id.as_str(), "0012345");
        assert_eq!(id.len(), 7);
        assert_eq!(id.to_string(), "0012345");
    }

    #[test]
    fn identifier_rejects_empty() {
        assert!(matches!(
            TrackingIdentifier::parse(""),
            Err(LabelError::InvalidInput(_))
        ));
    }

    #[test]
    fn identifier_rejects_non_digits() {
        for raw in ["12a3", " 123", "123\n", "１２", "-1", "1.5"] {
            assert!(
                matches!(TrackingIdentifier::parse(raw), Err(LabelError::InvalidInput(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn identifier_deserializes_with_validation() {
        let ok: TrackingIdentifier = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(ok.as_str(), "42");
        assert!(serde_json::from_str::<TrackingIdentifier>("\"4x2\"").is_err());
    }

    #[test]
    fn format_keywords_round_trip() {
        for format in LabelFormat::ALL {
            assert_eq!(format.keyword().parse::<LabelFormat>().unwrap(), format);
        }
        assert_eq!("100×150".parse::<LabelFormat>().unwrap(), LabelFormat::Size100x150);
        assert!(matches!(
            "210x297".parse::<LabelFormat>(),
            Err(LabelError::InvalidSpec(_))
        ));
    }

    #[test]
    fn format_serializes_as_keyword() {
        let json = serde_json::to_string(&LabelFormat::Size100x70).unwrap();
        assert_eq!(json, "\"100x70\"");
    }

    #[test]
    fn default_spec_pixel_geometry() {
        let spec = LabelSpec::default();
        assert_eq!(spec.label_size_px(), (1181, 1181));
        assert_eq!(spec.barcode_size_px(), (945, 236));
        spec.validate().unwrap();

        let tall = LabelSpec::new(LabelFormat::Size100x150);
        assert_eq!(tall.label_size_px(), (1181, 1772));
        let wide = LabelSpec::new(LabelFormat::Size100x70);
        assert_eq!(wide.label_size_px(), (1181, 827));
    }

    #[test]
    fn validate_rejects_non_positive_lengths() {
        let spec = LabelSpec {
            font_size_pt: 0.0,
            ..LabelSpec::default()
        };
        assert!(matches!(spec.validate(), Err(LabelError::InvalidSpec(_))));

        let spec = LabelSpec {
            top_margin_mm: f64::NAN,
            ..LabelSpec::default()
        };
        assert!(matches!(spec.validate(), Err(LabelError::InvalidSpec(_))));

        let spec = LabelSpec {
            dpi: 0,
            ..LabelSpec::default()
        };
        assert!(matches!(spec.validate(), Err(LabelError::InvalidSpec(_))));
    }

    #[test]
    fn validate_rejects_barcode_larger_than_label() {
        let spec = LabelSpec {
            barcode_width_mm: 120.0,
            ..LabelSpec::default()
        };
        assert!(matches!(spec.validate(), Err(LabelError::InvalidSpec(_))));

        let spec = LabelSpec {
            format: LabelFormat::Size100x70,
            top_margin_mm: 60.0,
            ..LabelSpec::default()
        };
        assert!(matches!(spec.validate(), Err(LabelError::InvalidSpec(_))));
    }

    #[test]
    fn spec_fills_missing_fields_from_defaults() {
        let spec: LabelSpec = serde_json::from_str(r#"{ "format": "100x150" }"#).unwrap();
        assert_eq!(spec.format, LabelFormat::Size100x150);
        assert_eq!(spec.barcode_width_mm, 80.0);
        assert_eq!(spec.dpi, 300);
    }
}
