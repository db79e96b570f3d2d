// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Physical unit conversion — millimetres and typographic points to device
// pixels at a fixed resolution, plus millimetres to PDF user-space points.

use serde::{Deserialize, Serialize};

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Typographic points per inch (PostScript / PDF point).
pub const PT_PER_INCH: f64 = 72.0;

/// Convert millimetres to whole pixels at `dpi`.
///
/// Rounds half away from zero. Negative or non-finite input maps to 0.
pub fn mm_to_pixels(mm: f64, dpi: u32) -> u32 {
    to_pixels(mm * f64::from(dpi) / MM_PER_INCH)
}

/// Convert typographic points to whole pixels at `dpi`.
pub fn pt_to_pixels(pt: f64, dpi: u32) -> u32 {
    to_pixels(pt * f64::from(dpi) / PT_PER_INCH)
}

/// Convert millimetres to PDF points (1 mm ≈ 2.8346 pt). Not rounded.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_INCH / MM_PER_INCH
}

fn to_pixels(exact: f64) -> u32 {
    if !exact.is_finite() || exact <= 0.0 {
        return 0;
    }
    // `f64::round` rounds half away from zero.
    exact.round().min(f64::from(u32::MAX)) as u32
}

/// Unit converter bound to one output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConverter {
    dpi: u32,
}

impl UnitConverter {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn mm_to_px(&self, mm: f64) -> u32 {
        mm_to_pixels(mm, self.dpi)
    }

    pub fn pt_to_px(&self, pt: f64) -> u32 {
        pt_to_pixels(pt, self.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mm_is_zero_pixels() {
        assert_eq!(mm_to_pixels(0.0, 300), 0);
        assert_eq!(pt_to_pixels(0.0, 300), 0);
    }

    #[test]
    fn label_dimensions_at_300_dpi() {
        assert_eq!(mm_to_pixels(100.0, 300), 1181);
        assert_eq!(mm_to_pixels(70.0, 300), 827);
        assert_eq!(mm_to_pixels(150.0, 300), 1772);
        assert_eq!(mm_to_pixels(80.0, 300), 945);
        assert_eq!(mm_to_pixels(20.0, 300), 236);
        assert_eq!(mm_to_pixels(10.0, 300), 118);
        assert_eq!(mm_to_pixels(3.0, 300), 35);
        assert_eq!(mm_to_pixels(2.0, 300), 24);
    }

    #[test]
    fn font_size_at_300_dpi() {
        // 20pt * 300 / 72 = 83.33
        assert_eq!(pt_to_pixels(20.0, 300), 83);
        assert_eq!(pt_to_pixels(72.0, 300), 300);
    }

    #[test]
    fn exact_half_rounds_away_from_zero() {
        // 0.5 inch of points at 1 dpi is 0.5 px.
        assert_eq!(pt_to_pixels(36.0, 1), 1);
        // 1.5 px, where banker's rounding would give 2 as well; 2.5 px must be 3.
        assert_eq!(pt_to_pixels(180.0, 1), 3);
    }

    #[test]
    fn mm_to_pixels_is_monotonic() {
        let mut previous = 0;
        for tenth in 0..=2000 {
            let px = mm_to_pixels(f64::from(tenth) / 10.0, 300);
            assert!(px >= previous, "{px} < {previous} at {tenth} tenths of a mm");
            previous = px;
        }
    }

    #[test]
    fn negative_and_nan_clamp_to_zero() {
        assert_eq!(mm_to_pixels(-5.0, 300), 0);
        assert_eq!(mm_to_pixels(f64::NAN, 300), 0);
    }

    #[test]
    fn mm_to_pt_matches_pdf_unit() {
        assert!((mm_to_pt(1.0) - 2.834_645_669).abs() < 1e-6);
        assert!((mm_to_pt(100.0) - 283.464_566_93).abs() < 1e-6);
    }

    #[test]
    fn converter_delegates_to_free_functions() {
        let units = UnitConverter::new(300);
        assert_eq!(units.dpi(), 300);
        assert_eq!(units.mm_to_px(100.0), mm_to_pixels(100.0, 300));
        assert_eq!(units.pt_to_px(20.0), pt_to_pixels(20.0, 300));
    }
}
