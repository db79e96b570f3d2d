// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelpress-barcode — Code 128 symbol encoding for numeric tracking
// identifiers and pixel-exact rasterization of the resulting bar sequence.

pub mod encoder;
pub mod patterns;
pub mod raster;
pub mod symbol;

pub use encoder::SymbolEncoder;
pub use patterns::{ModulePattern, ModulePatternTable};
pub use raster::{BarLayout, BarcodeRasterizer};
pub use symbol::{EncodedSequence, SymbolCode};
