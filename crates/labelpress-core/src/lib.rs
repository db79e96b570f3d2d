// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelpress — Core types, unit conversion, configuration, and error
// definitions shared across all crates.

pub mod config;
pub mod error;
pub mod operator_errors;
pub mod types;
pub mod units;

pub use config::LabelConfig;
pub use error::LabelError;
pub use types::*;
pub use units::UnitConverter;
