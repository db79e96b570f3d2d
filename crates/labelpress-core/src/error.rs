// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Labelpress.

use thiserror::Error;

/// Top-level error type for all Labelpress operations.
///
/// Every stage of label generation reports through this enum. A failed
/// generation never leaves a finalized artifact behind, whichever variant is
/// returned.
#[derive(Debug, Error)]
pub enum LabelError {
    // -- Caller errors --
    /// The tracking identifier was empty or contained a non-digit.
    #[error("invalid tracking identifier: {0}")]
    InvalidInput(String),

    #[error("invalid label specification: {0}")]
    InvalidSpec(String),

    // -- Pipeline errors --
    /// Internal symbology invariant violated. Indicates a defect.
    #[error("barcode encoding invariant violated: {0}")]
    Encoding(String),

    #[error("caption rendering failed: {0}")]
    Render(String),

    #[error("label export failed: {0}")]
    Export(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelError>;
