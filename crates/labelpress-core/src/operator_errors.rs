// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Operator-facing error messages for the packing-station workflow.
//
// Every technical error maps to a short instruction for the person holding the
// scanner, plus the action the surrounding workflow should take.

use crate::error::LabelError;

/// What the caller should do after a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorAction {
    /// Bad scan or typo. Ask for the identifier again.
    Rescan,
    /// The station configuration is wrong; retrying will not help.
    FixConfiguration,
    /// Environmental failure (disk full, locked file). Retrying may succeed.
    Retry,
    /// A defect in Labelpress itself.
    ReportDefect,
}

/// A plain-language error with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct OperatorMessage {
    /// One-line summary (shown as a heading).
    pub message: String,
    /// What the operator should try next.
    pub suggestion: String,
    pub action: OperatorAction,
}

/// Convert a `LabelError` into a message a packing-station operator can act on.
pub fn describe(err: &LabelError) -> OperatorMessage {
    match err {
        LabelError::InvalidInput(detail) => OperatorMessage {
            message: "That tracking number can't be printed.".into(),
            suggestion: format!(
                "Scan the barcode again. Tracking numbers must contain digits only. ({detail})"
            ),
            action: OperatorAction::Rescan,
        },

        LabelError::InvalidSpec(detail) => OperatorMessage {
            message: "The label settings are not valid.".into(),
            suggestion: format!("Check the label size and margins in the configuration. ({detail})"),
            action: OperatorAction::FixConfiguration,
        },

        LabelError::Serialization(detail) => OperatorMessage {
            message: "The configuration file could not be read.".into(),
            suggestion: format!("Fix or remove the configuration file, then try again. ({detail})"),
            action: OperatorAction::FixConfiguration,
        },

        LabelError::Encoding(detail) => OperatorMessage {
            message: "The barcode could not be built.".into(),
            suggestion: format!("This is a software fault. Please report it. ({detail})"),
            action: OperatorAction::ReportDefect,
        },

        LabelError::Render(detail) => OperatorMessage {
            message: "The label text could not be drawn.".into(),
            suggestion: format!("No usable font was found for this text. ({detail})"),
            action: OperatorAction::ReportDefect,
        },

        LabelError::Export(detail) => OperatorMessage {
            message: "The label file could not be saved.".into(),
            suggestion: format!(
                "Make sure the output folder exists and the disk is not full, then try again. ({detail})"
            ),
            action: OperatorAction::Retry,
        },

        LabelError::Io(io) => OperatorMessage {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Close any program that has the label open, then try again. ({io})"),
            action: OperatorAction::Retry,
        },
    }
}
