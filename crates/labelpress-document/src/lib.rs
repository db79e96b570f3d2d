// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelpress-document — Label composition and export for Labelpress.
//
// Provides caption font resolution (system outline fonts with a compiled-in
// bitmap fallback), label composition, page-exact PDF export, staged artifact
// writes, and the end-to-end `LabelGenerator` pipeline.

pub mod artifacts;
pub mod compose;
pub mod font;
pub mod pdf;
pub mod pipeline;

// Re-export the primary structs so callers can use `labelpress_document::LabelGenerator` etc.
pub use artifacts::{LabelArtifacts, sweep_stale_artifacts};
pub use compose::{ComposedLabel, LabelComposer, LabelLayout};
pub use font::{CaptionFont, FontResolver};
pub use pdf::LabelPdfWriter;
pub use pipeline::{LabelGenerator, RenderedLabel};
