// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use labelpress_core::LabelFormat;

#[derive(Parser)]
#[command(name = "labelpress")]
#[command(about = "Turn a tracking number into a print-ready Code 128 label.")]
pub struct CommandLine {
    /// JSON configuration file
    #[arg(long, global = true, default_value = "labelpress.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate label_<id>.png and label_<id>.pdf
    #[command(alias = "g")]
    Generate {
        identifier: String,
        /// Label stock: 100x100, 100x70 or 100x150
        #[arg(long)]
        format: Option<LabelFormat>,
        /// Output directory (overrides the configuration)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Remove artifacts from previous days first (default from the configuration)
        #[arg(long, overrides_with = "no_sweep")]
        sweep: bool,
        /// Skip the stale-artifact sweep even if the configuration enables it
        #[arg(long, overrides_with = "sweep")]
        no_sweep: bool,
    },
    /// Print the encoded symbol codes for an identifier
    #[command(alias = "e")]
    Encode { identifier: String },
    /// Remove label artifacts not modified today
    Sweep {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List supported label formats
    Formats,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Resolve `--sweep` / `--no-sweep` against the configured default.
pub fn sweep_requested(sweep: bool, no_sweep: bool, configured: bool) -> bool {
    if sweep {
        true
    } else if no_sweep {
        false
    } else {
        configured
    }
}
