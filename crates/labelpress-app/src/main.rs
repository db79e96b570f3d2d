// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Labelpress — scan-to-label station.
//
// Entry point. Initialises logging, loads the station configuration, and
// dispatches the requested command.

mod commands;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use commands::{CommandLine, Commands};
use labelpress_barcode::SymbolEncoder;
use labelpress_core::operator_errors::describe;
use labelpress_core::{LabelConfig, LabelError, LabelFormat, LabelSpec};
use labelpress_document::{FontResolver, LabelGenerator, sweep_stale_artifacts};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CommandLine::parse_args();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: CommandLine) -> anyhow::Result<()> {
    let config = LabelConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    match args.command {
        Commands::Generate {
            identifier,
            format,
            output,
            sweep,
            no_sweep,
        } => {
            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            if commands::sweep_requested(sweep, no_sweep, config.sweep_stale_on_start) {
                sweep_dir(&output_dir)?;
            }

            let mut spec = config.spec.clone();
            if let Some(format) = format {
                spec.format = format;
            }

            let mut generator = LabelGenerator::new(spec, &output_dir)?;
            if !config.font_candidates.is_empty() {
                generator =
                    generator.with_fonts(Arc::new(FontResolver::new(config.font_candidates.clone())));
            }

            // Scanners commonly terminate with CR/LF.
            let artifacts = generator.generate(identifier.trim())?;
            println!("{}", artifacts.png_path.display());
            println!("{}", artifacts.pdf_path.display());
            Ok(())
        }
        Commands::Encode { identifier } => {
            let sequence = SymbolEncoder::encode_str(identifier.trim())?;
            let codes: Vec<String> = sequence.values().iter().map(u8::to_string).collect();
            println!("{}", codes.join(" "));
            Ok(())
        }
        Commands::Sweep { output } => {
            let output_dir = output.unwrap_or(config.output_dir);
            let removed = sweep_dir(&output_dir)?;
            println!("removed {removed} stale artifact(s)");
            Ok(())
        }
        Commands::Formats => {
            for format in LabelFormat::ALL {
                let spec = LabelSpec {
                    format,
                    ..config.spec.clone()
                };
                let (w, h) = spec.label_size_px();
                println!("{format:<8} {w}x{h} px at {} dpi", spec.dpi);
            }
            Ok(())
        }
    }
}

fn sweep_dir(dir: &Path) -> anyhow::Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }
    let removed = sweep_stale_artifacts(dir, Local::now().date_naive())?;
    Ok(removed)
}

/// Print the operator message for a Labelpress error, or the raw chain for
/// anything else.
fn report(err: &anyhow::Error) {
    tracing::error!("{err:#}");
    match err.downcast_ref::<LabelError>() {
        Some(label_err) => {
            let msg = describe(label_err);
            eprintln!("{}", msg.message);
            eprintln!("{}", msg.suggestion);
        }
        None => eprintln!("{err:#}"),
    }
}
