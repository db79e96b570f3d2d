// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::LabelSpec;

/// Settings for a label station. Read-only: Labelpress never writes it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Label layout and stock.
    pub spec: LabelSpec,
    /// Directory that receives `label_<id>.png` / `label_<id>.pdf`.
    pub output_dir: PathBuf,
    /// Caption font files tried in order. Empty means platform defaults.
    pub font_candidates: Vec<PathBuf>,
    /// Remove artifacts from previous days when the station starts.
    pub sweep_stale_on_start: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            spec: LabelSpec::default(),
            output_dir: PathBuf::from("."),
            font_candidates: Vec::new(),
            sweep_stale_on_start: true,
        }
    }
}

impl LabelConfig {
    /// Load from a JSON file. A missing file yields the defaults; a file that
    /// exists but does not parse or validate is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.spec.validate()?;

        info!(
            path = %path.display(),
            format = %config.spec.format,
            output_dir = %config.output_dir.display(),
            "Loaded label configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LabelError;
    use crate::types::LabelFormat;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = LabelConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, LabelConfig::default());
    }

    #[test]
    fn partial_file_merges_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelpress.json");
        std::fs::write(
            &path,
            r#"{ "spec": { "format": "100x70" }, "output_dir": "/srv/labels" }"#,
        )
        .unwrap();

        let config = LabelConfig::load(&path).unwrap();
        assert_eq!(config.spec.format, LabelFormat::Size100x70);
        assert_eq!(config.spec.font_size_pt, 20.0);
        assert_eq!(config.output_dir, PathBuf::from("/srv/labels"));
        assert!(config.sweep_stale_on_start);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ spec: ").unwrap();
        assert!(matches!(
            LabelConfig::load(&path),
            Err(LabelError::Serialization(_))
        ));
    }

    #[test]
    fn invalid_spec_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "spec": { "dpi": 0 } }"#).unwrap();
        assert!(matches!(
            LabelConfig::load(&path),
            Err(LabelError::InvalidSpec(_))
        ));
    }
}
