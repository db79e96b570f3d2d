// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output artifacts — naming, staged writes with atomic finalization, and the
// sweep that clears artifacts left over from previous days.
//
// Print dispatch picks documents up by name (`label_<id>.pdf`), so a file
// with that name must only ever appear complete. Every artifact is written
// to a hidden temporary file in the target directory and renamed into place
// once all artifacts of the label are ready.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use labelpress_core::TrackingIdentifier;
use labelpress_core::error::{LabelError, Result};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

const STAGING_PREFIX: &str = ".labelpress-";
const STAGING_SUFFIX: &str = ".part";

/// Final artifact name of the composed raster.
pub fn png_name(identifier: &TrackingIdentifier) -> String {
    format!("label_{identifier}.png")
}

/// Final artifact name of the print document.
pub fn pdf_name(identifier: &TrackingIdentifier) -> String {
    format!("label_{identifier}.pdf")
}

/// Paths of a finalized label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelArtifacts {
    pub png_path: PathBuf,
    pub pdf_path: PathBuf,
}

impl LabelArtifacts {
    pub fn for_identifier(dir: &Path, identifier: &TrackingIdentifier) -> Self {
        Self {
            png_path: dir.join(png_name(identifier)),
            pdf_path: dir.join(pdf_name(identifier)),
        }
    }
}

/// Bytes written to a temporary file next to their final path.
///
/// Dropping a staged artifact without calling [`StagedArtifact::persist`]
/// deletes the temporary file.
#[derive(Debug)]
pub struct StagedArtifact {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedArtifact {
    /// Write `bytes` to a temporary file in `target`'s directory.
    pub fn write(target: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self> {
        let target = target.into();
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&dir)
            .map_err(|err| export_error("create staging file in", &dir, &err))?;
        temp.write_all(bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|err| export_error("write staging file for", &target, &err))?;

        debug!(
            staging = %temp.path().display(),
            target = %target.display(),
            bytes = bytes.len(),
            "Artifact staged"
        );
        Ok(Self { temp, target })
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically rename into place, replacing any previous file.
    pub fn persist(self) -> Result<PathBuf> {
        let Self { temp, target } = self;
        temp.persist(&target)
            .map_err(|err| export_error("finalize", &target, &err.error))?;
        Ok(target)
    }
}

/// Finalize the raster and the document together. If the document cannot be
/// finalized, the already finalized raster is removed again.
pub fn finalize_label(png: StagedArtifact, pdf: StagedArtifact) -> Result<LabelArtifacts> {
    let png_path = png.persist()?;
    match pdf.persist() {
        Ok(pdf_path) => Ok(LabelArtifacts { png_path, pdf_path }),
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&png_path) {
                warn!(path = %png_path.display(), %cleanup, "Failed to roll back label image");
            }
            Err(err)
        }
    }
}

/// Remove previously finalized files at `paths`, so a failed regeneration
/// cannot leave an outdated label to be printed. Missing files are fine;
/// anything else is logged.
pub fn discard_label(paths: &LabelArtifacts) {
    for path in [&paths.png_path, &paths.pdf_path] {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Outdated label artifact removed"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %path.display(), %err, "Failed to remove outdated label artifact")
            }
        }
    }
}

fn export_error(action: &str, path: &Path, err: &std::io::Error) -> LabelError {
    LabelError::Export(format!("{action} {}: {err}", path.display()))
}

/// Label outputs plus legacy `barcode_<id>.png` intermediates.
fn is_label_artifact(name: &str) -> bool {
    (name.starts_with("label_") && (name.ends_with(".png") || name.ends_with(".pdf")))
        || (name.starts_with("barcode_") && name.ends_with(".png"))
}

/// Delete label artifacts in `dir` last modified on a day other than `today`.
///
/// Files that cannot be inspected or removed are logged and skipped. Returns
/// the number of files deleted.
#[instrument(skip_all, fields(dir = %dir.as_ref().display(), %today))]
pub fn sweep_stale_artifacts(dir: impl AsRef<Path>, today: NaiveDate) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(dir.as_ref())? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "Unreadable directory entry skipped");
                continue;
            }
        };
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !is_label_artifact(name) {
            continue;
        }

        let path = entry.path();
        let modified = match entry.metadata().and_then(|meta| meta.modified()) {
            Ok(time) => DateTime::<Local>::from(time).date_naive(),
            Err(err) => {
                warn!(path = %path.display(), %err, "Cannot read modification time");
                continue;
            }
        };
        if modified == today {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), %modified, "Stale artifact removed");
                removed += 1;
            }
            Err(err) => warn!(path = %path.display(), %err, "Failed to remove stale artifact"),
        }
    }

    if removed > 0 {
        info!(removed, "Stale label artifacts swept");
    } else {
        debug!("No stale label artifacts");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn id(raw: &str) -> TrackingIdentifier {
        TrackingIdentifier::parse(raw).unwrap()
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn names_follow_identifier() {
        let ident = id("123456789012");
        assert_eq!(png_name(&ident), "label_123456789012.png");
        assert_eq!(pdf_name(&ident), "label_123456789012.pdf");

        let paths = LabelArtifacts::for_identifier(Path::new("/out"), &ident);
        assert_eq!(paths.pdf_path, PathBuf::from("/out/label_123456789012.pdf"));
    }

    #[test]
    fn staged_file_is_invisible_until_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("label_1.pdf");
        let staged = StagedArtifact::write(&target, b"%PDF-1.7").unwrap();

        assert!(!target.exists());
        let names = listing(dir.path());
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with(STAGING_PREFIX) && names[0].ends_with(STAGING_SUFFIX));

        let path = staged.persist().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7");
        assert_eq!(listing(dir.path()), vec!["label_1.pdf".to_string()]);
    }

    #[test]
    fn dropped_stage_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagedArtifact::write(dir.path().join("label_2.png"), b"png").unwrap();
        drop(staged);
        assert!(listing(dir.path()).is_empty());
    }

    #[test]
    fn persist_replaces_previous_label() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("label_3.png");
        fs::write(&target, b"old").unwrap();
        StagedArtifact::write(&target, b"new").unwrap().persist().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn staging_into_missing_directory_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = StagedArtifact::write(dir.path().join("missing/label_4.png"), b"x");
        assert!(matches!(result, Err(LabelError::Export(_))));
    }

    #[test]
    fn failed_document_rolls_back_image() {
        let dir = tempfile::tempdir().unwrap();
        let paths = LabelArtifacts::for_identifier(dir.path(), &id("77"));
        let png = StagedArtifact::write(&paths.png_path, b"png").unwrap();
        let pdf = StagedArtifact::write(&paths.pdf_path, b"pdf").unwrap();

        // A directory squatting on the document name makes the rename fail.
        fs::create_dir(&paths.pdf_path).unwrap();
        fs::write(paths.pdf_path.join("keep"), b"x").unwrap();

        let result = finalize_label(png, pdf);
        assert!(matches!(result, Err(LabelError::Export(_))));
        assert!(!paths.png_path.exists());
        assert!(paths.pdf_path.is_dir());
        assert!(
            listing(dir.path()).iter().all(|n| !n.starts_with(STAGING_PREFIX)),
            "staging files must be cleaned up"
        );
    }

    #[test]
    fn discard_removes_existing_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let paths = LabelArtifacts::for_identifier(dir.path(), &id("88"));
        fs::write(&paths.pdf_path, b"old").unwrap();
        fs::write(dir.path().join("label_89.pdf"), b"other").unwrap();

        discard_label(&paths);
        assert_eq!(listing(dir.path()), vec!["label_89.pdf".to_string()]);

        // Nothing left to remove.
        discard_label(&paths);
    }

    #[test]
    fn artifact_name_matching() {
        assert!(is_label_artifact("label_123.png"));
        assert!(is_label_artifact("label_123.pdf"));
        assert!(is_label_artifact("barcode_123.png"));
        assert!(!is_label_artifact("barcode_123.pdf"));
        assert!(!is_label_artifact("labelpress.json"));
        assert!(!is_label_artifact(".labelpress-abc.part"));
    }

    #[test]
    fn sweep_removes_only_old_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let old = SystemTime::now() - Duration::from_secs(3 * 24 * 60 * 60);

        for name in ["label_1.png", "label_1.pdf", "barcode_1.png", "notes.txt"] {
            let path = dir.path().join(name);
            fs::write(&path, b"x").unwrap();
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(old)
                .unwrap();
        }
        fs::write(dir.path().join("label_2.pdf"), b"fresh").unwrap();

        let today = Local::now().date_naive();
        let removed = sweep_stale_artifacts(dir.path(), today).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(
            listing(dir.path()),
            vec!["label_2.pdf".to_string(), "notes.txt".to_string()]
        );
    }

    #[test]
    fn sweep_of_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = sweep_stale_artifacts(dir.path().join("nope"), Local::now().date_naive());
        assert!(matches!(result, Err(LabelError::Io(_))));
    }
}
