// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font resolver — walks an ordered list of font files and returns the first
// that loads, falling back to the compiled-in bitmap face. Resolution never
// fails, so a station without any system fonts still prints captions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use ab_glyph::{Font, FontArc, FontVec, PxScale};
use labelpress_core::error::{LabelError, Result};
use tracing::{debug, info, warn};

use super::{BitmapFont, CaptionFont};

static GLOBAL: LazyLock<Arc<FontResolver>> =
    LazyLock::new(|| Arc::new(FontResolver::new(default_candidates())));

/// Platform font files worth trying for a caption, most preferred first.
pub fn default_candidates() -> Vec<PathBuf> {
    let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
    let windows_fonts = Path::new(&windir).join("Fonts");

    let mut candidates: Vec<PathBuf> = ["msyh.ttc", "msyh.ttf", "SimHei.ttf", "arial.ttf"]
        .iter()
        .map(|name| windows_fonts.join(name))
        .collect();

    candidates.extend(
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
        .into_iter()
        .map(PathBuf::from),
    );
    candidates
}

/// Ordered font candidates plus a per-pixel-size cache of what resolved.
pub struct FontResolver {
    candidates: Vec<PathBuf>,
    cache: Mutex<HashMap<u32, CaptionFont>>,
}

impl FontResolver {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// A resolver that always hands out the bitmap face.
    pub fn builtin_only() -> Self {
        Self::new(Vec::new())
    }

    /// Process-wide resolver over [`default_candidates`].
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Font for an em size of `pixel_size` pixels.
    ///
    /// Returns the first candidate that loads, otherwise the bitmap face.
    /// The result is cached for the lifetime of the resolver.
    pub fn resolve(&self, pixel_size: u32) -> CaptionFont {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(font) = cache.get(&pixel_size) {
            return font.clone();
        }

        let font = self.load_first(pixel_size);
        cache.insert(pixel_size, font.clone());
        font
    }

    pub fn is_cached(&self, pixel_size: u32) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&pixel_size)
    }

    fn load_first(&self, pixel_size: u32) -> CaptionFont {
        for path in &self.candidates {
            match load_outline(path, pixel_size) {
                Ok(font) => {
                    info!(path = %path.display(), pixel_size, "Caption font resolved");
                    return font;
                }
                Err(err) => debug!(path = %path.display(), %err, "Font candidate skipped"),
            }
        }

        if !self.candidates.is_empty() {
            warn!(
                tried = self.candidates.len(),
                pixel_size, "No caption font candidate loaded, using built-in bitmap face"
            );
        }
        CaptionFont::Builtin(BitmapFont::for_pixel_size(pixel_size))
    }
}

/// Load face 0 of a TrueType/OpenType file or collection.
fn load_outline(path: &Path, pixel_size: u32) -> Result<CaptionFont> {
    let data = std::fs::read(path)?;
    let font = FontVec::try_from_vec_and_index(data, 0).map_err(|err| {
        LabelError::Render(format!("failed to parse font {}: {}", path.display(), err))
    })?;

    // ab_glyph scales by line height; convert the em size to that.
    let units_per_em = font.units_per_em().unwrap_or(1000.0);
    let height = pixel_size as f32 * font.height_unscaled() / units_per_em;

    Ok(CaptionFont::Outline {
        font: FontArc::new(font),
        scale: PxScale::from(height),
        source: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_candidates_fall_back_to_builtin() {
        let resolver = FontResolver::new(vec![
            PathBuf::from("/nonexistent/labelpress/font.ttf"),
            PathBuf::from("/nonexistent/labelpress/font.ttc"),
        ]);
        let font = resolver.resolve(83);
        assert!(font.is_builtin());
    }

    #[test]
    fn unparsable_font_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"definitely not a font").unwrap();

        assert!(matches!(
            load_outline(&bogus, 40),
            Err(LabelError::Render(_))
        ));
        let resolver = FontResolver::new(vec![bogus]);
        assert!(resolver.resolve(40).is_builtin());
    }

    #[test]
    fn resolved_fonts_are_cached_per_size() {
        let resolver = FontResolver::builtin_only();
        assert!(!resolver.is_cached(83));
        let first = resolver.resolve(83);
        assert!(resolver.is_cached(83));
        assert!(!resolver.is_cached(40));

        let second = resolver.resolve(83);
        assert_eq!(
            first.measure("123").unwrap(),
            second.measure("123").unwrap()
        );
    }

    #[test]
    fn default_candidates_prefer_windows_fonts() {
        let candidates = default_candidates();
        assert!(candidates[0].ends_with("msyh.ttc"));
        assert!(candidates.iter().any(|p| p.ends_with("DejaVuSans.ttf")));
    }

    #[test]
    fn global_resolver_always_yields_a_font() {
        let font = FontResolver::global().resolve(83);
        let (w, h) = font.measure("0123456789").unwrap();
        assert!(w > 0 && h > 0);
    }
}
