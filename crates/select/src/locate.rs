//! Locating font files: declarative index, cache directory, local TeX
//! installation.

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    process::Command,
};

use glob::glob;
use log::debug;
use serde::Deserialize;

use fontfall_coverage::FontStyles;

use crate::error::LocateError;

/// Style of a concrete font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    /// File-name suffix for this style in a family, when the cut exists.
    pub fn suffix<'a>(self, styles: &'a FontStyles) -> Option<&'a str> {
        match self {
            Self::Regular => Some(&styles.regular),
            Self::Bold => styles.bold.as_deref(),
            Self::Italic => styles.italic.as_deref(),
            Self::BoldItalic => styles.bold_italic.as_deref(),
        }
    }
}

/// A concrete font file owned by the locator's cache; documents reference
/// copies under their own build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFontFile {
    pub family: String,
    pub style: FontStyle,
    pub path: PathBuf,
}

/// One family of the declarative font index: explicit files plus the
/// Unicode ranges they cover.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarativeEntry {
    pub family: String,
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub ranges: Vec<String>,
}

/// A user-supplied font index overriding the built-in catalog lookup.
#[derive(Debug, Clone, Default)]
pub struct DeclarativeIndex {
    entries: Vec<DeclarativeEntry>,
}

impl DeclarativeIndex {
    /// Load the index from a JSON file (array of entries).
    pub fn load(path: &Path) -> Result<Self, LocateError> {
        let raw = read_to_string(path).map_err(|source| LocateError::IndexIo {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = serde_json::from_str(&raw).map_err(|source| LocateError::IndexFormat {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { entries })
    }

    pub fn find(&self, family: &str) -> Option<&DeclarativeEntry> {
        self.entries.iter().find(|e| e.family == family)
    }
}

/// Resolves font families to concrete files.
#[derive(Debug, Default)]
pub struct Locator {
    declarative: Option<DeclarativeIndex>,
    skip_local: bool,
    cache_dir: PathBuf,
}

impl Locator {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            declarative: None,
            skip_local: false,
            cache_dir: cache_dir.into(),
        }
    }

    /// Use a declarative font index, consulted before anything else.
    pub fn with_font_index(self, path: &Path) -> Result<Self, LocateError> {
        Ok(self.with_declarative(DeclarativeIndex::load(path)?))
    }

    /// As [`Locator::with_font_index`], from an already loaded index.
    pub fn with_declarative(mut self, index: DeclarativeIndex) -> Self {
        self.declarative = Some(index);
        self
    }

    /// Skip the locally installed TeX file-finder. Useful for
    /// deterministic tests.
    pub fn skip_local_fonts(mut self, skip: bool) -> Self {
        self.skip_local = skip;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Find a family without touching the network: declarative index,
    /// then the cache directory, then the TeX installation.
    pub fn locate(&self, family: &str) -> Option<ResolvedFontFile> {
        if let Some(index) = &self.declarative
            && let Some(entry) = index.find(family)
        {
            if let Some(path) = entry.files.iter().find(|f| f.exists()) {
                return Some(ResolvedFontFile {
                    family: family.to_string(),
                    style: FontStyle::Regular,
                    path: path.clone(),
                });
            }
            debug!("font index names {family} but no listed file exists");
        }

        let compact = family.replace(' ', "");
        if let Some(path) = self.glob_cache(&compact) {
            return Some(ResolvedFontFile {
                family: family.to_string(),
                style: FontStyle::Regular,
                path,
            });
        }

        if !self.skip_local {
            for name in [
                format!("{compact}-Regular.ttf"),
                format!("{compact}-Regular.otf"),
                format!("{compact}.ttf"),
                format!("{compact}.otf"),
            ] {
                if let Some(path) = kpsewhich(&name) {
                    return Some(ResolvedFontFile {
                        family: family.to_string(),
                        style: FontStyle::Regular,
                        path,
                    });
                }
            }
        }

        None
    }

    fn glob_cache(&self, compact: &str) -> Option<PathBuf> {
        let pattern = self.cache_dir.join(format!("{compact}*.*"));
        let pattern = pattern.to_str()?;
        glob(pattern)
            .ok()?
            .filter_map(Result::ok)
            .find(|p| p.is_file())
    }
}

/// Ask the local TeX installation for a file.
fn kpsewhich(name: &str) -> Option<PathBuf> {
    let output = match Command::new("kpsewhich").arg(name).output() {
        Ok(output) => output,
        Err(e) => {
            debug!("kpsewhich unavailable: {e}");
            return None;
        }
    };
    if !output.status.success() {
        return None;
    }
    let path = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    if path.as_os_str().is_empty() || !path.exists() {
        return None;
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;

    #[test]
    fn test_declarative_index_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("MyFont-Regular.ttf");
        write(&font, b"not really a font").unwrap();

        let index_path = dir.path().join("fonts.json");
        let json = serde_json::json!([{
            "family": "My Font",
            "files": [font],
            "ranges": ["0600-06FF"],
        }]);
        write(&index_path, serde_json::to_vec(&json).unwrap()).unwrap();

        let locator = Locator::new(dir.path().join("cache"))
            .with_font_index(&index_path)
            .unwrap()
            .skip_local_fonts(true);

        let resolved = locator.locate("My Font").unwrap();
        assert_eq!(resolved.path, font);
        assert_eq!(resolved.style, FontStyle::Regular);
        assert!(locator.locate("Other Font").is_none());
    }

    #[test]
    fn test_cache_dir_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("NotoKufiArabic-Regular.ttf");
        write(&font, b"bytes").unwrap();

        let locator = Locator::new(dir.path()).skip_local_fonts(true);
        let resolved = locator.locate("Noto Kufi Arabic").unwrap();
        assert_eq!(resolved.path, font);
    }

    #[test]
    fn test_missing_family() {
        let dir = tempfile::tempdir().unwrap();
        let locator = Locator::new(dir.path()).skip_local_fonts(true);
        assert!(locator.locate("Nonexistent Family").is_none());
    }

    #[test]
    fn test_bad_index_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("fonts.json");
        write(&index_path, b"[{broken").unwrap();
        let result = Locator::new(dir.path()).with_font_index(&index_path);
        assert!(matches!(result, Err(LocateError::IndexFormat { .. })));
    }

    #[test]
    fn test_style_suffix() {
        let styles = FontStyles {
            regular: "Regular".into(),
            bold: Some("Bold".into()),
            italic: None,
            bold_italic: None,
        };
        assert_eq!(FontStyle::Regular.suffix(&styles), Some("Regular"));
        assert_eq!(FontStyle::Bold.suffix(&styles), Some("Bold"));
        assert_eq!(FontStyle::Italic.suffix(&styles), None);
    }
}
