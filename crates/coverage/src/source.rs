//! Catalog source resolution: seed file, local cache, then network.
//!
//! Both catalogs resolve the same way: an explicitly seeded copy is always
//! preferred, then a previously written cache of the parsed form, and only
//! then a blocking network fetch (which refreshes the cache). A fetch
//! failure with no usable seed or cache is an error for that call only;
//! callers may proceed with an empty catalog.

use std::{
    fs::{create_dir_all, read_to_string, rename, write},
    io,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};

use crate::{
    Progress,
    catalog::{FontCoverage, parse_catalog},
    classes::{UnicodeClass, parse_classes},
    error::{Error, Result},
};

/// Upstream Unicode class definition source.
pub const DEFAULT_CLASSES_URL: &str =
    "https://mirrors.ctan.org/macros/unicodetex/latex/ucharclasses/ucharclasses.sty";

/// Upstream font coverage catalog.
pub const DEFAULT_CATALOG_URL: &str =
    "https://notofonts.github.io/noto.json";

/// Where a catalog comes from and where its parsed form is cached.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    /// Explicit local copy of the raw upstream file; always preferred.
    pub seed: Option<PathBuf>,
    /// Cache file for the parsed form.
    pub cache: PathBuf,
    /// Upstream URL, fetched only when neither seed nor cache is usable.
    pub url: String,
}

impl CatalogSource {
    fn fetch_raw(&self) -> Result<String> {
        info!("fetching {}", self.url);
        let response = reqwest::blocking::get(&self.url).map_err(|source| Error::Fetch {
            url: self.url.clone(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http { url: self.url.clone(), status });
        }
        response.text().map_err(|source| Error::Fetch {
            url: self.url.clone(),
            source,
        })
    }

    fn read_seed(&self) -> Option<Result<String>> {
        let path = self.seed.as_ref()?;
        if !path.exists() {
            warn!("seed file {} does not exist, ignoring", path.display());
            return None;
        }
        Some(read_to_string(path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        }))
    }
}

/// Parse the Unicode class catalog from its source.
///
/// Resolution order: seed -> cache -> network (caching the result).
pub fn build_classes(
    source: &CatalogSource,
    progress: Option<Progress<'_>>,
) -> Result<Vec<UnicodeClass>> {
    if let Some(raw) = source.read_seed() {
        return parse_classes(&raw?, progress);
    }
    if let Some(cached) = load_cache::<Vec<UnicodeClass>>(&source.cache) {
        return Ok(cached);
    }
    let raw = source.fetch_raw()?;
    let classes = parse_classes(&raw, progress)?;
    store_cache(&source.cache, &classes);
    Ok(classes)
}

/// Parse the font coverage catalog from its source.
///
/// Resolution order: seed -> cache -> network (caching the result).
pub fn build_font_catalog(
    source: &CatalogSource,
    progress: Option<Progress<'_>>,
) -> Result<Vec<FontCoverage>> {
    if let Some(raw) = source.read_seed() {
        return parse_catalog(&raw?, progress);
    }
    if let Some(cached) = load_cache::<Vec<FontCoverage>>(&source.cache) {
        return Ok(cached);
    }
    let raw = source.fetch_raw()?;
    let catalog = parse_catalog(&raw, progress)?;
    store_cache(&source.cache, &catalog);
    Ok(catalog)
}

fn load_cache<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            // A corrupt cache is the same as no cache.
            debug!("discarding corrupt cache {}: {e}", path.display());
            None
        }
    }
}

fn store_cache<T: serde::Serialize>(path: &Path, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(io::Error::other)
        .and_then(|json| write_atomic(path, json.as_bytes()));
    if let Err(e) = result {
        warn!("failed to write cache {}: {e}", path.display());
    }
}

/// Write-then-rename so readers never observe a partial file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    write(&tmp, contents)?;
    rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_in(dir: &Path) -> CatalogSource {
        CatalogSource {
            seed: None,
            cache: dir.join("unicode-classes.json"),
            url: "http://127.0.0.1:1/unreachable".to_string(),
        }
    }

    #[test]
    fn test_seed_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.sty");
        write(&seed, "\\DeclareUnicodeClass{Arabic}{\"0600}{\"06FF}\n").unwrap();

        let mut source = source_in(dir.path());
        source.seed = Some(seed);
        let classes = build_classes(&source, None).unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "Arabic");
    }

    #[test]
    fn test_cache_used_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path());
        let cached = vec![UnicodeClass {
            name: "Hebrew".into(),
            start: 0x0590,
            end: 0x05FF,
            group: None,
        }];
        write_atomic(&source.cache, serde_json::to_string(&cached).unwrap().as_bytes()).unwrap();

        let classes = build_classes(&source, None).unwrap();
        assert_eq!(classes, cached);
    }

    #[test]
    fn test_corrupt_cache_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path());
        write(&source.cache, b"{not json").unwrap();

        // Corrupt cache plus unreachable network is a fetch error, not a
        // parse error surfaced from the cache.
        assert!(matches!(build_classes(&source, None), Err(Error::Fetch { .. })));
    }

    #[test]
    fn test_missing_everything_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = source_in(dir.path());
        assert!(build_classes(&source, None).is_err());
    }

    #[test]
    fn test_write_atomic_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("file.json");
        write_atomic(&path, b"one").unwrap();
        write_atomic(&path, b"two").unwrap();
        assert_eq!(read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_progress_reported() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.sty");
        write(&seed, "\\DeclareUnicodeClass{Arabic}{\"0600}{\"06FF}\n%\n%\n").unwrap();
        let mut source = source_in(dir.path());
        source.seed = Some(seed);

        let seen = std::cell::Cell::new(0usize);
        let report = |done: usize, _total: usize| seen.set(seen.get().max(done));
        build_classes(&source, Some(&report)).unwrap();
        assert!(seen.get() >= 3);
    }
}
