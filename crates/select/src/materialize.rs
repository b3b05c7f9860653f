//! Materializing concrete font files: local copy, direct download, or
//! archive extraction, degrading to an artifact marker instead of failing.

use std::{
    fs,
    io::{Cursor, Read},
    path::Path,
};

use log::{debug, warn};
use read_fonts::FileRef;

use fontfall_coverage::{FontCoverage, write_atomic};

use crate::{
    error::LocateError,
    locate::{FontStyle, Locator, ResolvedFontFile},
};

/// Result of walking a materialization fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// A concrete file landed in the destination directory. The warning is
    /// set when a substitute family stood in for the requested one.
    File {
        file: ResolvedFontFile,
        warning: Option<String>,
    },
    /// Nothing could be materialized; render with artifact markers.
    Artifact { family: String, warning: String },
}

impl Locator {
    /// Materialize one family/style into the destination directory.
    ///
    /// Tries, in order: a previously materialized copy, a locally located
    /// file, then the network (direct URL or archive member). Bytes fetched
    /// over the network must parse as a font.
    pub fn materialize(
        &self,
        coverage: &FontCoverage,
        style: FontStyle,
        dest_dir: &Path,
    ) -> Result<ResolvedFontFile, LocateError> {
        let suffix = style.suffix(&coverage.styles).unwrap_or(&coverage.styles.regular).to_string();
        let file_name = coverage.file_name(&suffix);
        let dest = dest_dir.join(&file_name);
        let resolved = |path| ResolvedFontFile { family: coverage.family.clone(), style, path };

        if dest.is_file() {
            return Ok(resolved(dest));
        }

        if style == FontStyle::Regular
            && let Some(found) = self.locate(&coverage.family)
        {
            copy_into(&found.path, &dest)?;
            return Ok(resolved(dest));
        }

        let (bytes, fetched) = if let Some(archive) = &coverage.archive {
            let (data, fetched) = read_source(archive)?;
            (extract_member(archive, &data, &file_name)?, fetched)
        } else if is_url(&coverage.dir_base) {
            let url = format!("{}/{}", coverage.dir_base.trim_end_matches('/'), file_name);
            read_source(&url)?
        } else {
            let src = Path::new(&coverage.dir_base).join(&file_name);
            let data = fs::read(&src)
                .map_err(|source| LocateError::Io { path: src.clone(), source })?;
            (data, false)
        };

        // Files the user pointed at locally are trusted; downloads are not.
        if fetched && FileRef::new(&bytes).is_err() {
            return Err(LocateError::InvalidFont { family: coverage.family.clone() });
        }

        write_atomic(&dest, &bytes)
            .map_err(|source| LocateError::Io { path: dest.clone(), source })?;
        Ok(resolved(dest))
    }

    /// Walk an ordered fallback chain (requested family first, substitutes
    /// after) and degrade to an artifact marker when everything fails. A
    /// single warning covers the whole chain.
    pub fn materialize_chain(
        &self,
        chain: &[&FontCoverage],
        style: FontStyle,
        dest_dir: &Path,
    ) -> Materialized {
        let mut attempts: Vec<String> = Vec::new();
        for candidate in chain {
            match self.materialize(candidate, style, dest_dir) {
                Ok(file) => {
                    let warning = if attempts.is_empty() {
                        None
                    } else {
                        let message = format!(
                            "substituted '{}' for '{}' ({})",
                            candidate.family,
                            chain[0].family,
                            attempts.join("; ")
                        );
                        warn!("{message}");
                        Some(message)
                    };
                    return Materialized::File { file, warning };
                }
                Err(e) => {
                    debug!("materialize {} failed: {e}", candidate.family);
                    attempts.push(format!("{}: {e}", candidate.family));
                }
            }
        }

        let family = chain.first().map(|c| c.family.clone()).unwrap_or_default();
        let mode = if family.contains("Emoji") {
            "falling back to monochrome artifact rendering"
        } else {
            "affected characters are left uncovered"
        };
        let warning = format!(
            "could not materialize '{family}' ({}); {mode}",
            attempts.join("; ")
        );
        warn!("{warning}");
        Materialized::Artifact { family, warning }
    }
}

fn is_url(base: &str) -> bool {
    base.starts_with("http://") || base.starts_with("https://")
}

/// Read bytes from a URL or a local path; the flag reports a network fetch.
fn read_source(source: &str) -> Result<(Vec<u8>, bool), LocateError> {
    if !is_url(source) {
        let path = Path::new(source);
        let data =
            fs::read(path).map_err(|e| LocateError::Io { path: path.to_path_buf(), source: e })?;
        return Ok((data, false));
    }
    debug!("downloading {source}");
    let response = reqwest::blocking::get(source).map_err(|e| LocateError::Download {
        url: source.to_string(),
        source: e,
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(LocateError::Http { url: source.to_string(), status });
    }
    let bytes = response.bytes().map_err(|e| LocateError::Download {
        url: source.to_string(),
        source: e,
    })?;
    Ok((bytes.to_vec(), true))
}

/// Pull one member out of a ZIP archive, probing alternates: exact path,
/// then a path suffix match, then a case-insensitive base name.
fn extract_member(url: &str, data: &[u8], wanted: &str) -> Result<Vec<u8>, LocateError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).map_err(|e| {
        LocateError::Archive { url: url.to_string(), message: e.to_string() }
    })?;

    let names: Vec<String> = archive.file_names().map(String::from).collect();
    let base_name = |path: &str| path.rsplit('/').next().unwrap_or(path).to_string();
    let chosen = names
        .iter()
        .find(|n| *n == wanted)
        .or_else(|| names.iter().find(|n| n.ends_with(&format!("/{wanted}"))))
        .or_else(|| names.iter().find(|n| base_name(n).eq_ignore_ascii_case(wanted)))
        .cloned()
        .ok_or_else(|| LocateError::MemberNotFound {
            url: url.to_string(),
            member: wanted.to_string(),
        })?;

    let mut member = archive.by_name(&chosen).map_err(|e| LocateError::Archive {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    let mut buffer = Vec::new();
    member.read_to_end(&mut buffer).map_err(|e| LocateError::Archive {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    Ok(buffer)
}

fn copy_into(src: &Path, dest: &Path) -> Result<(), LocateError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| LocateError::Io { path: parent.to_path_buf(), source })?;
    }
    fs::copy(src, dest)
        .map_err(|source| LocateError::Io { path: dest.to_path_buf(), source })?;
    Ok(())
}
