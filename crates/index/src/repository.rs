//! On-disk persistence for the fallback index.
//!
//! The repository never partially trusts a cache: a signature mismatch, a
//! missing file and a corrupt file are all the same condition (rebuild),
//! and none of them surface as errors.

use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use fontfall_coverage::write_atomic;

use crate::index::{FallbackEntry, FallbackIndex};

/// Serialized form of the index. The embedded signature makes staleness
/// self-describing.
#[derive(Serialize, Deserialize)]
struct IndexFile {
    signature: String,
    built_at: String,
    entries: Vec<FallbackEntry>,
}

/// Loads and saves the fallback index under a content signature.
#[derive(Debug, Clone)]
pub struct IndexRepository {
    path: PathBuf,
}

impl IndexRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index if its stored signature matches the expected one.
    pub fn load(&self, expected_signature: &str) -> Option<FallbackIndex> {
        let raw = read_to_string(&self.path).ok()?;
        let file: IndexFile = match serde_json::from_str(&raw) {
            Ok(file) => file,
            Err(e) => {
                debug!("discarding corrupt index {}: {e}", self.path.display());
                return None;
            }
        };
        if file.signature != expected_signature {
            debug!(
                "discarding stale index {} (signature {} != {})",
                self.path.display(),
                file.signature,
                expected_signature
            );
            return None;
        }
        Some(FallbackIndex::new(file.entries))
    }

    /// Persist the index under the signature, write-then-rename.
    pub fn save(&self, index: &FallbackIndex, signature: &str) -> Result<()> {
        let file = IndexFile {
            signature: signature.to_string(),
            built_at: chrono::Utc::now().to_rfc3339(),
            entries: index.entries().to_vec(),
        };
        let json = serde_json::to_string(&file)?;
        write_atomic(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to write index {}", self.path.display()))
    }

    /// Load a current index or build and persist a fresh one.
    ///
    /// A failed save is logged and otherwise ignored; the freshly built
    /// index is still returned.
    pub fn load_or_build(
        &self,
        signature: &str,
        build: impl FnOnce() -> FallbackIndex,
    ) -> FallbackIndex {
        if let Some(index) = self.load(signature) {
            return index;
        }
        let index = build();
        if let Err(e) = self.save(&index, signature) {
            warn!("{e:#}");
        }
        index
    }
}
