//! Content signatures for cached derived artifacts.

use sha2::{Digest, Sha256};

use fontfall_coverage::{FontCoverage, UnicodeClass};

/// Digest of the inputs that produce a fallback index.
///
/// An index loaded from disk is trusted only if its stored signature equals
/// the signature computed from the current catalogs.
pub fn signature(classes: &[UnicodeClass], catalog: &[FontCoverage]) -> String {
    let canonical = serde_json::to_vec(&(classes, catalog))
        .unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
