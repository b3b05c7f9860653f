//! Fontfall coverage - Unicode class and font coverage catalogs.
//!
//! Parses externally sourced Unicode-range definitions and font coverage
//! metadata into two flat interval catalogs, preferring seeded or cached
//! copies over the network.

pub mod catalog;
pub mod classes;
pub mod error;
pub mod source;

pub use catalog::{FontCoverage, FontStyles, parse_catalog};
pub use classes::{UnicodeClass, parse_classes};
pub use error::{Error, Result};
pub use source::{
    CatalogSource, DEFAULT_CATALOG_URL, DEFAULT_CLASSES_URL, build_classes, build_font_catalog,
    write_atomic,
};

/// Progress callback for long catalog rebuilds: `(done, total)`.
///
/// Reporting never changes the result.
pub type Progress<'a> = &'a dyn Fn(usize, usize);
