//! Fontfall index - merged codepoint-to-font lookup with a signed cache.
//!
//! Combines the Unicode class catalog with the font coverage catalog into
//! one flat, sorted index (codepoint -> class, group, assigned font) and
//! persists it under a content signature.

pub mod index;
pub mod repository;
pub mod signature;

pub use index::{FallbackEntry, FallbackIndex, FontBinding};
pub use repository::IndexRepository;
pub use signature::signature;
