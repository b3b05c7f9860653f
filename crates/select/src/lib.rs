//! Fontfall select - font role selection and file materialization.
//!
//! Resolves final role-based font choices from presets and overrides,
//! reconciles cached fallback data against fresh usage data, and
//! materializes concrete font files with graceful degradation.

pub mod error;
pub mod locate;
pub mod materialize;
pub mod profile;
pub mod selection;

pub use error::LocateError;
pub use locate::{DeclarativeEntry, DeclarativeIndex, FontStyle, Locator, ResolvedFontFile};
pub use materialize::Materialized;
pub use profile::{FontProfile, MONO_FALLBACK_FAMILY, NO_ITALIC_MONO, RolePreset, UnknownProfile};
pub use selection::{FallbackSummaryEntry, FontSelection, SelectionConfig, resolve_selection};
