//! Fontfall core - the font and script fallback engine.
//!
//! Answers one question repeatedly and cheaply: given a span of text,
//! which fonts are required to render it, and how should the surrounding
//! markup be annotated so a downstream typesetting macro picks the right
//! one per character run.

pub mod context;
pub mod engine;

pub use context::{TemplateContext, UnicodeFontClass};
pub use engine::{EngineOptions, FallbackEngine};
pub use fontfall_coverage::{FontCoverage, FontStyles, UnicodeClass};
pub use fontfall_index::{FallbackEntry, FallbackIndex, FontBinding};
pub use fontfall_planner::{FallbackPlan, PlanEntry, Planner, Strategy};
pub use fontfall_script::{
    Element, Node, RunKind, ScriptRun, ScriptUsage, UsageTracker, WrapSummary, segment, wrap_tree,
};
pub use fontfall_select::{
    FallbackSummaryEntry, FontProfile, FontSelection, FontStyle, Locator, Materialized,
    ResolvedFontFile, SelectionConfig, resolve_selection,
};
