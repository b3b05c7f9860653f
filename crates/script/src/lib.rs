//! Fontfall script - script run detection and markup tree wrapping.
//!
//! Segments text into script-homogeneous runs, looks up a macro binding
//! per script, and rewrites a markup tree with script-tagged wrappers.

pub mod blocks;
pub mod segment;
pub mod tree;
pub mod usage;
pub mod wrap;

pub use blocks::{CharClass, classify};
pub use segment::{RunKind, ScriptRun, segment};
pub use tree::{Element, Node};
pub use usage::{REGISTERED_SCRIPTS, ScriptUsage, UsageTracker, is_registered, slug_for};
pub use wrap::{MATH_ATTR, SCRIPT_ATTR, WrapSummary, wrap_tree, wrap_tree_with};
