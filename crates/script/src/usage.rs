//! Per-script usage aggregation and macro binding names.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;

use fontfall_index::FallbackIndex;

/// Script groups with a registered wrapper binding. Runs detected in any
/// other script are reported and left unwrapped.
pub const REGISTERED_SCRIPTS: &[&str] = &[
    "arabic",
    "armenian",
    "bengali",
    "chinese",
    "cyrillic",
    "devanagari",
    "ethiopic",
    "georgian",
    "greek",
    "gujarati",
    "gurmukhi",
    "hebrew",
    "japanese",
    "kannada",
    "khmer",
    "korean",
    "lao",
    "malayalam",
    "mongolian",
    "myanmar",
    "oriya",
    "sinhala",
    "syriac",
    "tamil",
    "telugu",
    "thaana",
    "thai",
    "tibetan",
];

/// Whether a script group has a wrapper binding.
pub fn is_registered(group: &str) -> bool {
    REGISTERED_SCRIPTS.binary_search(&group).is_ok()
}

/// Lowercased, macro-safe identifier for a script group: TeX macro names
/// take letters only.
pub fn slug_for(group: &str) -> String {
    group
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Aggregated usage of one script across a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptUsage {
    /// Script group (e.g. "arabic").
    pub group: String,
    /// Filesystem/macro-safe identifier.
    pub slug: String,
    /// Fallback font bound to the script by the index, when known.
    pub font_name: Option<String>,
    /// Font macro name used by the typesetting templates.
    pub font_command: String,
    /// Inline text macro name; the block environment is the slug itself.
    pub text_command: String,
    /// Characters of this script observed so far.
    pub count: usize,
    /// Up to five distinct sample runs, for diagnostics.
    pub samples: Vec<String>,
}

const MAX_SAMPLES: usize = 5;

/// Accumulates `ScriptUsage` records across wrap calls.
///
/// Keyed by script group; counts and samples accumulate for the lifetime
/// of the tracker, which is one document render.
#[derive(Debug)]
pub struct UsageTracker<'a> {
    index: &'a FallbackIndex,
    map: IndexMap<String, ScriptUsage>,
    warned: BTreeSet<String>,
    warnings: Vec<String>,
}

impl<'a> UsageTracker<'a> {
    pub fn new(index: &'a FallbackIndex) -> Self {
        Self {
            index,
            map: IndexMap::new(),
            warned: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Record one wrapped run of a script.
    pub fn record(&mut self, group: &str, sample: &str, chars: usize) {
        let usage = self.map.entry(group.to_string()).or_insert_with(|| {
            let slug = slug_for(group);
            ScriptUsage {
                group: group.to_string(),
                font_name: self.index.font_for_script(group).map(|f| f.name.clone()),
                font_command: format!("{slug}font"),
                text_command: format!("text{slug}"),
                slug,
                count: 0,
                samples: Vec::new(),
            }
        });
        usage.count += chars;
        let sample = sample.trim();
        if !sample.is_empty()
            && usage.samples.len() < MAX_SAMPLES
            && !usage.samples.iter().any(|s| s == sample)
        {
            usage.samples.push(sample.to_string());
        }
    }

    /// Report a script with no registered wrapper binding, once per group.
    pub fn report_unregistered(&mut self, group: &str) {
        if self.warned.insert(group.to_string()) {
            let message = format!("no wrapper binding registered for script '{group}'");
            warn!("{message}");
            self.warnings.push(message);
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Aggregated usage in first-seen order.
    pub fn usage(&self) -> Vec<ScriptUsage> {
        self.map.values().cloned().collect()
    }
}
