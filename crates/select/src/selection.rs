//! Final font resolution for one document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fontfall_script::ScriptUsage;

use crate::profile::{FontProfile, MONO_FALLBACK_FAMILY, NO_ITALIC_MONO};

/// Validated per-document font configuration.
///
/// Precedence, lowest to highest: the profile preset, the document-level
/// `family` override (main role only), then the explicit per-role fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionConfig {
    pub profile: FontProfile,
    /// Document-level main family override.
    pub family: Option<String>,
    pub main: Option<String>,
    pub sans: Option<String>,
    pub mono: Option<String>,
    pub math: Option<String>,
    pub small_caps: Option<String>,
}

/// One entry of a previously cached fallback summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackSummaryEntry {
    pub slug: String,
    pub font: String,
    pub count: usize,
}

/// Read-only font resolution for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSelection {
    pub profile: FontProfile,
    pub main: String,
    pub sans: String,
    pub mono: String,
    pub math: String,
    pub small_caps: Option<String>,
    pub mono_italic: String,
    pub mono_bold_italic: String,
    /// The mono family has no true italic cut; slant the upright.
    pub mono_fake_slant: bool,
    /// Fallback fonts per script slug.
    pub script_fallbacks: BTreeMap<String, Vec<String>>,
    pub warnings: Vec<String>,
}

/// Resolve the final font selection from the configuration, fresh script
/// usage and any cached fallback summary.
///
/// When the cache and fresh usage disagree on a slug's font, usage wins,
/// whatever the cached character count claims. A stale cache must never
/// pin a font after the upstream catalogs change.
pub fn resolve_selection(
    config: &SelectionConfig,
    usage: &[ScriptUsage],
    cached: &[FallbackSummaryEntry],
) -> FontSelection {
    let preset = config.profile.preset();
    let mut warnings = Vec::new();

    let main = config
        .main
        .clone()
        .or_else(|| config.family.clone())
        .unwrap_or_else(|| preset.main.to_string());
    let sans = config.sans.clone().unwrap_or_else(|| preset.sans.to_string());
    let mono = config.mono.clone().unwrap_or_else(|| preset.mono.to_string());
    let math = config.math.clone().unwrap_or_else(|| preset.math.to_string());
    let small_caps =
        config.small_caps.clone().or_else(|| preset.small_caps.map(str::to_string));

    let (italic_suffix, bold_italic_suffix) = if mono == MONO_FALLBACK_FAMILY {
        (" Oblique", " Bold Oblique")
    } else {
        (" Italic", " Bold Italic")
    };

    let mut script_fallbacks: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for entry in cached {
        script_fallbacks.insert(entry.slug.clone(), vec![entry.font.clone()]);
    }
    for entry in usage {
        match &entry.font_name {
            Some(font) => {
                script_fallbacks.insert(entry.slug.clone(), vec![font.clone()]);
            }
            None if !script_fallbacks.contains_key(&entry.slug) => {
                warnings.push(format!(
                    "no fallback font known for script '{}' ({} characters)",
                    entry.group, entry.count
                ));
            }
            None => {}
        }
    }

    FontSelection {
        profile: config.profile,
        mono_italic: format!("{mono}{italic_suffix}"),
        mono_bold_italic: format!("{mono}{bold_italic_suffix}"),
        mono_fake_slant: NO_ITALIC_MONO.contains(&mono.as_str()),
        main,
        sans,
        mono,
        math,
        small_caps,
        script_fallbacks,
        warnings,
    }
}
