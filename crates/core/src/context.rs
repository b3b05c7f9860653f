//! The template context handed to the downstream typesetting templates.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Serialize;

use fontfall_coverage::FontCoverage;
use fontfall_planner::FallbackPlan;
use fontfall_select::{FontSelection, FontStyle, Materialized};

use crate::engine::FallbackEngine;

/// Coverage declaration for one fallback family, emitted so the templates
/// can declare low-level per-range font switching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnicodeFontClass {
    pub family: String,
    pub ranges: Vec<(u32, u32)>,
}

/// Font role -> resolved file path mapping plus coverage declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateContext {
    pub fonts: BTreeMap<String, PathBuf>,
    pub unicode_font_classes: Vec<UnicodeFontClass>,
    pub warnings: Vec<String>,
}

/// Generic monochrome stand-in for color emoji families.
const EMOJI_SUBSTITUTE: &str = "Noto Emoji";

impl FallbackEngine {
    /// Materialize every font the selection and plan name into the
    /// document's output directory and emit the template mapping.
    ///
    /// Missing body fonts are reported and skipped; fallback fonts walk
    /// their substitution chain and degrade to artifact markers. Nothing
    /// here aborts the render.
    pub fn template_context(
        &self,
        selection: &FontSelection,
        plan: &FallbackPlan,
        dest_dir: &Path,
    ) -> TemplateContext {
        let mut context = TemplateContext {
            warnings: selection.warnings.clone(),
            ..TemplateContext::default()
        };

        let mut roles: Vec<(String, &str)> = vec![
            ("main".to_string(), selection.main.as_str()),
            ("sans".to_string(), selection.sans.as_str()),
            ("mono".to_string(), selection.mono.as_str()),
            ("math".to_string(), selection.math.as_str()),
        ];
        if let Some(small_caps) = &selection.small_caps {
            roles.push(("small_caps".to_string(), small_caps));
        }
        for (role, family) in roles {
            match self.locator().locate(family) {
                Some(resolved) => {
                    context.fonts.insert(role, resolved.path);
                }
                None => context
                    .warnings
                    .push(format!("body font '{family}' for role '{role}' not found")),
            }
        }

        for family in &plan.fonts {
            let Some(spec) = self.coverage_for(family) else {
                context.warnings.push(format!("fallback font '{family}' missing from catalog"));
                continue;
            };
            let mut chain: Vec<&FontCoverage> = vec![spec];
            if family.contains("Emoji")
                && let Some(substitute) = self.coverage_for(EMOJI_SUBSTITUTE)
                && substitute.family != *family
            {
                chain.push(substitute);
            }
            match self.locator().materialize_chain(&chain, FontStyle::Regular, dest_dir) {
                Materialized::File { file, warning } => {
                    context.fonts.insert(format!("fallback:{family}"), file.path);
                    context.warnings.extend(warning);
                }
                Materialized::Artifact { warning, .. } => context.warnings.push(warning),
            }
        }

        let mut by_family: BTreeMap<&str, Vec<(u32, u32)>> = BTreeMap::new();
        for entry in &plan.summary {
            if let Some(font) = &entry.font {
                by_family.entry(&font.name).or_default().extend(entry.ranges.iter().copied());
            }
        }
        context.unicode_font_classes = by_family
            .into_iter()
            .map(|(family, mut ranges)| {
                ranges.sort_unstable();
                ranges.dedup();
                UnicodeFontClass { family: family.to_string(), ranges }
            })
            .collect();

        context
    }
}
