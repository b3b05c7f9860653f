//! The fallback engine context object.
//!
//! Holds a read-only snapshot of the two catalogs and the merged index,
//! constructed once and passed to every call. Two documents rendered in
//! the same process may share one engine; nothing in it mutates after
//! construction.

use std::path::PathBuf;

use anyhow::bail;
use log::{info, warn};

use fontfall_coverage::{
    CatalogSource, DEFAULT_CATALOG_URL, DEFAULT_CLASSES_URL, FontCoverage, UnicodeClass,
    build_classes, build_font_catalog,
};
use fontfall_index::{FallbackIndex, IndexRepository, signature};
use fontfall_planner::{FallbackPlan, Planner, Strategy};
use fontfall_script::{Node, ScriptRun, ScriptUsage, WrapSummary, segment, wrap_tree};
use fontfall_select::{
    DeclarativeIndex, FallbackSummaryEntry, FontSelection, Locator, SelectionConfig,
    resolve_selection,
};

/// Everything needed to construct a [`FallbackEngine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Cache directory: catalog caches, the signed index and font files.
    pub cache_dir: PathBuf,
    pub classes_url: String,
    pub catalog_url: String,
    /// Explicit local copy of the class definitions, preferred over both
    /// cache and network.
    pub classes_seed: Option<PathBuf>,
    /// Explicit local copy of the font catalog.
    pub catalog_seed: Option<PathBuf>,
    /// Declarative font index consulted before any other location source.
    pub font_index: Option<PathBuf>,
    /// Skip the locally installed TeX file-finder.
    pub skip_local_fonts: bool,
}

impl EngineOptions {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            classes_url: DEFAULT_CLASSES_URL.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            classes_seed: None,
            catalog_seed: None,
            font_index: None,
            skip_local_fonts: false,
        }
    }
}

/// Read-only fallback engine for one or more document renders.
#[derive(Debug)]
pub struct FallbackEngine {
    classes: Vec<UnicodeClass>,
    catalog: Vec<FontCoverage>,
    index: FallbackIndex,
    locator: Locator,
    warnings: Vec<String>,
}

impl FallbackEngine {
    /// Build or load the catalogs and the signed index.
    ///
    /// Either catalog may degrade to empty with a warning; only both
    /// failing at once (no seed, no cache, no network on either side) is
    /// fatal.
    pub fn new(options: EngineOptions) -> anyhow::Result<Self> {
        let classes_source = CatalogSource {
            seed: options.classes_seed.clone(),
            cache: options.cache_dir.join("unicode-classes.json"),
            url: options.classes_url.clone(),
        };
        let catalog_source = CatalogSource {
            seed: options.catalog_seed.clone(),
            cache: options.cache_dir.join("font-catalog.json"),
            url: options.catalog_url.clone(),
        };

        let mut warnings = Vec::new();
        let mut failures = 0;
        let classes = match build_classes(&classes_source, None) {
            Ok(classes) => classes,
            Err(e) => {
                failures += 1;
                warnings.push(format!("unicode classes unavailable: {e}"));
                Vec::new()
            }
        };
        let catalog = match build_font_catalog(&catalog_source, None) {
            Ok(catalog) => catalog,
            Err(e) => {
                failures += 1;
                warnings.push(format!("font catalog unavailable: {e}"));
                Vec::new()
            }
        };
        if failures == 2 {
            bail!("no catalogs available: {}", warnings.join("; "));
        }
        for warning in &warnings {
            warn!("{warning}");
        }

        let sig = signature(&classes, &catalog);
        let repository = IndexRepository::new(options.cache_dir.join("fallback-index.json"));
        let index = repository.load_or_build(&sig, || {
            info!("rebuilding fallback index ({} classes, {} families)", classes.len(), catalog.len());
            FallbackIndex::build(&classes, &catalog)
        });

        let mut locator =
            Locator::new(options.cache_dir.join("fonts")).skip_local_fonts(options.skip_local_fonts);
        if let Some(path) = &options.font_index {
            match DeclarativeIndex::load(path) {
                Ok(declarative) => locator = locator.with_declarative(declarative),
                Err(e) => {
                    let message = format!("ignoring font index: {e}");
                    warn!("{message}");
                    warnings.push(message);
                }
            }
        }

        Ok(Self { classes, catalog, index, locator, warnings })
    }

    /// Scan text and plan the fallback fonts it needs.
    pub fn scan_text(&self, text: &str, strategy: Strategy) -> FallbackPlan {
        self.planner().scan_text(text, strategy)
    }

    /// A planner borrowing this engine's snapshot.
    pub fn planner(&self) -> Planner<'_> {
        Planner::new(&self.index, &self.catalog)
    }

    /// Segment text into script runs.
    pub fn segment(&self, text: &str) -> Vec<ScriptRun> {
        segment(text)
    }

    /// Wrap a markup tree in script-tagged spans.
    pub fn wrap_tree(&self, root: Node) -> (Node, Vec<ScriptUsage>, WrapSummary) {
        wrap_tree(root, &self.index)
    }

    /// Resolve the final font selection for a document.
    pub fn resolve_selection(
        &self,
        config: &SelectionConfig,
        usage: &[ScriptUsage],
        cached: &[FallbackSummaryEntry],
    ) -> FontSelection {
        resolve_selection(config, usage, cached)
    }

    /// Catalog record for a family, if any.
    pub fn coverage_for(&self, family: &str) -> Option<&FontCoverage> {
        self.catalog.iter().find(|c| c.family == family)
    }

    pub fn classes(&self) -> &[UnicodeClass] {
        &self.classes
    }

    pub fn catalog(&self) -> &[FontCoverage] {
        &self.catalog
    }

    pub fn index(&self) -> &FallbackIndex {
        &self.index
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Warnings collected during construction.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
