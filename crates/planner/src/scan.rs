//! Text scanning against the fallback index.

use std::collections::{BTreeMap, BTreeSet};

use fontfall_coverage::FontCoverage;
use fontfall_index::{FallbackEntry, FallbackIndex, FontBinding};

use crate::{
    plan::{FallbackPlan, PlanEntry, merge_ranges},
    strategy::Strategy,
};

/// Scans text and produces fallback plans. Read-only after construction;
/// one instance may serve any number of documents in a process.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    index: &'a FallbackIndex,
    catalog: &'a [FontCoverage],
}

/// Aggregated observations for one class name.
#[derive(Debug, Default, Clone)]
struct ClassHit<'a> {
    entries: Vec<&'a FallbackEntry>,
    count: usize,
    codepoints: Vec<u32>,
}

impl<'a> ClassHit<'a> {
    fn group(&self) -> Option<String> {
        self.entries.iter().find_map(|e| e.group.clone())
    }

    fn font(&self) -> Option<&'a FontBinding> {
        self.entries.iter().find_map(|e| e.font.as_ref())
    }

    fn ranges(&self) -> Vec<(u32, u32)> {
        merge_ranges(self.entries.iter().map(|e| (e.start, e.end)).collect())
    }
}

impl<'a> Planner<'a> {
    pub fn new(index: &'a FallbackIndex, catalog: &'a [FontCoverage]) -> Self {
        Self { index, catalog }
    }

    /// Scan the text and plan the fonts required to render it.
    ///
    /// Deterministic for identical inputs: the same text against the same
    /// index always yields an identical plan.
    pub fn scan_text(&self, text: &str, strategy: Strategy) -> FallbackPlan {
        let (hits, uncovered) = self.collect(text);
        let (summary, mut uncovered) = match strategy {
            Strategy::ByClass => self.by_class(&hits, uncovered),
            Strategy::MinimalFonts => self.minimal_fonts(&hits, uncovered),
        };

        let fonts: Vec<String> = summary
            .iter()
            .filter_map(|e| e.font.as_ref().map(|f| f.name.clone()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        uncovered.sort_unstable();
        uncovered.dedup();

        FallbackPlan { strategy, summary, fonts, uncovered }
    }

    /// Collect distinct non-trivial codepoints and group them by class.
    ///
    /// Codepoints below 0x80 are covered by the base font stack and never
    /// require fallback.
    fn collect(&self, text: &str) -> (BTreeMap<String, ClassHit<'a>>, Vec<u32>) {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for ch in text.chars() {
            let cp = ch as u32;
            if cp >= 0x80 {
                *counts.entry(cp).or_default() += 1;
            }
        }

        let mut hits: BTreeMap<String, ClassHit<'a>> = BTreeMap::new();
        let mut uncovered = Vec::new();
        for (cp, count) in counts {
            match self.index.lookup(cp) {
                Some(entry) => {
                    let hit = hits.entry(entry.name.clone()).or_default();
                    if !hit.entries.iter().any(|e| std::ptr::eq(*e, entry)) {
                        hit.entries.push(entry);
                    }
                    hit.count += count;
                    hit.codepoints.push(cp);
                }
                None => uncovered.push(cp),
            }
        }
        (hits, uncovered)
    }

    /// Emit the index's existing class-to-font binding verbatim.
    ///
    /// Classes whose entry carries no font contribute their codepoints to
    /// the uncovered list and are not part of the summary.
    fn by_class(
        &self,
        hits: &BTreeMap<String, ClassHit<'a>>,
        mut uncovered: Vec<u32>,
    ) -> (Vec<PlanEntry>, Vec<u32>) {
        let mut summary = Vec::with_capacity(hits.len());
        for (name, hit) in hits {
            match hit.font() {
                Some(font) => summary.push(PlanEntry {
                    group: hit.group(),
                    name: name.clone(),
                    font: Some(font.clone()),
                    ranges: hit.ranges(),
                    count: hit.count,
                }),
                None => uncovered.extend_from_slice(&hit.codepoints),
            }
        }
        (summary, uncovered)
    }

    /// Greedy approximate minimum-set-cover.
    ///
    /// Each candidate font is treated as the set of classes present in the
    /// text whose observed codepoints it fully covers. The font covering
    /// the most still-unassigned characters wins each round (ties by number
    /// of classes, then by family name). Classes no font covers end up
    /// uncovered. If the greedy pick ever needs more fonts than `by_class`
    /// would, the `by_class` assignment is emitted instead, so the result
    /// is never a larger font set.
    fn minimal_fonts(
        &self,
        hits: &BTreeMap<String, ClassHit<'a>>,
        uncovered: Vec<u32>,
    ) -> (Vec<PlanEntry>, Vec<u32>) {
        let mut remaining: BTreeMap<&str, &ClassHit<'a>> =
            hits.iter().map(|(name, hit)| (name.as_str(), hit)).collect();
        let mut assigned: Vec<(usize, Vec<&str>)> = Vec::new();

        loop {
            let mut best: Option<(usize, usize, usize)> = None;
            let mut best_classes: Vec<&str> = Vec::new();
            for (fi, family) in self.catalog.iter().enumerate() {
                let covered: Vec<&str> = remaining
                    .iter()
                    .filter(|(_, hit)| hit.codepoints.iter().all(|&cp| family.covers(cp)))
                    .map(|(&name, _)| name)
                    .collect();
                if covered.is_empty() {
                    continue;
                }
                let chars: usize = covered.iter().map(|name| remaining[name].count).sum();
                let better = match best {
                    None => true,
                    Some((b_chars, b_classes, b_fi)) => {
                        (chars, covered.len()) > (b_chars, b_classes)
                            || ((chars, covered.len()) == (b_chars, b_classes)
                                && self.catalog[fi].family < self.catalog[b_fi].family)
                    }
                };
                if better {
                    best = Some((chars, covered.len(), fi));
                    best_classes = covered;
                }
            }
            match best {
                Some((_, _, fi)) => {
                    for name in &best_classes {
                        remaining.remove(name);
                    }
                    assigned.push((fi, best_classes));
                }
                None => break,
            }
        }

        let mut leftover = uncovered.clone();
        for hit in remaining.values() {
            leftover.extend_from_slice(&hit.codepoints);
        }

        let mut summary = Vec::with_capacity(hits.len());
        for (fi, classes) in &assigned {
            let binding = FontBinding::from_coverage(&self.catalog[*fi]);
            for name in classes {
                let hit = &hits[*name];
                summary.push(PlanEntry {
                    group: hit.group(),
                    name: (*name).to_string(),
                    font: Some(binding.clone()),
                    ranges: hit.ranges(),
                    count: hit.count,
                });
            }
        }
        summary.sort_by(|a, b| a.name.cmp(&b.name));

        // Contract: never a larger font set than by_class on the same text.
        let distinct =
            |entries: &[PlanEntry]| -> BTreeSet<String> {
                entries.iter().filter_map(|e| e.font.as_ref().map(|f| f.name.clone())).collect()
            };
        let (by_class_summary, by_class_uncovered) = self.by_class(hits, uncovered);
        if distinct(&summary).len() > distinct(&by_class_summary).len() {
            return (by_class_summary, by_class_uncovered);
        }

        (summary, leftover)
    }
}
