//! The merged fallback index: one entry per Unicode class, bound to the
//! best-covering font family.

use serde::{Deserialize, Serialize};

use fontfall_coverage::{FontCoverage, FontStyles, UnicodeClass};

/// The resolved font half of a fallback entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontBinding {
    /// Family name.
    pub name: String,
    /// Font file extension without the dot.
    pub extension: String,
    /// Style suffixes available for this family.
    pub styles: FontStyles,
}

impl FontBinding {
    /// Binding for a catalog family.
    pub fn from_coverage(coverage: &FontCoverage) -> Self {
        Self {
            name: coverage.family.clone(),
            extension: coverage.extension.clone(),
            styles: coverage.styles.clone(),
        }
    }
}

/// The resolved binding of one Unicode class to one font.
///
/// A class no catalog family overlaps carries `font: None` and is reported
/// as uncovered downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEntry {
    pub name: String,
    pub start: u32,
    pub end: u32,
    pub group: Option<String>,
    pub font: Option<FontBinding>,
}

/// Ordered list of fallback entries with point and range lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackIndex {
    entries: Vec<FallbackEntry>,
}

/// One catalog coverage range, flattened for interval stabbing.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: u32,
    end: u32,
    family: usize,
}

impl FallbackIndex {
    /// Build an index from entries, sorting by start codepoint.
    pub fn new(mut entries: Vec<FallbackEntry>) -> Self {
        entries.sort_by_key(|e| (e.start, e.end));
        Self { entries }
    }

    /// Merge the two catalogs into an index.
    ///
    /// Every class is matched against the catalog by range containment and
    /// overlap: a family containing the whole class beats any partial
    /// overlap, longer overlaps beat shorter ones, and remaining ties go to
    /// the lexicographically smaller family name. The candidate scan is
    /// bounded with a sorted span list and a prefix max-end array, keeping
    /// the merge near O((classes + ranges) log ranges).
    pub fn build(classes: &[UnicodeClass], catalog: &[FontCoverage]) -> Self {
        let mut spans: Vec<Span> = catalog
            .iter()
            .enumerate()
            .flat_map(|(family, coverage)| {
                coverage.ranges.iter().map(move |&(start, end)| Span { start, end, family })
            })
            .collect();
        spans.sort_by_key(|s| (s.start, s.end));

        let mut prefix_max_end = Vec::with_capacity(spans.len());
        let mut max_end = 0u32;
        for span in &spans {
            max_end = max_end.max(span.end);
            prefix_max_end.push(max_end);
        }

        let entries = classes
            .iter()
            .map(|class| {
                let font = best_match(class, &spans, &prefix_max_end, catalog)
                    .map(|family| FontBinding::from_coverage(&catalog[family]));
                FallbackEntry {
                    name: class.name.clone(),
                    start: class.start,
                    end: class.end,
                    group: class.group.clone(),
                    font,
                }
            })
            .collect();

        Self::new(entries)
    }

    /// Entry whose range contains the codepoint.
    pub fn lookup(&self, cp: u32) -> Option<&FallbackEntry> {
        let idx = self.entries.partition_point(|e| e.start <= cp);
        self.entries[..idx].iter().rev().find(|e| e.end >= cp)
    }

    /// Entries overlapping the inclusive range.
    pub fn overlapping(&self, start: u32, end: u32) -> impl Iterator<Item = &FallbackEntry> {
        let idx = self.entries.partition_point(|e| e.start <= end);
        self.entries[..idx].iter().filter(move |e| e.end >= start)
    }

    /// First entry registered for a script group, matched loosely: the
    /// index's group names ("Arabics", "Japanese") are compared lowercased
    /// and with a plural `s` stripped against the detector's group ("arabic",
    /// "japanese"), falling back to the class name itself.
    pub fn font_for_script(&self, script: &str) -> Option<&FontBinding> {
        let matches = |name: &str| {
            let lower = name.to_lowercase();
            lower == script || lower.trim_end_matches('s') == script
        };
        self.entries
            .iter()
            .find(|e| {
                e.font.is_some()
                    && (e.group.as_deref().is_some_and(&matches) || matches(&e.name))
            })
            .and_then(|e| e.font.as_ref())
    }

    pub fn entries(&self) -> &[FallbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Best-covering family for a class, or `None` when nothing overlaps.
fn best_match(
    class: &UnicodeClass,
    spans: &[Span],
    prefix_max_end: &[u32],
    catalog: &[FontCoverage],
) -> Option<usize> {
    // (contained, overlap length, family index) of the best candidate so far.
    let mut best: Option<(bool, u64, usize)> = None;

    let hi = spans.partition_point(|s| s.start <= class.end);
    for i in (0..hi).rev() {
        if prefix_max_end[i] < class.start {
            // No span at or before i can still reach the class.
            break;
        }
        let span = &spans[i];
        if span.end < class.start {
            continue;
        }
        let contained = span.start <= class.start && class.end <= span.end;
        let overlap =
            u64::from(span.end.min(class.end) - span.start.max(class.start)) + 1;
        let candidate = (contained, overlap, span.family);
        let better = match best {
            None => true,
            Some((b_contained, b_overlap, b_family)) => {
                (contained, overlap) > (b_contained, b_overlap)
                    || ((contained, overlap) == (b_contained, b_overlap)
                        && catalog[span.family].family < catalog[b_family].family)
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    best.map(|(_, _, family)| family)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, start: u32, end: u32, group: Option<&str>) -> UnicodeClass {
        UnicodeClass {
            name: name.into(),
            start,
            end,
            group: group.map(Into::into),
        }
    }

    fn coverage(family: &str, ranges: &[(u32, u32)]) -> FontCoverage {
        FontCoverage {
            family: family.into(),
            ranges: ranges.to_vec(),
            file_base: family.replace(' ', ""),
            dir_base: format!("https://example.org/{}", family.replace(' ', "").to_lowercase()),
            extension: "ttf".into(),
            archive: None,
            styles: FontStyles::default(),
        }
    }

    #[test]
    fn test_containment_beats_overlap() {
        let classes = [class("Arabic", 0x0600, 0x06FF, Some("Arabics"))];
        let catalog = [
            coverage("Partial Font", &[(0x0600, 0x0650)]),
            coverage("Full Font", &[(0x0600, 0x06FF)]),
        ];
        let index = FallbackIndex::build(&classes, &catalog);
        let font = index.entries()[0].font.as_ref().unwrap();
        assert_eq!(font.name, "Full Font");
    }

    #[test]
    fn test_longer_overlap_wins_without_containment() {
        let classes = [class("Arabic", 0x0600, 0x06FF, None)];
        let catalog = [
            coverage("Short", &[(0x0600, 0x0610)]),
            coverage("Long", &[(0x0620, 0x06FF)]),
        ];
        let index = FallbackIndex::build(&classes, &catalog);
        assert_eq!(index.entries()[0].font.as_ref().unwrap().name, "Long");
    }

    #[test]
    fn test_name_tie_break() {
        let classes = [class("Arabic", 0x0600, 0x06FF, None)];
        let catalog = [
            coverage("Zeta Font", &[(0x0600, 0x06FF)]),
            coverage("Alpha Font", &[(0x0600, 0x06FF)]),
        ];
        let index = FallbackIndex::build(&classes, &catalog);
        assert_eq!(index.entries()[0].font.as_ref().unwrap().name, "Alpha Font");
    }

    #[test]
    fn test_no_overlap_is_uncovered() {
        let classes = [class("Runic", 0x16A0, 0x16FF, None)];
        let catalog = [coverage("Arabic Font", &[(0x0600, 0x06FF)])];
        let index = FallbackIndex::build(&classes, &catalog);
        assert!(index.entries()[0].font.is_none());
    }

    #[test]
    fn test_lookup() {
        let classes = [
            class("Arabic", 0x0600, 0x06FF, None),
            class("Hebrew", 0x0590, 0x05FF, None),
        ];
        let catalog = [coverage("Both", &[(0x0590, 0x06FF)])];
        let index = FallbackIndex::build(&classes, &catalog);
        assert_eq!(index.lookup(0x0627).unwrap().name, "Arabic");
        assert_eq!(index.lookup(0x05D0).unwrap().name, "Hebrew");
        assert!(index.lookup(0x0700).is_none());
        assert!(index.lookup(0x41).is_none());
    }

    #[test]
    fn test_overlapping_query() {
        let classes = [
            class("Hebrew", 0x0590, 0x05FF, None),
            class("Arabic", 0x0600, 0x06FF, None),
            class("Thai", 0x0E00, 0x0E7F, None),
        ];
        let index = FallbackIndex::build(&classes, &[]);
        let hits: Vec<_> = index.overlapping(0x05F0, 0x0610).map(|e| e.name.as_str()).collect();
        assert_eq!(hits, ["Hebrew", "Arabic"]);
    }

    #[test]
    fn test_font_for_script() {
        let classes = [class("Arabic", 0x0600, 0x06FF, Some("Arabics"))];
        let catalog = [coverage("NotoKufiArabic", &[(0x0600, 0x06FF)])];
        let index = FallbackIndex::build(&classes, &catalog);
        assert_eq!(index.font_for_script("arabic").unwrap().name, "NotoKufiArabic");
        assert!(index.font_for_script("hebrew").is_none());
    }
}
