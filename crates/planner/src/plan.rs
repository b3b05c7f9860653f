//! The output of one text scan.

use serde::{Deserialize, Serialize};

use fontfall_index::FontBinding;

use crate::strategy::Strategy;

/// One class worth of fallback requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// Script family of the class, when grouped.
    pub group: Option<String>,
    /// Class name.
    pub name: String,
    /// Font assigned to the class under the plan's strategy.
    pub font: Option<FontBinding>,
    /// Covered codepoint ranges contributing to this entry.
    pub ranges: Vec<(u32, u32)>,
    /// Number of characters of this class observed in the text.
    pub count: usize,
}

/// Immutable result of scanning one text against the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackPlan {
    /// Strategy the plan was computed under.
    pub strategy: Strategy,
    /// Per-class assignments, sorted by class name.
    pub summary: Vec<PlanEntry>,
    /// Distinct fonts the plan requires, sorted.
    pub fonts: Vec<String>,
    /// Codepoints no catalog font covers, sorted.
    pub uncovered: Vec<u32>,
}

/// Merge sorted inclusive ranges, coalescing overlapping and adjacent ones.
pub(crate) fn merge_ranges(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    ranges.sort_unstable();
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some((_, last_end)) if start <= last_end.saturating_add(1) => {
                *last_end = (*last_end).max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_ranges() {
        let merged = merge_ranges(vec![(0x30, 0x39), (0x20, 0x2F), (0x3A, 0x40), (0x60, 0x6F)]);
        assert_eq!(merged, vec![(0x20, 0x40), (0x60, 0x6F)]);
    }

    #[test]
    fn test_merge_ranges_overlapping() {
        let merged = merge_ranges(vec![(0x0600, 0x06FF), (0x0650, 0x0750)]);
        assert_eq!(merged, vec![(0x0600, 0x0750)]);
    }
}
