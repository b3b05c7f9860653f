//! Streaming segmentation of text into script-homogeneous runs.

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::blocks::{CharClass, classify, is_math_symbol};

/// How a run should be wrapped downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunKind {
    /// Foreign-language text wrapping.
    Text,
    /// Inline math-mode wrapping (isolated symbol runs).
    MathInline,
}

/// A maximal substring sharing one script group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptRun {
    /// Script group (e.g. "arabic", "chinese").
    pub group: String,
    pub kind: RunKind,
    /// Byte offset of the run start.
    pub start: usize,
    /// Byte offset one past the run end.
    pub end: usize,
    /// The run's text.
    pub text: String,
}

/// Pseudo-group for runs built from math-symbol characters.
const MATH_GROUP: &str = "math";

#[derive(Debug)]
struct OpenRun {
    group: &'static str,
    start: usize,
    end: usize,
}

/// Segment text into script runs.
///
/// Characters are classified per grapheme cluster, keyed by the cluster's
/// first scalar, so combining marks never separate from their base.
/// Connectors extend whichever run they touch, preferring the one that
/// precedes them. Runs made of a single isolated math-symbol scalar are
/// routed to inline math instead of text wrapping.
pub fn segment(text: &str) -> Vec<ScriptRun> {
    let mut runs: Vec<ScriptRun> = Vec::new();
    let mut current: Option<OpenRun> = None;
    // Connector stretch not yet attached to a run: (start, end) bytes.
    let mut pending: Option<(usize, usize)> = None;

    let finish = |run: OpenRun, runs: &mut Vec<ScriptRun>| {
        let slice = &text[run.start..run.end];
        let symbols: Vec<char> =
            slice.chars().filter(|&c| classify(c) != CharClass::Connector).collect();
        let isolated_math = symbols.len() == 1 && is_math_symbol(symbols[0]);
        let (group, kind) = if run.group == MATH_GROUP || isolated_math {
            (MATH_GROUP.to_string(), RunKind::MathInline)
        } else {
            (run.group.to_string(), RunKind::Text)
        };
        runs.push(ScriptRun {
            group,
            kind,
            start: run.start,
            end: run.end,
            text: slice.to_string(),
        });
    };

    for (offset, cluster) in text.grapheme_indices(true) {
        let end = offset + cluster.len();
        let Some(first) = cluster.chars().next() else { continue };
        let class = match classify(first) {
            CharClass::Math => CharClass::Script(MATH_GROUP),
            other => other,
        };

        match class {
            CharClass::Script(group) => {
                match current.as_mut() {
                    Some(run) if run.group == group => {
                        // Connectors between same-script characters join the run.
                        run.end = end;
                    }
                    Some(_) => {
                        // Different script: the pending connectors stay with
                        // the run that precedes them.
                        let mut run = current.take().unwrap();
                        if let Some((p_start, p_end)) = pending.take()
                            && p_start == run.end
                        {
                            run.end = p_end;
                        }
                        finish(run, &mut runs);
                        current = Some(OpenRun { group, start: offset, end });
                    }
                    None => {
                        // No preceding run: adjacent connectors lead the new one.
                        let start = match pending.take() {
                            Some((p_start, p_end)) if p_end == offset => p_start,
                            _ => offset,
                        };
                        current = Some(OpenRun { group, start, end });
                    }
                }
                pending = None;
            }
            CharClass::Connector => match pending.as_mut() {
                Some((_, p_end)) if *p_end == offset => *p_end = end,
                _ => pending = Some((offset, end)),
            },
            CharClass::Combining => {
                // A stray mark with no base: ride the adjacent run if any.
                match current.as_mut() {
                    Some(run) if run.end == offset => run.end = end,
                    _ => {
                        if let Some(run) = current.take() {
                            finish(run, &mut runs);
                        }
                        pending = None;
                    }
                }
            }
            CharClass::Ignored | CharClass::Math => {
                if let Some(mut run) = current.take() {
                    if let Some((p_start, p_end)) = pending.take()
                        && p_start == run.end
                    {
                        run.end = p_end;
                    }
                    finish(run, &mut runs);
                }
                pending = None;
            }
        }
    }

    if let Some(mut run) = current.take() {
        if let Some((p_start, p_end)) = pending
            && p_start == run.end
        {
            run.end = p_end;
        }
        finish(run, &mut runs);
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(runs: &[ScriptRun]) -> Vec<(&str, &str)> {
        runs.iter().map(|r| (r.group.as_str(), r.text.as_str())).collect()
    }

    #[test]
    fn test_single_script_run() {
        let runs = segment("السلام");
        assert_eq!(groups(&runs), [("arabic", "السلام")]);
        assert_eq!(runs[0].kind, RunKind::Text);
        assert_eq!((runs[0].start, runs[0].end), (0, "السلام".len()));
    }

    #[test]
    fn test_latin_never_wraps() {
        assert!(segment("plain English text 123").is_empty());
        assert!(segment("café, naïve").is_empty());
    }

    #[test]
    fn test_script_boundary() {
        let runs = segment("你好ひらがな");
        assert_eq!(groups(&runs), [("chinese", "你好"), ("japanese", "ひらがな")]);
    }

    #[test]
    fn test_connector_prefers_preceding_run() {
        let runs = segment("你好。ひらがな");
        assert_eq!(groups(&runs), [("chinese", "你好。"), ("japanese", "ひらがな")]);
    }

    #[test]
    fn test_connector_joins_same_script() {
        let runs = segment("مرحبا، سلام");
        assert_eq!(groups(&runs), [("arabic", "مرحبا، سلام")]);
    }

    #[test]
    fn test_connector_leads_run_without_preceding() {
        // The space between Latin and Arabic has no preceding run; it
        // attaches to the following one.
        let runs = segment("hello سلام");
        assert_eq!(groups(&runs), [("arabic", " سلام")]);
    }

    #[test]
    fn test_combining_mark_stays_with_base() {
        // Base + combining mark must land in one run.
        let text = "ب\u{0651}ا";
        let runs = segment(text);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, text);
    }

    #[test]
    fn test_latin_base_with_mark_not_wrapped() {
        assert!(segment("e\u{0301}tude").is_empty());
    }

    #[test]
    fn test_isolated_greek_capital_is_math() {
        let runs = segment("resistance of 5 Ω here");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::MathInline);
        assert_eq!(runs[0].group, "math");
    }

    #[test]
    fn test_greek_word_is_text_run() {
        let runs = segment("λόγος");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::Text);
        assert_eq!(runs[0].group, "greek");
    }

    #[test]
    fn test_math_operators_route_to_math() {
        let runs = segment("a ∈ b");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].kind, RunKind::MathInline);
    }

    #[test]
    fn test_emoji_ignored() {
        assert!(segment("smile 😀!").is_empty());
    }

    #[test]
    fn test_digits_inside_run() {
        let runs = segment("ひらがなで15じ");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "ひらがなで15じ");
        assert_eq!(runs[0].group, "japanese");
    }

    #[test]
    fn test_kanji_and_kana_split() {
        // Ideographs collapse to chinese, kana to japanese; a mixed
        // sentence yields adjacent runs.
        let runs = segment("満月です");
        assert_eq!(groups(&runs), [("chinese", "満月"), ("japanese", "です")]);
    }
}
