//! Markup tree rewriting: script-tagged spans and block promotion.

use fontfall_index::FallbackIndex;

use crate::{
    blocks::{CharClass, classify},
    segment::{RunKind, segment},
    tree::{Element, Node},
    usage::{ScriptUsage, UsageTracker, is_registered, slug_for},
};

/// Attribute carrying the script group of a wrapped span or promoted block.
pub const SCRIPT_ATTR: &str = "data-script";

/// Attribute marking an inline math-mode span.
pub const MATH_ATTR: &str = "data-math";

/// Tags whose content is never segmented or wrapped.
const EXCLUDED_TAGS: &[&str] =
    &["code", "kbd", "math", "pre", "samp", "script", "style", "svg", "textarea"];

/// Block-level tags eligible for attribute promotion.
const BLOCK_TAGS: &[&str] = &[
    "article", "aside", "blockquote", "caption", "dd", "div", "dt", "figcaption", "footer", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "li", "p", "section", "summary", "td", "th",
];

/// Totals for one wrap pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapSummary {
    /// Spans created while wrapping text nodes.
    pub wrapped_spans: usize,
    /// Blocks that absorbed their single wrapped script.
    pub promoted_blocks: usize,
    /// Scripts seen without a registered binding.
    pub warnings: Vec<String>,
}

/// Wrap every text node of the tree in script-tagged spans and promote
/// single-script blocks.
pub fn wrap_tree(root: Node, index: &FallbackIndex) -> (Node, Vec<ScriptUsage>, WrapSummary) {
    let mut tracker = UsageTracker::new(index);
    let mut summary = WrapSummary::default();
    let root = wrap_node(root, &mut tracker, &mut summary);
    summary.warnings = tracker.warnings().to_vec();
    (root, tracker.usage(), summary)
}

/// As [`wrap_tree`], accumulating usage into a caller-owned tracker so
/// several fragments of one document share their counts.
pub fn wrap_tree_with(
    root: Node,
    tracker: &mut UsageTracker<'_>,
    summary: &mut WrapSummary,
) -> Node {
    let root = wrap_node(root, tracker, summary);
    summary.warnings = tracker.warnings().to_vec();
    root
}

fn wrap_node(node: Node, tracker: &mut UsageTracker<'_>, summary: &mut WrapSummary) -> Node {
    match node {
        Node::Text(text) => {
            // A bare text node outside any element cannot hold spans.
            Node::Text(text)
        }
        Node::Element(el) => Node::Element(wrap_element(el, tracker, summary)),
    }
}

fn wrap_element(
    mut el: Element,
    tracker: &mut UsageTracker<'_>,
    summary: &mut WrapSummary,
) -> Element {
    if EXCLUDED_TAGS.contains(&el.tag.as_str()) {
        return el;
    }

    let mut children = Vec::with_capacity(el.children.len());
    for child in el.children.drain(..) {
        match child {
            Node::Text(text) => {
                children.extend(wrap_text(&text, tracker, summary));
            }
            Node::Element(inner) => {
                children.push(Node::Element(wrap_element(inner, tracker, summary)));
            }
        }
    }
    el.children = children;

    if BLOCK_TAGS.contains(&el.tag.as_str()) {
        promote_block(&mut el, summary);
    }
    el
}

/// Split a text node into plain text and wrapped spans.
fn wrap_text(text: &str, tracker: &mut UsageTracker<'_>, summary: &mut WrapSummary) -> Vec<Node> {
    let runs = segment(text);
    if runs.is_empty() {
        return vec![Node::text(text)];
    }

    let mut nodes: Vec<Node> = Vec::new();
    let mut cursor = 0;
    let push_text = |nodes: &mut Vec<Node>, slice: &str| {
        if slice.is_empty() {
            return;
        }
        // Merge adjacent plain text so unwrapped runs don't fragment it.
        if let Some(Node::Text(last)) = nodes.last_mut() {
            last.push_str(slice);
        } else {
            nodes.push(Node::text(slice));
        }
    };

    for run in runs {
        push_text(&mut nodes, &text[cursor..run.start]);
        cursor = run.end;

        match run.kind {
            RunKind::MathInline => {
                let mut span = Element::new("span");
                span.set_attr(MATH_ATTR, "inline");
                span.children.push(Node::text(run.text));
                summary.wrapped_spans += 1;
                nodes.push(Node::Element(span));
            }
            RunKind::Text if is_registered(&run.group) => {
                let chars = run
                    .text
                    .chars()
                    .filter(|&c| matches!(classify(c), CharClass::Script(_)))
                    .count();
                tracker.record(&run.group, &run.text, chars);

                let mut span = Element::new("span");
                span.set_attr(SCRIPT_ATTR, slug_for(&run.group));
                span.children.push(Node::text(run.text));
                summary.wrapped_spans += 1;
                nodes.push(Node::Element(span));
            }
            RunKind::Text => {
                tracker.report_unregistered(&run.group);
                push_text(&mut nodes, &run.text);
            }
        }
    }
    push_text(&mut nodes, &text[cursor..]);

    nodes
}

/// Promote a block whose wrapped spans all share one script and whose
/// remaining text is connector-only: the attribute moves to the block and
/// the now-redundant spans unwrap. Merging adjacent promoted blocks is the
/// consuming renderer's responsibility.
fn promote_block(el: &mut Element, summary: &mut WrapSummary) {
    let mut slugs: Vec<String> = Vec::new();
    collect_span_slugs(&el.children, &mut slugs);
    let Some(first) = slugs.first() else { return };
    if !slugs.iter().all(|s| s == first) {
        return;
    }
    if !outside_text_is_connector(&el.children) {
        return;
    }

    let slug = first.clone();
    el.set_attr(SCRIPT_ATTR, slug);
    unwrap_spans(&mut el.children);
    summary.promoted_blocks += 1;
}

fn is_script_span(el: &Element) -> bool {
    el.tag == "span" && el.attr(SCRIPT_ATTR).is_some()
}

fn collect_span_slugs(children: &[Node], out: &mut Vec<String>) {
    for child in children {
        if let Node::Element(el) = child {
            if is_script_span(el) {
                out.push(el.attr(SCRIPT_ATTR).unwrap_or_default().to_string());
            } else {
                collect_span_slugs(&el.children, out);
            }
        }
    }
}

/// Whether all text outside wrapped script spans is connector-only.
fn outside_text_is_connector(children: &[Node]) -> bool {
    children.iter().all(|child| match child {
        Node::Text(text) => text.chars().all(|c| classify(c) == CharClass::Connector),
        Node::Element(el) if is_script_span(el) => true,
        Node::Element(el) => outside_text_is_connector(&el.children),
    })
}

fn unwrap_spans(children: &mut Vec<Node>) {
    let mut unwrapped = Vec::with_capacity(children.len());
    for mut child in children.drain(..) {
        match child {
            Node::Element(el) if is_script_span(&el) => {
                unwrapped.extend(el.children);
            }
            Node::Element(ref mut el) => {
                unwrap_spans(&mut el.children);
                unwrapped.push(child);
            }
            text => unwrapped.push(text),
        }
    }
    *children = unwrapped;
}

#[cfg(test)]
mod tests {
    use fontfall_coverage::{FontCoverage, FontStyles, UnicodeClass};

    use super::*;

    fn arabic_index() -> FallbackIndex {
        let classes = [UnicodeClass {
            name: "Arabic".into(),
            start: 0x0600,
            end: 0x06FF,
            group: Some("Arabics".into()),
        }];
        let catalog = [FontCoverage {
            family: "NotoKufiArabic".into(),
            ranges: vec![(0x0600, 0x06FF)],
            file_base: "NotoKufiArabic".into(),
            dir_base: "https://example.org/fonts".into(),
            extension: "ttf".into(),
            archive: None,
            styles: FontStyles::default(),
        }];
        FallbackIndex::build(&classes, &catalog)
    }

    fn paragraph(text: &str) -> Node {
        Node::element("p", vec![Node::text(text)])
    }

    fn count_attrs(node: &Node, attr: &str) -> usize {
        match node {
            Node::Text(_) => 0,
            Node::Element(el) => {
                let own = usize::from(el.attr(attr).is_some());
                own + el.children.iter().map(|c| count_attrs(c, attr)).sum::<usize>()
            }
        }
    }

    #[test]
    fn test_mixed_text_wraps_span() {
        let index = arabic_index();
        let tree = paragraph("Greeting: سلام everyone");
        let (wrapped, usage, summary) = wrap_tree(tree, &index);

        assert_eq!(summary.wrapped_spans, 1);
        assert_eq!(count_attrs(&wrapped, SCRIPT_ATTR), 1);
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].group, "arabic");
        assert_eq!(usage[0].slug, "arabic");
        assert_eq!(usage[0].font_name.as_deref(), Some("NotoKufiArabic"));
    }

    #[test]
    fn test_combining_mark_single_span() {
        let index = arabic_index();
        let tree = paragraph("mark: ب\u{0651} end");
        let (wrapped, _, _) = wrap_tree(tree, &index);
        assert_eq!(count_attrs(&wrapped, SCRIPT_ATTR), 1);
    }

    #[test]
    fn test_excluded_tags_untouched() {
        let index = arabic_index();
        let code = Node::element("code", vec![Node::text("سلام")]);
        let tree = Node::element("div", vec![code.clone()]);
        let (wrapped, usage, _) = wrap_tree(tree, &index);

        assert!(usage.is_empty());
        let Node::Element(div) = wrapped else { panic!("expected element") };
        assert_eq!(div.children[0], code);
    }

    #[test]
    fn test_block_promotion() {
        let index = arabic_index();
        let tree = paragraph("你好世界");
        let (wrapped, _, summary) = wrap_tree(tree, &index);

        assert_eq!(summary.promoted_blocks, 1);
        let Node::Element(p) = &wrapped else { panic!("expected element") };
        assert_eq!(p.attr(SCRIPT_ATTR), Some("chinese"));
        // The inner span unwrapped.
        assert_eq!(p.children, vec![Node::text("你好世界")]);
        assert_eq!(count_attrs(&wrapped, SCRIPT_ATTR), 1);
    }

    #[test]
    fn test_double_wrap_is_idempotent() {
        let index = arabic_index();
        let (once, _, _) = wrap_tree(paragraph("你好世界"), &index);
        let (twice, _, _) = wrap_tree(once.clone(), &index);
        assert_eq!(once, twice);
        assert_eq!(count_attrs(&twice, SCRIPT_ATTR), 1);
    }

    #[test]
    fn test_mixed_script_block_not_promoted() {
        let index = arabic_index();
        let tree = paragraph("你好 and سلام");
        let (wrapped, _, summary) = wrap_tree(tree, &index);

        assert_eq!(summary.promoted_blocks, 0);
        let Node::Element(p) = &wrapped else { panic!("expected element") };
        assert!(p.attr(SCRIPT_ATTR).is_none());
        assert_eq!(count_attrs(&wrapped, SCRIPT_ATTR), 2);
    }

    #[test]
    fn test_latin_blocks_promotion() {
        // Latin letters outside the span keep the attribute on the span.
        let index = arabic_index();
        let tree = paragraph("hello 你好");
        let (wrapped, _, summary) = wrap_tree(tree, &index);

        assert_eq!(summary.promoted_blocks, 0);
        let Node::Element(p) = &wrapped else { panic!("expected element") };
        assert!(p.attr(SCRIPT_ATTR).is_none());
    }

    #[test]
    fn test_promotion_through_inline_element() {
        let index = arabic_index();
        let em = Node::element("em", vec![Node::text("世界")]);
        let tree = Node::Element(Element {
            tag: "p".into(),
            attrs: Vec::new(),
            children: vec![Node::text("你好 "), em],
        });
        let (wrapped, _, summary) = wrap_tree(tree, &index);

        assert_eq!(summary.promoted_blocks, 1);
        let Node::Element(p) = &wrapped else { panic!("expected element") };
        assert_eq!(p.attr(SCRIPT_ATTR), Some("chinese"));
        assert_eq!(count_attrs(&wrapped, SCRIPT_ATTR), 1);
    }

    #[test]
    fn test_two_paragraphs_promote_separately() {
        let index = arabic_index();
        let tree = Node::element(
            "div",
            vec![paragraph("中文第一段"), paragraph("中文第二段")],
        );
        let (wrapped, _, summary) = wrap_tree(tree, &index);

        // One block-level tag per paragraph; merging them is the
        // renderer's job.
        assert_eq!(summary.promoted_blocks, 2);
        let Node::Element(div) = &wrapped else { panic!("expected element") };
        assert!(div.attr(SCRIPT_ATTR).is_none());
        for child in &div.children {
            let Node::Element(p) = child else { panic!("expected element") };
            assert_eq!(p.attr(SCRIPT_ATTR), Some("chinese"));
        }
    }

    #[test]
    fn test_math_span() {
        let index = arabic_index();
        let tree = paragraph("the impedance Ω matters");
        let (wrapped, usage, _) = wrap_tree(tree, &index);

        assert_eq!(count_attrs(&wrapped, MATH_ATTR), 1);
        assert_eq!(count_attrs(&wrapped, SCRIPT_ATTR), 0);
        assert!(usage.is_empty());
    }

    #[test]
    fn test_unregistered_script_left_unwrapped() {
        let index = arabic_index();
        let tree = paragraph("runes ᚠᚡᚢ here");
        let (wrapped, usage, summary) = wrap_tree(tree, &index);

        assert!(usage.is_empty());
        assert_eq!(count_attrs(&wrapped, SCRIPT_ATTR), 0);
        assert_eq!(summary.warnings.len(), 1);
        let Node::Element(p) = &wrapped else { panic!("expected element") };
        assert_eq!(p.children, vec![Node::text("runes ᚠᚡᚢ here")]);
    }

    #[test]
    fn test_usage_accumulates_across_fragments() {
        let index = arabic_index();
        let mut tracker = UsageTracker::new(&index);
        let mut summary = WrapSummary::default();

        wrap_tree_with(paragraph("سلام"), &mut tracker, &mut summary);
        wrap_tree_with(paragraph("مرحبا"), &mut tracker, &mut summary);

        let usage = tracker.usage();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].count, 9);
    }
}
