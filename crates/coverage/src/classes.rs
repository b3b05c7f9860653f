//! Unicode class definitions parsed from the upstream TeX-style source.
//!
//! The upstream file declares named codepoint blocks and coarser script
//! groups over them:
//!
//! ```text
//! \DeclareUnicodeClass{Arabic}{"0600}{"06FF}
//! \DeclareUnicodeGroup{Japanese}{Hiragana, Katakana, CJKUnifiedIdeographs}
//! ```
//!
//! A class may be listed under several groups; the highest-priority group
//! wins (a script-specific group outranks the generic `CJK` bucket, which
//! outranks no group), and equal-priority re-declarations keep the first
//! assignment.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    Progress,
    error::{Error, Result},
};

/// A named, possibly grouped, contiguous codepoint range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnicodeClass {
    /// Block name as declared upstream (e.g. "Arabic").
    pub name: String,
    /// First codepoint of the range, inclusive.
    pub start: u32,
    /// Last codepoint of the range, inclusive.
    pub end: u32,
    /// Coarser script family, when one of the declared groups claimed this
    /// class (e.g. "Japanese").
    pub group: Option<String>,
}

impl UnicodeClass {
    /// Whether the class range contains the codepoint.
    pub fn contains(&self, cp: u32) -> bool {
        self.start <= cp && cp <= self.end
    }
}

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\\DeclareUnicodeClass\{([A-Za-z0-9_-]+)\}\{"?([0-9A-Fa-f]+)\}\{"?([0-9A-Fa-f]+)\}"#)
        .unwrap()
});

static GROUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\\DeclareUnicodeGroup\{([A-Za-z0-9_-]+)\}\{([^}]*)\}").unwrap()
});

/// Group priority: script-specific groups outrank the generic `CJK` bucket,
/// which outranks having no group at all.
fn group_priority(name: &str) -> u8 {
    if name.eq_ignore_ascii_case("cjk") { 1 } else { 2 }
}

/// Parse the upstream class definition source.
///
/// Lines that are comments (`%`) or unrelated TeX are skipped. A line that
/// starts a class or group declaration but fails the grammar is an error.
pub fn parse_classes(input: &str, progress: Option<Progress<'_>>) -> Result<Vec<UnicodeClass>> {
    let total = input.lines().count();
    let mut classes: Vec<UnicodeClass> = Vec::new();
    // Class name -> (index into classes, priority of current group assignment).
    let mut priorities: Vec<u8> = Vec::new();

    for (lineno, raw) in input.lines().enumerate() {
        if let Some(report) = progress {
            report(lineno + 1, total);
        }
        let line = raw.trim_start();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if line.starts_with("\\DeclareUnicodeClass") {
            let caps = CLASS_RE.captures(line).ok_or_else(|| Error::Parse {
                line: lineno + 1,
                message: format!("malformed class declaration: {raw}"),
            })?;
            let name = caps[1].to_string();
            let start = parse_hex(&caps[2], lineno + 1)?;
            let end = parse_hex(&caps[3], lineno + 1)?;
            if start > end {
                return Err(Error::Parse {
                    line: lineno + 1,
                    message: format!("empty range {start:04X}-{end:04X} for class {name}"),
                });
            }
            classes.push(UnicodeClass { name, start, end, group: None });
            priorities.push(0);
        } else if line.starts_with("\\DeclareUnicodeGroup") {
            let caps = GROUP_RE.captures(line).ok_or_else(|| Error::Parse {
                line: lineno + 1,
                message: format!("malformed group declaration: {raw}"),
            })?;
            let group = caps[1].to_string();
            let priority = group_priority(&group);
            for member in caps[2].split(',') {
                let member = member.trim();
                if member.is_empty() {
                    continue;
                }
                match classes.iter().position(|c| c.name == member) {
                    Some(i) if priority > priorities[i] => {
                        classes[i].group = Some(group.clone());
                        priorities[i] = priority;
                    }
                    Some(_) => {}
                    None => log::debug!("group {group} names unknown class {member}"),
                }
            }
        }
    }

    Ok(classes)
}

fn parse_hex(digits: &str, line: usize) -> Result<u32> {
    u32::from_str_radix(digits, 16).map_err(|_| Error::Parse {
        line,
        message: format!("invalid codepoint '{digits}'"),
    })
}
