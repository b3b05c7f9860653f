//! Font selection strategies.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Policy used when turning required coverage into a concrete font list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Emit the index's 1:1 class-to-font binding verbatim.
    ByClass,
    /// Greedy approximate minimum-set-cover over the fonts that can cover
    /// the classes actually present in the text.
    MinimalFonts,
}

/// An unrecognized strategy name. This is one of the few hard failures the
/// engine raises.
#[derive(Debug, thiserror::Error)]
#[error("Unknown strategy '{0}', expected 'by_class' or 'minimal_fonts'")]
pub struct UnknownStrategy(String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by_class" => Ok(Self::ByClass),
            "minimal_fonts" => Ok(Self::MinimalFonts),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByClass => f.write_str("by_class"),
            Self::MinimalFonts => f.write_str("minimal_fonts"),
        }
    }
}
